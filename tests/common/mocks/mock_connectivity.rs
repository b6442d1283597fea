use async_trait::async_trait;
use inventory_offline::{
    AppError, ConnectionStatus, NetworkObservation, PlatformConnectivity, ReachabilityProbe,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::RwLock;

/// Connection flag flipped directly by the test.
#[derive(Clone, Default)]
pub struct SwitchableConnection {
    connected: Arc<AtomicBool>,
}

impl SwitchableConnection {
    pub fn new(connected: bool) -> Self {
        Self {
            connected: Arc::new(AtomicBool::new(connected)),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }
}

#[async_trait]
impl ConnectionStatus for SwitchableConnection {
    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// Platform source that returns whatever observation the test scripted last.
#[derive(Clone)]
pub struct ScriptedPlatform {
    current: Arc<RwLock<NetworkObservation>>,
}

impl ScriptedPlatform {
    pub fn new(initial: NetworkObservation) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn set(&self, observation: NetworkObservation) {
        *self.current.write().await = observation;
    }
}

#[async_trait]
impl PlatformConnectivity for ScriptedPlatform {
    async fn current(&self) -> Result<NetworkObservation, AppError> {
        Ok(self.current.read().await.clone())
    }
}

pub struct FixedProbe(pub bool);

#[async_trait]
impl ReachabilityProbe for FixedProbe {
    async fn probe(&self, _url: &str, _timeout: Duration) -> bool {
        self.0
    }
}
