use crate::application::ports::connectivity::{
    ConnectionStatus, PlatformConnectivity, ReachabilityProbe,
};
use crate::application::ports::local_store::LocalStore;
use crate::application::ports::synchronizer::Synchronizer;
use crate::domain::entities::{ConnectivitySnapshot, NetworkObservation};
use crate::domain::value_objects::{ConnectivityState, SyncStatusKey};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex as StdMutex, RwLock as StdRwLock};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock, mpsc};
use tokio::task::JoinHandle;

pub type ListenerId = u64;

/// Called synchronously, in subscription order, on every state transition.
pub type ConnectivityListener =
    Arc<dyn Fn(ConnectivityState) -> Result<(), String> + Send + Sync + 'static>;

#[derive(Debug, Default)]
struct MonitorState {
    current: ConnectivityState,
    last_observation: Option<NetworkObservation>,
    /// Set on entering `Offline`; consumed by the next reachable transition.
    drain_armed: bool,
}

pub struct ConnectivityMonitor {
    store: Arc<dyn LocalStore>,
    platform: Arc<dyn PlatformConnectivity>,
    probe: Arc<dyn ReachabilityProbe>,
    synchronizer: StdRwLock<Option<Arc<dyn Synchronizer>>>,
    state: RwLock<MonitorState>,
    listeners: StdMutex<Vec<(ListenerId, ConnectivityListener)>>,
    next_listener_id: AtomicU64,
    transition_gate: Mutex<()>,
}

impl ConnectivityMonitor {
    pub fn new(
        store: Arc<dyn LocalStore>,
        platform: Arc<dyn PlatformConnectivity>,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> Self {
        Self {
            store,
            platform,
            probe,
            synchronizer: StdRwLock::new(None),
            state: RwLock::new(MonitorState::default()),
            listeners: StdMutex::new(Vec::new()),
            next_listener_id: AtomicU64::new(1),
            transition_gate: Mutex::new(()),
        }
    }

    pub fn with_synchronizer(self, synchronizer: Arc<dyn Synchronizer>) -> Self {
        self.set_synchronizer(synchronizer);
        self
    }

    /// Late binding for synchronizers that themselves depend on the cache service.
    pub fn set_synchronizer(&self, synchronizer: Arc<dyn Synchronizer>) {
        let mut slot = self
            .synchronizer
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(synchronizer);
    }

    /// Restores drain arming from the persisted snapshot, then reads the platform.
    pub async fn start(&self) -> Result<ConnectivityState, AppError> {
        if let Some(snapshot) = self.load_snapshot().await {
            if snapshot.state == ConnectivityState::Offline {
                self.state.write().await.drain_armed = true;
                tracing::debug!(
                    target: "offline::connectivity",
                    "previous session ended offline, drain armed"
                );
            }
        }
        self.refresh().await
    }

    /// Reads the platform immediately and applies the result.
    pub async fn refresh(&self) -> Result<ConnectivityState, AppError> {
        let observation = self.platform.current().await?;
        self.handle_observation(observation).await;
        Ok(self.current_state().await)
    }

    /// Feeds platform notifications from `rx` until the sender is dropped.
    pub fn attach(self: &Arc<Self>, mut rx: mpsc::Receiver<NetworkObservation>) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            while let Some(observation) = rx.recv().await {
                monitor.handle_observation(observation).await;
            }
            tracing::debug!(target: "offline::connectivity", "platform channel closed");
        })
    }

    /// Applies one reading. The drain, if any, runs after the transition gate
    /// is released, so a synchronizer may call back into the monitor.
    pub async fn handle_observation(&self, observation: NetworkObservation) {
        if self.apply_transition(observation).await {
            self.drain().await;
        }
    }

    /// Returns whether this transition fired the armed drain.
    async fn apply_transition(&self, observation: NetworkObservation) -> bool {
        let _gate = self.transition_gate.lock().await;
        let next = observation.classify();

        let (previous, should_drain) = {
            let mut state = self.state.write().await;
            let previous = state.current;
            state.last_observation = Some(observation.clone());
            if previous == next {
                return false;
            }

            state.current = next;
            if next == ConnectivityState::Offline {
                state.drain_armed = true;
            }
            let should_drain = next == ConnectivityState::OnlineReachable && state.drain_armed;
            if should_drain {
                state.drain_armed = false;
            }
            (previous, should_drain)
        };

        tracing::info!(
            target: "offline::connectivity",
            from = %previous,
            to = %next,
            transport = observation.transport.as_deref().unwrap_or("none"),
            "connectivity changed"
        );

        self.persist_snapshot(&observation).await;
        self.notify(next);
        should_drain
    }

    async fn drain(&self) {
        let synchronizer = self
            .synchronizer
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        let Some(synchronizer) = synchronizer else {
            tracing::warn!(
                target: "offline::connectivity",
                "reconnected with no synchronizer attached, queue left pending"
            );
            return;
        };

        tracing::info!(target: "offline::connectivity", "draining offline queue");
        if let Err(err) = synchronizer.drain().await {
            tracing::error!(
                target: "offline::connectivity",
                error = %err,
                "offline queue drain failed"
            );
        }
    }

    pub async fn current_state(&self) -> ConnectivityState {
        self.state.read().await.current
    }

    pub async fn last_observation(&self) -> Option<NetworkObservation> {
        self.state.read().await.last_observation.clone()
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(ConnectivityState) -> Result<(), String> + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners.push((id, Arc::new(listener)));
        id
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// `true` on the next reachable transition, or at once if already reachable.
    pub async fn wait_for_connection(&self, timeout: Duration) -> bool {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = self.subscribe(move |state| {
            if state.is_connected() {
                let _ = tx.send(());
            }
            Ok(())
        });

        let connected = if self.current_state().await.is_connected() {
            true
        } else {
            matches!(tokio::time::timeout(timeout, rx.recv()).await, Ok(Some(())))
        };

        self.unsubscribe(id);
        connected
    }

    /// One-off probe that ignores and does not change the cached state.
    pub async fn connection_test(&self, url: &str, timeout: Duration) -> bool {
        self.probe.probe(url, timeout).await
    }

    fn notify(&self, state: ConnectivityState) {
        let listeners: Vec<(ListenerId, ConnectivityListener)> = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();

        for (id, listener) in listeners {
            match catch_unwind(AssertUnwindSafe(|| listener(state))) {
                Ok(Ok(())) => {}
                Ok(Err(err)) => tracing::warn!(
                    target: "offline::connectivity",
                    listener_id = id,
                    error = %err,
                    "connectivity listener failed"
                ),
                Err(_) => tracing::error!(
                    target: "offline::connectivity",
                    listener_id = id,
                    "connectivity listener panicked"
                ),
            }
        }
    }

    async fn persist_snapshot(&self, observation: &NetworkObservation) {
        let now = Utc::now();
        let snapshot = ConnectivitySnapshot::from_observation(observation, now);
        let result = match serde_json::to_string(&snapshot) {
            Ok(json) => {
                self.store
                    .set_sync_status(&SyncStatusKey::ConnectivitySnapshot, &json, now)
                    .await
            }
            Err(err) => Err(AppError::from(err)),
        };
        if let Err(err) = result {
            tracing::warn!(
                target: "offline::connectivity",
                error = %err,
                "failed to persist connectivity snapshot"
            );
        }
    }

    async fn load_snapshot(&self) -> Option<ConnectivitySnapshot> {
        match self
            .store
            .get_sync_status(&SyncStatusKey::ConnectivitySnapshot)
            .await
        {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(snapshot) => Some(snapshot),
                Err(err) => {
                    tracing::warn!(
                        target: "offline::connectivity",
                        error = %err,
                        "ignoring unreadable connectivity snapshot"
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                tracing::warn!(
                    target: "offline::connectivity",
                    error = %err,
                    "failed to load connectivity snapshot"
                );
                None
            }
        }
    }
}

#[async_trait]
impl ConnectionStatus for ConnectivityMonitor {
    async fn is_connected(&self) -> bool {
        self.current_state().await.is_connected()
    }
}
