use crate::domain::entities::NetworkObservation;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::time::Duration;

/// Platform network information source.
#[async_trait]
pub trait PlatformConnectivity: Send + Sync {
    async fn current(&self) -> Result<NetworkObservation, AppError>;
}

#[async_trait]
pub trait ReachabilityProbe: Send + Sync {
    /// One-off check against `url`. Any failure is reported as `false`.
    async fn probe(&self, url: &str, timeout: Duration) -> bool;
}

/// Read side of connectivity used by the cache service.
#[async_trait]
pub trait ConnectionStatus: Send + Sync {
    async fn is_connected(&self) -> bool;
}
