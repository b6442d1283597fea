use tracing::info;

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
mod state;

pub use application::ports::{
    ConnectionStatus, LocalStore, PlatformConnectivity, ReachabilityProbe, RemoteError,
    RemoteInventoryApi, Synchronizer,
};
pub use application::services::{ConnectivityMonitor, OfflineCacheService};
pub use domain::entities::{
    ConnectivitySnapshot, MaintenanceReport, MaterialDraft, MaterialPatch, MaterialRecord,
    NetworkObservation, OfflineActionRecord, OfflineStats, OrderDraft, OrderLineItem,
    OrderLineItemDraft, OrderPatch, OrderRecord, OrderStatus,
};
pub use domain::value_objects::{
    ConnectivityState, EntityId, EntityType, OfflineActionId, OfflineActionType, OfflinePayload,
    SyncStatusKey,
};
pub use infrastructure::connectivity::HttpReachabilityProbe;
pub use infrastructure::database::ConnectionPool;
pub use infrastructure::offline::SqliteLocalStore;
pub use infrastructure::remote::HttpRemoteApi;
pub use shared::{AppConfig, AppError};
pub use state::AppState;

/// Installs the global tracing subscriber. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inventory_offline=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        info!("inventory offline layer logging initialized");
    }
}
