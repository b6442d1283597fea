use crate::application::ports::{
    LocalStore, PlatformConnectivity, ReachabilityProbe, RemoteInventoryApi, Synchronizer,
};
use crate::application::services::{ConnectivityMonitor, OfflineCacheService};
use crate::domain::value_objects::ConnectivityState;
use crate::infrastructure::connectivity::HttpReachabilityProbe;
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::offline::SqliteLocalStore;
use crate::infrastructure::remote::HttpRemoteApi;
use crate::shared::config::AppConfig;
use crate::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Composition root: one store handle shared by the cache service and the monitor.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn LocalStore>,
    pub cache_service: Arc<OfflineCacheService>,
    pub connectivity: Arc<ConnectivityMonitor>,
    maintenance_task: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl AppState {
    /// Opens the configured database and wires the HTTP remote client and probe.
    /// A store that fails to open or migrate is fatal.
    pub async fn new(
        config: AppConfig,
        platform: Arc<dyn PlatformConnectivity>,
    ) -> Result<Self, AppError> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let pool = ConnectionPool::new(
            &config.database.url,
            Duration::from_secs(config.database.connection_timeout),
        )
        .await?;
        let store: Arc<dyn LocalStore> = Arc::new(SqliteLocalStore::open(pool).await?);
        let remote: Arc<dyn RemoteInventoryApi> = Arc::new(HttpRemoteApi::new(
            &config.remote.base_url,
            Duration::from_secs(config.remote.request_timeout_secs),
        )?);
        let probe: Arc<dyn ReachabilityProbe> = Arc::new(HttpReachabilityProbe::new());

        Ok(Self::from_parts(config, store, remote, platform, probe))
    }

    /// Wires already-built collaborators. The store must be initialized.
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteInventoryApi>,
        platform: Arc<dyn PlatformConnectivity>,
        probe: Arc<dyn ReachabilityProbe>,
    ) -> Self {
        let connectivity = Arc::new(ConnectivityMonitor::new(
            Arc::clone(&store),
            platform,
            probe,
        ));
        let cache_service = Arc::new(
            OfflineCacheService::new(Arc::clone(&store), remote, connectivity.clone())
                .with_envelope_ttl(config.cache.envelope_ttl_secs)
                .with_action_retention_days(config.maintenance.action_retention_days),
        );

        Self {
            config: Arc::new(config),
            store,
            cache_service,
            connectivity,
            maintenance_task: Arc::new(Mutex::new(None)),
        }
    }

    pub fn attach_synchronizer(&self, synchronizer: Arc<dyn Synchronizer>) {
        self.connectivity.set_synchronizer(synchronizer);
    }

    /// Reads initial connectivity and starts periodic maintenance when enabled.
    pub async fn start(&self) -> Result<ConnectivityState, AppError> {
        let state = self.connectivity.start().await?;

        if self.config.maintenance.enabled {
            let mut task = self.maintenance_task.lock().await;
            if task.is_none() {
                let interval = Duration::from_secs(self.config.maintenance.interval_secs);
                *task = Some(self.cache_service.schedule_maintenance(interval));
                tracing::info!(
                    target: "offline::maintenance",
                    interval_secs = self.config.maintenance.interval_secs,
                    "periodic maintenance scheduled"
                );
            }
        }

        Ok(state)
    }

    /// Probes the configured endpoint with the configured timeout.
    pub async fn connection_test(&self) -> bool {
        let connectivity = &self.config.connectivity;
        self.connectivity
            .connection_test(
                &connectivity.probe_url,
                Duration::from_millis(connectivity.probe_timeout_ms),
            )
            .await
    }

    pub async fn wait_for_connection(&self) -> bool {
        self.connectivity
            .wait_for_connection(Duration::from_millis(
                self.config.connectivity.wait_timeout_ms,
            ))
            .await
    }

    pub async fn shutdown(&self) -> Result<(), AppError> {
        if let Some(task) = self.maintenance_task.lock().await.take() {
            task.abort();
        }
        self.store.close().await
    }
}
