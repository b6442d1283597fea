pub mod connectivity_monitor;
pub mod offline_cache_service;

pub use connectivity_monitor::{ConnectivityListener, ConnectivityMonitor, ListenerId};
pub use offline_cache_service::OfflineCacheService;
