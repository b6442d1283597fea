pub mod cache_envelope;
pub mod maintenance_report;
pub mod offline_action;
pub mod offline_stats;

pub use cache_envelope::CacheEnvelope;
pub use maintenance_report::MaintenanceReport;
pub use offline_action::OfflineActionRecord;
pub use offline_stats::OfflineStats;
