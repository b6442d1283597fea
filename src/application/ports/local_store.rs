use crate::domain::entities::{MaterialRecord, OfflineActionRecord, OrderRecord};
use crate::domain::value_objects::{OfflineActionId, SyncStatusKey};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Durable on-device persistence for materials, orders, the offline action log
/// and the sync-status table.
///
/// Every method returns [`AppError::StoreNotInitialized`] until `initialize`
/// has completed. Statement failures surface as [`AppError::Database`] and are
/// never retried here.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Applies the schema. Safe to call on every launch.
    async fn initialize(&self) -> Result<(), AppError>;
    async fn close(&self) -> Result<(), AppError>;

    /// Insert-or-replace by id. `last_modified` is always restamped locally.
    async fn upsert_materials(&self, records: &[MaterialRecord]) -> Result<(), AppError>;
    /// Non-deleted materials, newest `last_modified` first.
    async fn query_materials(&self) -> Result<Vec<MaterialRecord>, AppError>;
    async fn query_material_by_id(&self, id: &str) -> Result<Option<MaterialRecord>, AppError>;
    async fn count_materials(&self) -> Result<i64, AppError>;

    /// Replaces each order row and its whole line-item set.
    async fn upsert_orders(&self, records: &[OrderRecord]) -> Result<(), AppError>;
    async fn query_orders(&self) -> Result<Vec<OrderRecord>, AppError>;
    async fn query_order_by_id(&self, id: &str) -> Result<Option<OrderRecord>, AppError>;
    async fn count_orders(&self) -> Result<i64, AppError>;

    /// Writes the record and appends its action in one transaction.
    async fn commit_material_mutation(
        &self,
        record: &MaterialRecord,
        action: &OfflineActionRecord,
    ) -> Result<(), AppError>;
    async fn commit_order_mutation(
        &self,
        record: &OrderRecord,
        action: &OfflineActionRecord,
    ) -> Result<(), AppError>;

    async fn append_offline_action(&self, action: &OfflineActionRecord) -> Result<(), AppError>;
    /// All actions in replay order.
    async fn list_offline_actions(&self) -> Result<Vec<OfflineActionRecord>, AppError>;
    async fn list_unsynced_actions(&self) -> Result<Vec<OfflineActionRecord>, AppError>;
    async fn find_offline_action(
        &self,
        id: &OfflineActionId,
    ) -> Result<Option<OfflineActionRecord>, AppError>;
    async fn count_unsynced_actions(&self) -> Result<i64, AppError>;
    async fn mark_action_synced(&self, id: &OfflineActionId) -> Result<(), AppError>;
    async fn record_action_error(
        &self,
        id: &OfflineActionId,
        message: &str,
        retry_count: u32,
    ) -> Result<(), AppError>;
    async fn delete_action(&self, id: &OfflineActionId) -> Result<(), AppError>;
    async fn clear_synced_actions(&self) -> Result<u64, AppError>;

    /// Physically removes tombstoned rows no unsynced action still points at.
    async fn purge_tombstones(&self) -> Result<u64, AppError>;
    async fn clear_all_data(&self) -> Result<(), AppError>;

    async fn get_sync_status(&self, key: &SyncStatusKey) -> Result<Option<String>, AppError>;
    async fn set_sync_status(
        &self,
        key: &SyncStatusKey,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    async fn compact(&self) -> Result<(), AppError>;
}
