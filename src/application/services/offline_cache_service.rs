use crate::application::ports::connectivity::ConnectionStatus;
use crate::application::ports::local_store::LocalStore;
use crate::application::ports::remote_api::RemoteInventoryApi;
use crate::domain::entities::{
    MaintenanceReport, MaterialDraft, MaterialPatch, MaterialRecord, OfflineActionRecord,
    OfflineStats, OrderDraft, OrderPatch, OrderRecord,
};
use crate::domain::value_objects::{
    EntityId, EntityType, OfflineActionId, OfflineActionType, OfflinePayload, SyncStatusKey,
};
use crate::infrastructure::cache::EnvelopeCache;
use crate::shared::clock::MonotonicClock;
use crate::shared::error::AppError;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const DEFAULT_ENVELOPE_TTL_SECS: u64 = 3600;
const DEFAULT_ACTION_RETENTION_DAYS: u32 = 7;

/// Single entry point for entity reads and writes.
///
/// Reads prefer the network when connected and mirror results into the local
/// store; writes that cannot be confirmed remotely are applied locally and
/// queued as offline actions in the same transaction.
pub struct OfflineCacheService {
    store: Arc<dyn LocalStore>,
    remote: Arc<dyn RemoteInventoryApi>,
    connectivity: Arc<dyn ConnectionStatus>,
    materials_envelope: Arc<EnvelopeCache<Vec<MaterialRecord>>>,
    orders_envelope: Arc<EnvelopeCache<Vec<OrderRecord>>>,
    clock: Arc<MonotonicClock>,
    action_retention: ChronoDuration,
}

impl OfflineCacheService {
    pub fn new(
        store: Arc<dyn LocalStore>,
        remote: Arc<dyn RemoteInventoryApi>,
        connectivity: Arc<dyn ConnectionStatus>,
    ) -> Self {
        Self {
            store,
            remote,
            connectivity,
            materials_envelope: Arc::new(EnvelopeCache::new(DEFAULT_ENVELOPE_TTL_SECS)),
            orders_envelope: Arc::new(EnvelopeCache::new(DEFAULT_ENVELOPE_TTL_SECS)),
            clock: Arc::new(MonotonicClock::new()),
            action_retention: ChronoDuration::days(i64::from(DEFAULT_ACTION_RETENTION_DAYS)),
        }
    }

    pub fn with_envelope_ttl(mut self, ttl_secs: u64) -> Self {
        self.materials_envelope = Arc::new(EnvelopeCache::new(ttl_secs));
        self.orders_envelope = Arc::new(EnvelopeCache::new(ttl_secs));
        self
    }

    pub fn with_action_retention_days(mut self, days: u32) -> Self {
        self.action_retention = ChronoDuration::days(i64::from(days));
        self
    }

    // ---- materials ----

    pub async fn get_materials(&self) -> Vec<MaterialRecord> {
        let now = Utc::now();
        if self.connectivity.is_connected().await {
            match self.remote.list_materials().await {
                Ok(records) => {
                    self.materials_envelope.store(records.clone(), now).await;
                    if let Err(err) = self.mirror_materials(&records).await {
                        log_mirror_failure("materials", &err);
                    }
                }
                Err(err) => log_remote_read_failure("materials", &err),
            }
        }

        match self.store.query_materials().await {
            Ok(records) if !records.is_empty() => return records,
            Ok(_) => {}
            Err(err) => log_local_read_failure("materials", &err),
        }

        self.materials_envelope.read(now).await.unwrap_or_default()
    }

    pub async fn get_material(&self, id: &str) -> Option<MaterialRecord> {
        if self.connectivity.is_connected().await {
            match self.remote.get_material(id).await {
                Ok(Some(record)) => {
                    if let Err(err) = self.mirror_materials(std::slice::from_ref(&record)).await {
                        log_mirror_failure("material", &err);
                    }
                }
                Ok(None) => {}
                Err(err) => log_remote_read_failure("material", &err),
            }
        }

        match self.store.query_material_by_id(id).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => {}
            Err(err) => log_local_read_failure("material", &err),
        }

        self.materials_envelope
            .read(Utc::now())
            .await
            .and_then(|records| records.into_iter().find(|record| record.id == id))
    }

    pub async fn create_material(&self, draft: MaterialDraft) -> Result<MaterialRecord, AppError> {
        draft.validate().map_err(AppError::ValidationError)?;

        if self.connectivity.is_connected().await {
            match self.remote.create_material(&draft).await {
                Ok(record) => {
                    self.store.upsert_materials(std::slice::from_ref(&record)).await?;
                    return Ok(record);
                }
                Err(err) => log_remote_write_failure("create_material", &err),
            }
        }

        let now = self.clock.now();
        let record = MaterialRecord::from_draft(uuid::Uuid::new_v4().to_string(), draft, now);
        let action = self.new_action(
            OfflineActionType::Create,
            EntityType::Material,
            &record.id,
            OfflinePayload::from_serializable(&record).map_err(AppError::SerializationError)?,
        )?;
        self.store.commit_material_mutation(&record, &action).await?;
        Ok(record)
    }

    pub async fn update_material(
        &self,
        id: &str,
        patch: MaterialPatch,
    ) -> Result<MaterialRecord, AppError> {
        patch.validate().map_err(AppError::ValidationError)?;

        if self.should_write_remotely(EntityType::Material, id).await? {
            match self.remote.update_material(id, &patch).await {
                Ok(record) => {
                    self.store.upsert_materials(std::slice::from_ref(&record)).await?;
                    return Ok(record);
                }
                Err(err) => log_remote_write_failure("update_material", &err),
            }
        }

        let mut record = self
            .store
            .query_material_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material {id}")))?;
        record.apply_patch(&patch, self.clock.now());

        let action = self.new_action(
            OfflineActionType::Update,
            EntityType::Material,
            id,
            OfflinePayload::from_serializable(&record).map_err(AppError::SerializationError)?,
        )?;
        self.store.commit_material_mutation(&record, &action).await?;
        Ok(record)
    }

    pub async fn delete_material(&self, id: &str) -> Result<(), AppError> {
        if self.should_write_remotely(EntityType::Material, id).await? {
            match self.remote.delete_material(id).await {
                Ok(()) => {
                    if let Some(mut record) = self.store.query_material_by_id(id).await? {
                        record.mark_deleted(self.clock.now());
                        self.store.upsert_materials(std::slice::from_ref(&record)).await?;
                    }
                    return Ok(());
                }
                Err(err) => log_remote_write_failure("delete_material", &err),
            }
        }

        let action = self.new_action(
            OfflineActionType::Delete,
            EntityType::Material,
            id,
            id_payload(id)?,
        )?;
        match self.store.query_material_by_id(id).await? {
            Some(mut record) => {
                record.mark_deleted(self.clock.now());
                self.store.commit_material_mutation(&record, &action).await
            }
            None => self.store.append_offline_action(&action).await,
        }
    }

    // ---- orders ----

    pub async fn get_orders(&self) -> Vec<OrderRecord> {
        let now = Utc::now();
        if self.connectivity.is_connected().await {
            match self.remote.list_orders().await {
                Ok(records) => {
                    self.orders_envelope.store(records.clone(), now).await;
                    if let Err(err) = self.mirror_orders(&records).await {
                        log_mirror_failure("orders", &err);
                    }
                }
                Err(err) => log_remote_read_failure("orders", &err),
            }
        }

        match self.store.query_orders().await {
            Ok(records) if !records.is_empty() => return records,
            Ok(_) => {}
            Err(err) => log_local_read_failure("orders", &err),
        }

        self.orders_envelope.read(now).await.unwrap_or_default()
    }

    pub async fn get_order(&self, id: &str) -> Option<OrderRecord> {
        if self.connectivity.is_connected().await {
            match self.remote.get_order(id).await {
                Ok(Some(record)) => {
                    if let Err(err) = self.mirror_orders(std::slice::from_ref(&record)).await {
                        log_mirror_failure("order", &err);
                    }
                }
                Ok(None) => {}
                Err(err) => log_remote_read_failure("order", &err),
            }
        }

        match self.store.query_order_by_id(id).await {
            Ok(Some(record)) => return Some(record),
            Ok(None) => {}
            Err(err) => log_local_read_failure("order", &err),
        }

        self.orders_envelope
            .read(Utc::now())
            .await
            .and_then(|records| records.into_iter().find(|record| record.id == id))
    }

    pub async fn create_order(&self, draft: OrderDraft) -> Result<OrderRecord, AppError> {
        draft.validate().map_err(AppError::ValidationError)?;

        if self.connectivity.is_connected().await {
            match self.remote.create_order(&draft).await {
                Ok(record) => {
                    self.store.upsert_orders(std::slice::from_ref(&record)).await?;
                    return Ok(record);
                }
                Err(err) => log_remote_write_failure("create_order", &err),
            }
        }

        let now = self.clock.now();
        let record = OrderRecord::from_draft(uuid::Uuid::new_v4().to_string(), draft, now);
        let action = self.new_action(
            OfflineActionType::Create,
            EntityType::Order,
            &record.id,
            OfflinePayload::from_serializable(&record).map_err(AppError::SerializationError)?,
        )?;
        self.store.commit_order_mutation(&record, &action).await?;
        Ok(record)
    }

    pub async fn update_order(&self, id: &str, patch: OrderPatch) -> Result<OrderRecord, AppError> {
        patch.validate().map_err(AppError::ValidationError)?;

        if self.should_write_remotely(EntityType::Order, id).await? {
            match self.remote.update_order(id, &patch).await {
                Ok(record) => {
                    self.store.upsert_orders(std::slice::from_ref(&record)).await?;
                    return Ok(record);
                }
                Err(err) => log_remote_write_failure("update_order", &err),
            }
        }

        let mut record = self
            .store
            .query_order_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Order {id}")))?;
        record.apply_patch(&patch, self.clock.now());

        let action = self.new_action(
            OfflineActionType::Update,
            EntityType::Order,
            id,
            OfflinePayload::from_serializable(&record).map_err(AppError::SerializationError)?,
        )?;
        self.store.commit_order_mutation(&record, &action).await?;
        Ok(record)
    }

    pub async fn delete_order(&self, id: &str) -> Result<(), AppError> {
        if self.should_write_remotely(EntityType::Order, id).await? {
            match self.remote.delete_order(id).await {
                Ok(()) => {
                    if let Some(mut record) = self.store.query_order_by_id(id).await? {
                        record.mark_deleted(self.clock.now());
                        self.store.upsert_orders(std::slice::from_ref(&record)).await?;
                    }
                    return Ok(());
                }
                Err(err) => log_remote_write_failure("delete_order", &err),
            }
        }

        let action =
            self.new_action(OfflineActionType::Delete, EntityType::Order, id, id_payload(id)?)?;
        match self.store.query_order_by_id(id).await? {
            Some(mut record) => {
                record.mark_deleted(self.clock.now());
                self.store.commit_order_mutation(&record, &action).await
            }
            None => self.store.append_offline_action(&action).await,
        }
    }

    // ---- action queue ----

    pub async fn get_offline_actions(&self) -> Result<Vec<OfflineActionRecord>, AppError> {
        self.store.list_offline_actions().await
    }

    pub async fn list_unsynced_actions(&self) -> Result<Vec<OfflineActionRecord>, AppError> {
        self.store.list_unsynced_actions().await
    }

    pub async fn get_pending_actions_count(&self) -> Result<i64, AppError> {
        self.store.count_unsynced_actions().await
    }

    pub async fn mark_action_synced(&self, id: &OfflineActionId) -> Result<(), AppError> {
        self.store.mark_action_synced(id).await?;
        tracing::debug!(target: "offline::cache", action_id = %id, "offline action synced");
        Ok(())
    }

    /// Records a failed replay attempt. `retry_count` grows by exactly one per call.
    pub async fn update_action_error(
        &self,
        id: &OfflineActionId,
        message: &str,
    ) -> Result<(), AppError> {
        let action = self
            .store
            .find_offline_action(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Offline action {id}")))?;
        let retry_count = action.retry_count.saturating_add(1);
        self.store.record_action_error(id, message, retry_count).await?;

        tracing::warn!(
            target: "offline::cache",
            action_id = %id,
            retry_count,
            error = message,
            "offline action replay failed"
        );
        Ok(())
    }

    pub async fn record_sync_completed(&self, at: DateTime<Utc>) -> Result<(), AppError> {
        self.store
            .set_sync_status(&SyncStatusKey::LastSyncAt, &at.to_rfc3339(), at)
            .await
    }

    pub async fn get_offline_stats(&self) -> OfflineStats {
        let result = tokio::try_join!(
            self.store.count_materials(),
            self.store.count_orders(),
            self.store.count_unsynced_actions(),
            self.store.get_sync_status(&SyncStatusKey::LastSyncAt),
        );

        match result {
            Ok((material_count, order_count, pending_action_count, last_sync)) => OfflineStats {
                material_count,
                order_count,
                pending_action_count,
                last_sync_at: last_sync
                    .and_then(|value| DateTime::parse_from_rfc3339(&value).ok())
                    .map(|value| value.with_timezone(&Utc)),
            },
            Err(err) => {
                tracing::warn!(
                    target: "offline::cache",
                    error = %err,
                    "failed to collect offline stats"
                );
                OfflineStats::default()
            }
        }
    }

    // ---- maintenance ----

    /// Evicts expired envelopes, drops synced actions past the retention window,
    /// purges unreferenced tombstones and compacts the store. Never fails.
    pub async fn perform_maintenance(&self) -> MaintenanceReport {
        let now = Utc::now();
        let mut report = MaintenanceReport::default();

        if self.materials_envelope.evict_expired(now).await {
            report.envelopes_evicted += 1;
        }
        if self.orders_envelope.evict_expired(now).await {
            report.envelopes_evicted += 1;
        }

        let cutoff = now - self.action_retention;
        match self.store.list_offline_actions().await {
            Ok(actions) => {
                for action in actions
                    .iter()
                    .filter(|action| action.synced && action.timestamp < cutoff)
                {
                    match self.store.delete_action(&action.id).await {
                        Ok(()) => report.actions_removed += 1,
                        Err(err) => report.errors.push(format!("delete_action {}: {err}", action.id)),
                    }
                }
            }
            Err(err) => report.errors.push(format!("list_offline_actions: {err}")),
        }

        match self.store.purge_tombstones().await {
            Ok(purged) => report.tombstones_purged = purged,
            Err(err) => report.errors.push(format!("purge_tombstones: {err}")),
        }

        match self.store.compact().await {
            Ok(()) => report.compacted = true,
            Err(err) => report.errors.push(format!("compact: {err}")),
        }

        if report.is_clean() {
            tracing::info!(
                target: "offline::maintenance",
                envelopes_evicted = report.envelopes_evicted,
                actions_removed = report.actions_removed,
                tombstones_purged = report.tombstones_purged,
                "offline maintenance completed"
            );
        } else {
            tracing::error!(
                target: "offline::maintenance",
                errors = ?report.errors,
                "offline maintenance completed with errors"
            );
        }
        report
    }

    pub async fn clear_synced_actions(&self) -> Result<u64, AppError> {
        let removed = self.store.clear_synced_actions().await?;
        tracing::info!(target: "offline::maintenance", removed, "synced actions cleared");
        Ok(removed)
    }

    /// Wipes every local table and envelope. Used on logout / reset.
    pub async fn clear_offline_data(&self) -> Result<(), AppError> {
        self.store.clear_all_data().await?;
        self.materials_envelope.clear().await;
        self.orders_envelope.clear().await;
        Ok(())
    }

    /// Runs maintenance every `interval`, first after one full interval.
    pub fn schedule_maintenance(&self, interval: Duration) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                service.perform_maintenance().await;
            }
        })
    }

    // ---- helpers ----

    fn new_action(
        &self,
        action_type: OfflineActionType,
        entity: EntityType,
        entity_id: &str,
        payload: OfflinePayload,
    ) -> Result<OfflineActionRecord, AppError> {
        let entity_id = EntityId::new(entity_id.to_string()).map_err(AppError::ValidationError)?;
        Ok(OfflineActionRecord::new(
            action_type,
            entity,
            entity_id,
            payload,
            self.clock.now(),
        ))
    }

    /// Writes to a record with queued actions join the queue so replay order holds.
    async fn should_write_remotely(&self, entity: EntityType, id: &str) -> Result<bool, AppError> {
        if !self.connectivity.is_connected().await {
            return Ok(false);
        }
        if self.pending_entity_ids(entity).await?.contains(id) {
            tracing::debug!(
                target: "offline::cache",
                entity = %entity,
                entity_id = id,
                "record has queued actions, queueing write behind them"
            );
            return Ok(false);
        }
        Ok(true)
    }

    async fn pending_entity_ids(&self, entity: EntityType) -> Result<HashSet<String>, AppError> {
        Ok(self
            .store
            .list_unsynced_actions()
            .await?
            .into_iter()
            .filter(|action| action.entity == entity)
            .map(|action| action.entity_id.as_str().to_string())
            .collect())
    }

    /// Rows with an unsynced local action are newer than the server copy and are skipped.
    async fn mirror_materials(&self, records: &[MaterialRecord]) -> Result<(), AppError> {
        let pending = self.pending_entity_ids(EntityType::Material).await?;
        let fresh: Vec<MaterialRecord> = records
            .iter()
            .filter(|record| !pending.contains(&record.id))
            .cloned()
            .collect();
        self.store.upsert_materials(&fresh).await
    }

    async fn mirror_orders(&self, records: &[OrderRecord]) -> Result<(), AppError> {
        let pending = self.pending_entity_ids(EntityType::Order).await?;
        let fresh: Vec<OrderRecord> = records
            .iter()
            .filter(|record| !pending.contains(&record.id))
            .cloned()
            .collect();
        self.store.upsert_orders(&fresh).await
    }
}

impl Clone for OfflineCacheService {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            remote: self.remote.clone(),
            connectivity: self.connectivity.clone(),
            materials_envelope: self.materials_envelope.clone(),
            orders_envelope: self.orders_envelope.clone(),
            clock: self.clock.clone(),
            action_retention: self.action_retention,
        }
    }
}

fn id_payload(id: &str) -> Result<OfflinePayload, AppError> {
    OfflinePayload::new(json!({ "id": id })).map_err(AppError::SerializationError)
}

fn log_remote_read_failure(what: &str, err: &dyn std::fmt::Display) {
    tracing::warn!(
        target: "offline::cache",
        what,
        error = %err,
        "remote read failed, serving local data"
    );
}

fn log_remote_write_failure(operation: &str, err: &dyn std::fmt::Display) {
    tracing::warn!(
        target: "offline::cache",
        operation,
        error = %err,
        "remote write not confirmed, queueing offline action"
    );
}

fn log_local_read_failure(what: &str, err: &AppError) {
    tracing::warn!(
        target: "offline::cache",
        what,
        error = %err,
        "local read failed, falling back to envelope"
    );
}

fn log_mirror_failure(what: &str, err: &AppError) {
    tracing::warn!(
        target: "offline::cache",
        what,
        error = %err,
        "failed to mirror remote data into local store"
    );
}
