use super::mappers::{
    action_from_row, line_item_from_row, line_item_key, material_from_row, order_from_row,
};
use super::queries::*;
use super::rows::{MaterialRow, OfflineActionRow, OrderLineItemRow, OrderRow};
use crate::application::ports::local_store::LocalStore;
use crate::domain::entities::{MaterialRecord, OfflineActionRecord, OrderLineItem, OrderRecord};
use crate::domain::value_objects::{OfflineActionId, SyncStatusKey};
use crate::infrastructure::database::ConnectionPool;
use crate::shared::clock::MonotonicClock;
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct SqliteLocalStore {
    pool: ConnectionPool,
    clock: MonotonicClock,
    initialized: AtomicBool,
}

impl SqliteLocalStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self {
            pool,
            clock: MonotonicClock::new(),
            initialized: AtomicBool::new(false),
        }
    }

    /// Builds the store and applies the schema in one step.
    pub async fn open(pool: ConnectionPool) -> Result<Self, AppError> {
        let store = Self::new(pool);
        store.initialize().await?;
        Ok(store)
    }

    fn ready_pool(&self) -> Result<&SqlitePool, AppError> {
        if !self.initialized.load(Ordering::Acquire) {
            return Err(AppError::StoreNotInitialized);
        }
        Ok(self.pool.get_pool())
    }
}

async fn write_material(
    conn: &mut SqliteConnection,
    record: &MaterialRecord,
    last_modified: i64,
) -> Result<(), AppError> {
    sqlx::query(UPSERT_MATERIAL)
        .bind(&record.id)
        .bind(&record.name)
        .bind(&record.category)
        .bind(&record.specification)
        .bind(&record.unit)
        .bind(record.price)
        .bind(record.stock)
        .bind(&record.image_url)
        .bind(&record.description)
        .bind(record.created_at.timestamp_millis())
        .bind(record.updated_at.timestamp_millis())
        .bind(record.is_deleted)
        .bind(last_modified)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

async fn write_order(
    conn: &mut SqliteConnection,
    record: &OrderRecord,
    last_modified: i64,
) -> Result<(), AppError> {
    sqlx::query(UPSERT_ORDER)
        .bind(&record.id)
        .bind(&record.order_number)
        .bind(&record.customer_name)
        .bind(record.status.as_str())
        .bind(record.total_amount)
        .bind(record.created_at.timestamp_millis())
        .bind(record.updated_at.timestamp_millis())
        .bind(record.is_deleted)
        .bind(last_modified)
        .execute(&mut *conn)
        .await?;

    sqlx::query(DELETE_LINE_ITEMS_BY_ORDER)
        .bind(&record.id)
        .execute(&mut *conn)
        .await?;

    for item in &record.items {
        sqlx::query(INSERT_LINE_ITEM)
            .bind(line_item_key(&record.id, &item.material_id))
            .bind(&record.id)
            .bind(&item.material_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

async fn insert_action(
    conn: &mut SqliteConnection,
    action: &OfflineActionRecord,
) -> Result<(), AppError> {
    sqlx::query(INSERT_OFFLINE_ACTION)
        .bind(action.id.as_str())
        .bind(action.action_type.as_str())
        .bind(action.entity.as_str())
        .bind(action.entity_id.as_str())
        .bind(action.payload.to_json_string())
        .bind(action.timestamp.timestamp_millis())
        .bind(action.synced)
        .bind(i64::from(action.retry_count))
        .bind(&action.last_error)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

#[async_trait]
impl LocalStore for SqliteLocalStore {
    async fn initialize(&self) -> Result<(), AppError> {
        if let Err(err) = self.pool.migrate().await {
            tracing::error!(
                target: "offline::store",
                error = %err,
                "failed to apply local store schema"
            );
            return Err(err);
        }
        self.initialized.store(true, Ordering::Release);
        tracing::info!(target: "offline::store", "local store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), AppError> {
        self.initialized.store(false, Ordering::Release);
        self.pool.close().await;
        tracing::info!(target: "offline::store", "local store closed");
        Ok(())
    }

    async fn upsert_materials(&self, records: &[MaterialRecord]) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await?;
        for record in records {
            write_material(&mut tx, record, self.clock.next_millis()).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            target: "offline::store",
            count = records.len(),
            "materials upserted"
        );
        Ok(())
    }

    async fn query_materials(&self) -> Result<Vec<MaterialRecord>, AppError> {
        let pool = self.ready_pool()?;
        let rows = sqlx::query_as::<_, MaterialRow>(SELECT_MATERIALS)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(material_from_row).collect()
    }

    async fn query_material_by_id(&self, id: &str) -> Result<Option<MaterialRecord>, AppError> {
        let pool = self.ready_pool()?;
        let row = sqlx::query_as::<_, MaterialRow>(SELECT_MATERIAL_BY_ID)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        row.map(material_from_row).transpose()
    }

    async fn count_materials(&self) -> Result<i64, AppError> {
        let pool = self.ready_pool()?;
        let count: i64 = sqlx::query_scalar(COUNT_MATERIALS).fetch_one(pool).await?;
        Ok(count)
    }

    async fn upsert_orders(&self, records: &[OrderRecord]) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        if records.is_empty() {
            return Ok(());
        }

        let mut tx = pool.begin().await?;
        for record in records {
            write_order(&mut tx, record, self.clock.next_millis()).await?;
        }
        tx.commit().await?;

        tracing::debug!(
            target: "offline::store",
            count = records.len(),
            "orders upserted"
        );
        Ok(())
    }

    async fn query_orders(&self) -> Result<Vec<OrderRecord>, AppError> {
        let pool = self.ready_pool()?;
        let order_rows = sqlx::query_as::<_, OrderRow>(SELECT_ORDERS)
            .fetch_all(pool)
            .await?;
        let item_rows = sqlx::query_as::<_, OrderLineItemRow>(SELECT_LINE_ITEMS_FOR_LIVE_ORDERS)
            .fetch_all(pool)
            .await?;

        let mut items_by_order: HashMap<String, Vec<OrderLineItem>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id.clone())
                .or_default()
                .push(line_item_from_row(row));
        }

        order_rows
            .into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                order_from_row(row, items)
            })
            .collect()
    }

    async fn query_order_by_id(&self, id: &str) -> Result<Option<OrderRecord>, AppError> {
        let pool = self.ready_pool()?;
        let Some(row) = sqlx::query_as::<_, OrderRow>(SELECT_ORDER_BY_ID)
            .bind(id)
            .fetch_optional(pool)
            .await?
        else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderLineItemRow>(SELECT_LINE_ITEMS_BY_ORDER)
            .bind(id)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(line_item_from_row)
            .collect();

        order_from_row(row, items).map(Some)
    }

    async fn count_orders(&self) -> Result<i64, AppError> {
        let pool = self.ready_pool()?;
        let count: i64 = sqlx::query_scalar(COUNT_ORDERS).fetch_one(pool).await?;
        Ok(count)
    }

    async fn commit_material_mutation(
        &self,
        record: &MaterialRecord,
        action: &OfflineActionRecord,
    ) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        let mut tx = pool.begin().await?;
        write_material(&mut tx, record, self.clock.next_millis()).await?;
        insert_action(&mut tx, action).await?;
        tx.commit().await?;

        tracing::debug!(
            target: "offline::store",
            action_id = %action.id,
            entity_id = %action.entity_id,
            action_type = %action.action_type,
            "material mutation queued"
        );
        Ok(())
    }

    async fn commit_order_mutation(
        &self,
        record: &OrderRecord,
        action: &OfflineActionRecord,
    ) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        let mut tx = pool.begin().await?;
        write_order(&mut tx, record, self.clock.next_millis()).await?;
        insert_action(&mut tx, action).await?;
        tx.commit().await?;

        tracing::debug!(
            target: "offline::store",
            action_id = %action.id,
            entity_id = %action.entity_id,
            action_type = %action.action_type,
            "order mutation queued"
        );
        Ok(())
    }

    async fn append_offline_action(&self, action: &OfflineActionRecord) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        let mut conn = pool.acquire().await?;
        insert_action(&mut conn, action).await
    }

    async fn list_offline_actions(&self) -> Result<Vec<OfflineActionRecord>, AppError> {
        let pool = self.ready_pool()?;
        let rows = sqlx::query_as::<_, OfflineActionRow>(SELECT_OFFLINE_ACTIONS)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(action_from_row).collect()
    }

    async fn list_unsynced_actions(&self) -> Result<Vec<OfflineActionRecord>, AppError> {
        let pool = self.ready_pool()?;
        let rows = sqlx::query_as::<_, OfflineActionRow>(SELECT_UNSYNCED_ACTIONS)
            .fetch_all(pool)
            .await?;
        rows.into_iter().map(action_from_row).collect()
    }

    async fn find_offline_action(
        &self,
        id: &OfflineActionId,
    ) -> Result<Option<OfflineActionRecord>, AppError> {
        let pool = self.ready_pool()?;
        let row = sqlx::query_as::<_, OfflineActionRow>(SELECT_OFFLINE_ACTION_BY_ID)
            .bind(id.as_str())
            .fetch_optional(pool)
            .await?;
        row.map(action_from_row).transpose()
    }

    async fn count_unsynced_actions(&self) -> Result<i64, AppError> {
        let pool = self.ready_pool()?;
        let count: i64 = sqlx::query_scalar(COUNT_UNSYNCED_ACTIONS)
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    async fn mark_action_synced(&self, id: &OfflineActionId) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        let result = sqlx::query(MARK_ACTION_SYNCED)
            .bind(id.as_str())
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Offline action {id}")));
        }
        Ok(())
    }

    async fn record_action_error(
        &self,
        id: &OfflineActionId,
        message: &str,
        retry_count: u32,
    ) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        let result = sqlx::query(RECORD_ACTION_ERROR)
            .bind(id.as_str())
            .bind(message)
            .bind(i64::from(retry_count))
            .execute(pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Offline action {id}")));
        }
        Ok(())
    }

    async fn delete_action(&self, id: &OfflineActionId) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        sqlx::query(DELETE_OFFLINE_ACTION)
            .bind(id.as_str())
            .execute(pool)
            .await?;
        Ok(())
    }

    async fn clear_synced_actions(&self) -> Result<u64, AppError> {
        let pool = self.ready_pool()?;
        let result = sqlx::query(DELETE_SYNCED_ACTIONS).execute(pool).await?;
        Ok(result.rows_affected())
    }

    async fn purge_tombstones(&self) -> Result<u64, AppError> {
        let pool = self.ready_pool()?;
        let mut tx = pool.begin().await?;
        let materials = sqlx::query(PURGE_MATERIAL_TOMBSTONES)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        let orders = sqlx::query(PURGE_ORDER_TOMBSTONES)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tx.commit().await?;
        Ok(materials + orders)
    }

    async fn clear_all_data(&self) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        let mut tx = pool.begin().await?;
        for statement in CLEAR_ALL_TABLES {
            sqlx::query(statement).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        tracing::info!(target: "offline::store", "local store cleared");
        Ok(())
    }

    async fn get_sync_status(&self, key: &SyncStatusKey) -> Result<Option<String>, AppError> {
        let pool = self.ready_pool()?;
        let value: Option<String> = sqlx::query_scalar(SELECT_SYNC_STATUS)
            .bind(key.as_str())
            .fetch_optional(pool)
            .await?;
        Ok(value)
    }

    async fn set_sync_status(
        &self,
        key: &SyncStatusKey,
        value: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        sqlx::query(UPSERT_SYNC_STATUS)
            .bind(key.as_str())
            .bind(value)
            .bind(updated_at.timestamp_millis())
            .execute(pool)
            .await?;
        Ok(())
    }

    async fn compact(&self) -> Result<(), AppError> {
        let pool = self.ready_pool()?;
        sqlx::query("VACUUM").execute(pool).await?;
        Ok(())
    }
}
