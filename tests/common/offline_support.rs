use super::mocks::{MockRemoteApi, SwitchableConnection};
use chrono::{Duration, Utc};
use inventory_offline::{
    ConnectionPool, EntityId, EntityType, LocalStore, MaterialDraft, MaterialRecord,
    OfflineActionRecord, OfflineActionType, OfflineCacheService, OfflinePayload,
    SqliteLocalStore,
};
use serde_json::json;
use std::sync::Arc;

pub struct OfflineTestContext {
    pub store: Arc<dyn LocalStore>,
    pub remote: MockRemoteApi,
    pub connection: SwitchableConnection,
    pub service: OfflineCacheService,
}

pub async fn setup_store() -> Arc<dyn LocalStore> {
    let pool = ConnectionPool::from_memory().await.expect("in-memory sqlite");
    Arc::new(SqliteLocalStore::open(pool).await.expect("schema"))
}

pub async fn setup_offline_service(connected: bool) -> OfflineTestContext {
    let store = setup_store().await;
    let remote = MockRemoteApi::new();
    let connection = SwitchableConnection::new(connected);
    let service = OfflineCacheService::new(
        Arc::clone(&store),
        Arc::new(remote.clone()),
        Arc::new(connection.clone()),
    );

    OfflineTestContext {
        store,
        remote,
        connection,
        service,
    }
}

pub fn plywood() -> MaterialDraft {
    MaterialDraft::new("Plywood", "Wood")
        .with_stock(50)
        .with_price("sheet", 12.5)
}

pub fn server_material(id: &str, name: &str, stock: i64) -> MaterialRecord {
    MaterialRecord::from_draft(
        id.to_string(),
        MaterialDraft::new(name, "Wood").with_stock(stock),
        Utc::now(),
    )
}

/// A standalone UPDATE action stamped `days_ago` in the past.
pub fn aged_action(days_ago: i64, synced: bool) -> OfflineActionRecord {
    let entity_id = format!("m-aged-{days_ago}");
    OfflineActionRecord::new(
        OfflineActionType::Update,
        EntityType::Material,
        EntityId::new(entity_id.clone()).expect("entity id"),
        OfflinePayload::new(json!({ "id": entity_id })).expect("payload"),
        Utc::now() - Duration::days(days_ago),
    )
    .with_synced(synced)
}
