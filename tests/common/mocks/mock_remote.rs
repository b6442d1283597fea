use async_trait::async_trait;
use chrono::Utc;
use inventory_offline::{
    MaterialDraft, MaterialPatch, MaterialRecord, OrderDraft, OrderPatch, OrderRecord,
    RemoteError, RemoteInventoryApi,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// In-memory backend. `set_failing(true)` turns every call into a transport error.
#[derive(Clone, Default)]
pub struct MockRemoteApi {
    materials: Arc<RwLock<BTreeMap<String, MaterialRecord>>>,
    orders: Arc<RwLock<BTreeMap<String, OrderRecord>>>,
    failing: Arc<AtomicBool>,
    next_id: Arc<AtomicUsize>,
    calls: Arc<AtomicUsize>,
}

impl MockRemoteApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn seed_material(&self, record: MaterialRecord) {
        self.materials.write().await.insert(record.id.clone(), record);
    }

    pub async fn seed_order(&self, record: OrderRecord) {
        self.orders.write().await.insert(record.id.clone(), record);
    }

    pub async fn material(&self, id: &str) -> Option<MaterialRecord> {
        self.materials.read().await.get(id).cloned()
    }

    fn enter(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(RemoteError::Transport("connection reset".into()));
        }
        Ok(())
    }

    fn server_id(&self, prefix: &str) -> String {
        format!("{prefix}-srv-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1)
    }
}

fn not_found(what: &str, id: &str) -> RemoteError {
    RemoteError::Status {
        status: 404,
        message: format!("{what} {id} not found"),
    }
}

#[async_trait]
impl RemoteInventoryApi for MockRemoteApi {
    async fn list_materials(&self) -> Result<Vec<MaterialRecord>, RemoteError> {
        self.enter()?;
        Ok(self.materials.read().await.values().cloned().collect())
    }

    async fn get_material(&self, id: &str) -> Result<Option<MaterialRecord>, RemoteError> {
        self.enter()?;
        Ok(self.materials.read().await.get(id).cloned())
    }

    async fn create_material(&self, draft: &MaterialDraft) -> Result<MaterialRecord, RemoteError> {
        self.enter()?;
        let record = MaterialRecord::from_draft(self.server_id("m"), draft.clone(), Utc::now());
        self.seed_material(record.clone()).await;
        Ok(record)
    }

    async fn update_material(
        &self,
        id: &str,
        patch: &MaterialPatch,
    ) -> Result<MaterialRecord, RemoteError> {
        self.enter()?;
        let mut materials = self.materials.write().await;
        let record = materials.get_mut(id).ok_or_else(|| not_found("material", id))?;
        record.apply_patch(patch, Utc::now());
        Ok(record.clone())
    }

    async fn delete_material(&self, id: &str) -> Result<(), RemoteError> {
        self.enter()?;
        self.materials
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("material", id))
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, RemoteError> {
        self.enter()?;
        Ok(self.orders.read().await.values().cloned().collect())
    }

    async fn get_order(&self, id: &str) -> Result<Option<OrderRecord>, RemoteError> {
        self.enter()?;
        Ok(self.orders.read().await.get(id).cloned())
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderRecord, RemoteError> {
        self.enter()?;
        let record = OrderRecord::from_draft(self.server_id("o"), draft.clone(), Utc::now());
        self.seed_order(record.clone()).await;
        Ok(record)
    }

    async fn update_order(&self, id: &str, patch: &OrderPatch) -> Result<OrderRecord, RemoteError> {
        self.enter()?;
        let mut orders = self.orders.write().await;
        let record = orders.get_mut(id).ok_or_else(|| not_found("order", id))?;
        record.apply_patch(patch, Utc::now());
        Ok(record.clone())
    }

    async fn delete_order(&self, id: &str) -> Result<(), RemoteError> {
        self.enter()?;
        self.orders
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("order", id))
    }
}
