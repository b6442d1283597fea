use crate::domain::entities::{
    MaterialDraft, MaterialPatch, MaterialRecord, OrderDraft, OrderPatch, OrderRecord,
};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Transport failure: {0}")]
    Transport(String),
    #[error("Server responded with {status}: {message}")]
    Status { status: u16, message: String },
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Remote inventory backend. Any `Err` means the write was not confirmed.
#[async_trait]
pub trait RemoteInventoryApi: Send + Sync {
    async fn list_materials(&self) -> Result<Vec<MaterialRecord>, RemoteError>;
    async fn get_material(&self, id: &str) -> Result<Option<MaterialRecord>, RemoteError>;
    async fn create_material(&self, draft: &MaterialDraft) -> Result<MaterialRecord, RemoteError>;
    async fn update_material(
        &self,
        id: &str,
        patch: &MaterialPatch,
    ) -> Result<MaterialRecord, RemoteError>;
    async fn delete_material(&self, id: &str) -> Result<(), RemoteError>;

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, RemoteError>;
    async fn get_order(&self, id: &str) -> Result<Option<OrderRecord>, RemoteError>;
    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderRecord, RemoteError>;
    async fn update_order(&self, id: &str, patch: &OrderPatch) -> Result<OrderRecord, RemoteError>;
    async fn delete_order(&self, id: &str) -> Result<(), RemoteError>;
}
