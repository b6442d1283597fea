use crate::application::ports::remote_api::{RemoteError, RemoteInventoryApi};
use crate::domain::entities::{
    MaterialDraft, MaterialPatch, MaterialRecord, OrderDraft, OrderPatch, OrderRecord,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// REST client for the inventory backend.
pub struct HttpRemoteApi {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl HttpRemoteApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let base_url = Url::parse(base_url.trim())
            .map_err(|e| AppError::ConfigurationError(format!("Remote base url: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::ConfigurationError(format!(
                "Remote base url cannot carry a path: {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigurationError(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Appends percent-encoded path segments to the base url.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, RemoteError> {
        self.authorized(request)
            .send()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, RemoteError> {
        let response = ensure_success(self.send(request).await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<Option<T>, RemoteError> {
        let response = self.send(request).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response).await?;
        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    async fn execute(&self, request: RequestBuilder) -> Result<(), RemoteError> {
        ensure_success(self.send(request).await?).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(RemoteError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl RemoteInventoryApi for HttpRemoteApi {
    async fn list_materials(&self) -> Result<Vec<MaterialRecord>, RemoteError> {
        self.fetch_json(self.client.get(self.url(&["materials"]))).await
    }

    async fn get_material(&self, id: &str) -> Result<Option<MaterialRecord>, RemoteError> {
        self.fetch_optional(self.client.get(self.url(&["materials", id])))
            .await
    }

    async fn create_material(&self, draft: &MaterialDraft) -> Result<MaterialRecord, RemoteError> {
        self.fetch_json(self.client.post(self.url(&["materials"])).json(draft))
            .await
    }

    async fn update_material(
        &self,
        id: &str,
        patch: &MaterialPatch,
    ) -> Result<MaterialRecord, RemoteError> {
        self.fetch_json(
            self.client
                .put(self.url(&["materials", id]))
                .json(patch),
        )
        .await
    }

    async fn delete_material(&self, id: &str) -> Result<(), RemoteError> {
        self.execute(self.client.delete(self.url(&["materials", id])))
            .await
    }

    async fn list_orders(&self) -> Result<Vec<OrderRecord>, RemoteError> {
        self.fetch_json(self.client.get(self.url(&["orders"]))).await
    }

    async fn get_order(&self, id: &str) -> Result<Option<OrderRecord>, RemoteError> {
        self.fetch_optional(self.client.get(self.url(&["orders", id])))
            .await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<OrderRecord, RemoteError> {
        self.fetch_json(self.client.post(self.url(&["orders"])).json(draft))
            .await
    }

    async fn update_order(&self, id: &str, patch: &OrderPatch) -> Result<OrderRecord, RemoteError> {
        self.fetch_json(self.client.put(self.url(&["orders", id])).json(patch))
            .await
    }

    async fn delete_order(&self, id: &str) -> Result<(), RemoteError> {
        self.execute(self.client.delete(self.url(&["orders", id])))
            .await
    }
}
