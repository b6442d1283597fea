use crate::application::ports::connectivity::ReachabilityProbe;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Reachability check over plain HTTP `GET`. 2xx and 3xx count as reachable.
pub struct HttpReachabilityProbe {
    client: Client,
}

impl HttpReachabilityProbe {
    pub fn new() -> Self {
        // Redirects are not followed so a captive portal's 3xx still counts as
        // a response from the network.
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for HttpReachabilityProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReachabilityProbe for HttpReachabilityProbe {
    async fn probe(&self, url: &str, timeout: Duration) -> bool {
        match self.client.get(url).timeout(timeout).send().await {
            Ok(response) => {
                let status = response.status();
                status.is_success() || status.is_redirection()
            }
            Err(err) => {
                tracing::debug!(
                    target: "offline::connectivity",
                    url,
                    error = %err,
                    "reachability probe failed"
                );
                false
            }
        }
    }
}
