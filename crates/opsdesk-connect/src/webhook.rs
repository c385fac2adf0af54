use crate::error::{ConnectError, Result};
use serde_json::Value;

/// Poster for the chat workspace's incoming webhook.
///
/// One POST per event, no retries: callers fire-and-forget and log failures.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    url: String,
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn post(&self, payload: &Value) -> Result<()> {
        let resp = self.http.post(&self.url).json(payload).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ConnectError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}
