use crate::error::{ConnectError, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct WireMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: &'a [WireMessage],
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    content: Vec<ContentBlock>,
}

// ---------------------------------------------------------------------------
// CompletionClient
// ---------------------------------------------------------------------------

/// Client for the messages-style LLM completion endpoint behind the AI
/// employees. One request per user turn; the chat history travels whole.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    api_base: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    http: reqwest::Client,
}

impl CompletionClient {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        max_tokens: u32,
    ) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            max_tokens,
            http: reqwest::Client::new(),
        }
    }

    /// Run one completion over the transcript and return the reply text
    /// (first text block of the response content).
    pub async fn complete(
        &self,
        system: Option<&str>,
        messages: &[WireMessage],
        model_override: Option<&str>,
    ) -> Result<String> {
        let url = format!("{}/v1/messages", self.api_base);
        let request = CompletionRequest {
            model: model_override.unwrap_or(&self.model),
            max_tokens: self.max_tokens,
            system,
            messages,
        };

        let resp = self
            .http
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&request)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ConnectError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let body = resp.text().await?;
        let parsed: CompletionResponse =
            serde_json::from_str(&body).map_err(|e| ConnectError::Decode(e.to_string()))?;
        parsed
            .content
            .into_iter()
            .find(|b| b.kind == "text")
            .map(|b| b.text)
            .ok_or_else(|| ConnectError::Decode("no text block in response".to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
