use crate::error::{ConnectError, Result};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Wire types (subset of the playbook service's schema)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Checklist {
    pub title: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Playbook {
    #[serde(default)]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub checklists: Vec<Checklist>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybookList {
    pub total_count: u64,
    pub items: Vec<Playbook>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybookRun {
    pub id: String,
    pub name: String,
    pub playbook_id: String,
    #[serde(default)]
    pub current_status: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RunList {
    pub total_count: u64,
    pub items: Vec<PlaybookRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartRun {
    pub name: String,
    pub playbook_id: String,
}

// ---------------------------------------------------------------------------
// PlaybooksClient
// ---------------------------------------------------------------------------

/// Thin wrapper over the workflow/playbook service's REST API. The portal
/// only curates templates and kicks off runs; execution stays upstream.
#[derive(Debug, Clone)]
pub struct PlaybooksClient {
    api_base: String,
    token: String,
    http: reqwest::Client,
}

impl PlaybooksClient {
    pub fn new(api_base: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
            http: reqwest::Client::new(),
        }
    }

    pub async fn list_playbooks(&self) -> Result<PlaybookList> {
        let url = format!("{}/playbooks", self.api_base);
        self.request(self.http.get(&url)).await
    }

    pub async fn get_playbook(&self, id: &str) -> Result<Playbook> {
        let url = format!("{}/playbooks/{id}", self.api_base);
        self.request(self.http.get(&url)).await
    }

    pub async fn create_playbook(&self, playbook: &Playbook) -> Result<Playbook> {
        let url = format!("{}/playbooks", self.api_base);
        self.request(self.http.post(&url).json(playbook)).await
    }

    pub async fn update_playbook(&self, id: &str, playbook: &Playbook) -> Result<Playbook> {
        let url = format!("{}/playbooks/{id}", self.api_base);
        self.request(self.http.put(&url).json(playbook)).await
    }

    pub async fn delete_playbook(&self, id: &str) -> Result<()> {
        let url = format!("{}/playbooks/{id}", self.api_base);
        let resp = self
            .http
            .delete(&url)
            .bearer_auth(&self.token)
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
        Ok(())
    }

    pub async fn list_runs(&self) -> Result<RunList> {
        let url = format!("{}/runs", self.api_base);
        self.request(self.http.get(&url)).await
    }

    pub async fn start_run(&self, run: &StartRun) -> Result<PlaybookRun> {
        let url = format!("{}/runs", self.api_base);
        self.request(self.http.post(&url).json(run)).await
    }

    async fn request<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T> {
        let resp = req.bearer_auth(&self.token).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ConnectError::Api {
                status: status.as_u16(),
                body,
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| ConnectError::Decode(e.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
