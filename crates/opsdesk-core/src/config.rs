use crate::error::{OpsError, Result};
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// NotificationsConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationsConfig {
    /// Incoming-webhook URL of the chat workspace. Absent → posting is skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
    #[serde(default = "default_webhook_username")]
    pub username: String,
}

fn default_webhook_username() -> String {
    "opsdesk".to_string()
}

// ---------------------------------------------------------------------------
// BookingConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Minutes between generated slot starts. Absent → the meeting duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slot_step_minutes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Integration endpoints
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankIntegration {
    pub api_base: String,
    /// Name of the environment variable holding the API token.
    pub token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybooksIntegration {
    pub api_base: String,
    pub token_env: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantIntegration {
    pub api_base: String,
    pub model: String,
    pub key_env: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    1024
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntegrationsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<BankIntegration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playbooks: Option<PlaybooksIntegration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant: Option<AssistantIntegration>,
}

// ---------------------------------------------------------------------------
// ProjectConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub project: ProjectConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub integrations: IntegrationsConfig,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            project: ProjectConfig {
                name: project_name.into(),
                description: None,
            },
            notifications: NotificationsConfig::default(),
            booking: BookingConfig::default(),
            integrations: IntegrationsConfig::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(OpsError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if let Some(url) = &self.notifications.webhook_url {
            if url.starts_with("http://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: "notifications.webhook_url uses plain http".to_string(),
                });
            } else if !url.starts_with("https://") {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("notifications.webhook_url is not a URL: {url}"),
                });
            }
        }

        if self.booking.slot_step_minutes == Some(0) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "booking.slot_step_minutes must be greater than zero".to_string(),
            });
        }

        let token_envs = [
            self.integrations.bank.as_ref().map(|b| &b.token_env),
            self.integrations.playbooks.as_ref().map(|p| &p.token_env),
            self.integrations.assistant.as_ref().map(|a| &a.key_env),
        ];
        for env in token_envs.into_iter().flatten() {
            if std::env::var(env).is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("environment variable '{env}' is not set"),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
