//! `opsdesk-connect` — clients for the external services the portal talks
//! to: the chat workspace's incoming webhook, the playbook automation REST
//! API, the read-only banking data provider, and the LLM completion endpoint
//! behind the AI employees.
//!
//! All clients are thin typed pass-throughs over `reqwest`: no retries, no
//! caching, no domain logic. Base URLs are injected so tests can point them
//! at a local mock server.

pub mod assistant;
pub mod bank;
pub mod error;
pub mod playbooks;
pub mod webhook;

pub use assistant::{CompletionClient, WireMessage};
pub use bank::{BankAccount, BankClient, Transaction};
pub use error::{token_from_env, ConnectError};
pub use playbooks::{Checklist, ChecklistItem, Playbook, PlaybooksClient, StartRun};
pub use webhook::WebhookClient;

/// Convenience `Result` alias for this crate.
pub type Result<T> = std::result::Result<T, ConnectError>;
