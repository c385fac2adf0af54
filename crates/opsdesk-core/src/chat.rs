use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ChatRole / ChatMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for ChatRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
            ChatRole::System => "system",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

/// A conversation with one AI employee. `employee_id` is a plain reference;
/// the employee may have been deleted since.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub employee_id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chat {
    pub fn open(employee_id: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            employee_id: employee_id.into(),
            title: title.into(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            content: content.into(),
            sent_at: Utc::now(),
        });
        self.updated_at = Utc::now();
    }

    /// Messages in the wire shape the completion API expects (system turns
    /// excluded; the persona travels separately).
    pub fn transcript(&self) -> Vec<(&str, &str)> {
        self.messages
            .iter()
            .filter(|m| m.role != ChatRole::System)
            .map(|m| {
                let role = match m.role {
                    ChatRole::User => "user",
                    _ => "assistant",
                };
                (role, m.content.as_str())
            })
            .collect()
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::CHATS, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::CHATS, id)?
            .ok_or_else(|| OpsError::ChatNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::CHATS)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::CHATS, id)? {
            return Err(OpsError::ChatNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn push_appends_in_order() {
        let mut chat = Chat::open("emp-1", "Q3 campaign ideas");
        chat.push(ChatRole::User, "Draft three taglines");
        chat.push(ChatRole::Assistant, "1. ...");
        assert_eq!(chat.messages.len(), 2);
        assert_eq!(chat.messages[0].role, ChatRole::User);
    }

    #[test]
    fn transcript_skips_system_turns() {
        let mut chat = Chat::open("emp-1", "t");
        chat.push(ChatRole::System, "persona");
        chat.push(ChatRole::User, "hi");
        chat.push(ChatRole::Assistant, "hello");

        let transcript = chat.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[0], ("user", "hi"));
        assert_eq!(transcript[1], ("assistant", "hello"));
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut chat = Chat::open("emp-1", "t");
        chat.push(ChatRole::User, "hi");
        chat.save(dir.path()).unwrap();

        let loaded = Chat::load(dir.path(), &chat.id).unwrap();
        assert_eq!(loaded.messages.len(), 1);
        assert_eq!(loaded.employee_id, "emp-1");
    }
}
