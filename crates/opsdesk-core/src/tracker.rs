use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use crate::types::{TrackerKind, TrackerPriority, TrackerStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// ItemComment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemComment {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// TrackerItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub kind: TrackerKind,
    pub status: TrackerStatus,
    pub priority: TrackerPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reporter: Option<String>,
    #[serde(default)]
    pub comments: Vec<ItemComment>,
    /// Monotonic counter backing comment IDs. Incrementing it before
    /// generating the ID keeps IDs unique even after comments are removed,
    /// which a length-based scheme would not.
    #[serde(default)]
    pub next_comment_seq: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TrackerItem {
    pub fn new(title: impl Into<String>, kind: TrackerKind) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: String::new(),
            kind,
            status: TrackerStatus::Open,
            priority: TrackerPriority::Medium,
            reporter: None,
            comments: Vec::new(),
            next_comment_seq: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: TrackerStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn set_priority(&mut self, priority: TrackerPriority) {
        self.priority = priority;
        self.updated_at = Utc::now();
    }

    /// Append a comment and return its generated ID.
    pub fn add_comment(&mut self, body: impl Into<String>, author: Option<String>) -> String {
        self.next_comment_seq += 1;
        let id = format!("C{}", self.next_comment_seq);
        self.comments.push(ItemComment {
            id: id.clone(),
            author,
            body: body.into(),
            created_at: Utc::now(),
        });
        self.updated_at = Utc::now();
        id
    }

    /// Remove a comment by ID.
    pub fn resolve_comment(&mut self, comment_id: &str) -> Result<()> {
        let pos = self
            .comments
            .iter()
            .position(|c| c.id == comment_id)
            .ok_or_else(|| OpsError::CommentNotFound(comment_id.to_string()))?;
        self.comments.remove(pos);
        self.updated_at = Utc::now();
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::TRACKER, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::TRACKER, id)?
            .ok_or_else(|| OpsError::ItemNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::TRACKER)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::TRACKER, id)? {
            return Err(OpsError::ItemNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Human-readable summary: "4 open, 2 in progress, 7 resolved"
pub fn summarize(items: &[TrackerItem]) -> String {
    let open = items
        .iter()
        .filter(|i| i.status == TrackerStatus::Open)
        .count();
    let in_progress = items
        .iter()
        .filter(|i| i.status == TrackerStatus::InProgress)
        .count();
    let resolved = items
        .iter()
        .filter(|i| matches!(i.status, TrackerStatus::Resolved | TrackerStatus::Closed))
        .count();
    format!("{open} open, {in_progress} in progress, {resolved} resolved")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
