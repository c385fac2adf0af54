//! Activity log backed by redb.
//!
//! # Table design
//!
//! A single `ACTIVITY` table uses a 24-byte composite key:
//! ```text
//! [ timestamp_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//! ```
//!
//! Because the timestamp occupies the high bytes in big-endian encoding,
//! byte ordering equals timestamp ordering, so `since(t)` is a single range
//! scan and `recent(n)` walks the iterator from the back.
//!
//! Activity writes are a side channel: callers treat failures here as
//! non-fatal and log-and-continue.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{OpsError, Result};

// ---------------------------------------------------------------------------
// Table definition
// ---------------------------------------------------------------------------

/// Key: 24-byte composite (timestamp_ms big-endian ++ uuid bytes)
/// Value: JSON-encoded ActivityEntry
const ACTIVITY: TableDefinition<&[u8], &[u8]> = TableDefinition::new("activity");

// ---------------------------------------------------------------------------
// ActivityEntry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    /// Who did it — a member name, "public" for booking-page visitors, or
    /// "system".
    pub actor: String,
    /// Past-tense verb: "created", "revoked", "cancelled", ...
    pub verb: String,
    pub subject_kind: String,
    pub subject_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ActivityEntry {
    pub fn new(
        actor: impl Into<String>,
        verb: impl Into<String>,
        subject_kind: impl Into<String>,
        subject_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            at: Utc::now(),
            actor: actor.into(),
            verb: verb.into(),
            subject_kind: subject_kind.into(),
            subject_id: subject_id.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Key helpers
// ---------------------------------------------------------------------------

fn entry_key(ts: DateTime<Utc>, id: Uuid) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = ts.timestamp_millis().max(0) as u64;
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(id.as_bytes());
    key
}

/// Lower bound for a range scan returning all entries at or after `t`.
fn since_lower_bound(t: DateTime<Utc>) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = t.timestamp_millis().max(0) as u64;
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key
}

// ---------------------------------------------------------------------------
// ActivityLog
// ---------------------------------------------------------------------------

pub struct ActivityLog {
    db: Database,
}

impl ActivityLog {
    /// Open or create the activity database at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path).map_err(|e| OpsError::Activity(e.to_string()))?;
        // Ensure the table exists before any reads
        let wt = db
            .begin_write()
            .map_err(|e| OpsError::Activity(e.to_string()))?;
        wt.open_table(ACTIVITY)
            .map_err(|e| OpsError::Activity(e.to_string()))?;
        wt.commit().map_err(|e| OpsError::Activity(e.to_string()))?;
        Ok(Self { db })
    }

    /// Convenience: open the log under the standard project layout.
    pub fn open_at_root(root: &Path) -> Result<Self> {
        Self::open(&crate::paths::activity_db_path(root))
    }

    pub fn record(&self, entry: &ActivityEntry) -> Result<()> {
        let key = entry_key(entry.at, entry.id);
        let value = serde_json::to_vec(entry).map_err(|e| OpsError::Activity(e.to_string()))?;
        let wt = self
            .db
            .begin_write()
            .map_err(|e| OpsError::Activity(e.to_string()))?;
        {
            let mut table = wt
                .open_table(ACTIVITY)
                .map_err(|e| OpsError::Activity(e.to_string()))?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(|e| OpsError::Activity(e.to_string()))?;
        }
        wt.commit().map_err(|e| OpsError::Activity(e.to_string()))?;
        Ok(())
    }

    /// The `limit` most recent entries, newest first.
    pub fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>> {
        let rt = self
            .db
            .begin_read()
            .map_err(|e| OpsError::Activity(e.to_string()))?;
        let table = rt
            .open_table(ACTIVITY)
            .map_err(|e| OpsError::Activity(e.to_string()))?;

        let mut result = Vec::new();
        for entry in table
            .iter()
            .map_err(|e| OpsError::Activity(e.to_string()))?
            .rev()
            .take(limit)
        {
            let (_, v) = entry.map_err(|e| OpsError::Activity(e.to_string()))?;
            let parsed: ActivityEntry = serde_json::from_slice(v.value())
                .map_err(|e| OpsError::Activity(e.to_string()))?;
            result.push(parsed);
        }
        Ok(result)
    }

    /// All entries at or after `t`, oldest first.
    pub fn since(&self, t: DateTime<Utc>) -> Result<Vec<ActivityEntry>> {
        let lower = since_lower_bound(t);
        let rt = self
            .db
            .begin_read()
            .map_err(|e| OpsError::Activity(e.to_string()))?;
        let table = rt
            .open_table(ACTIVITY)
            .map_err(|e| OpsError::Activity(e.to_string()))?;

        let mut result = Vec::new();
        for entry in table
            .range(lower.as_slice()..)
            .map_err(|e| OpsError::Activity(e.to_string()))?
        {
            let (_, v) = entry.map_err(|e| OpsError::Activity(e.to_string()))?;
            let parsed: ActivityEntry = serde_json::from_slice(v.value())
                .map_err(|e| OpsError::Activity(e.to_string()))?;
            result.push(parsed);
        }
        Ok(result)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
