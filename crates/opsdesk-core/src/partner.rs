use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// A recorded session (call, workshop) linked from the partner record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recorded_on: Option<NaiveDate>,
}

// ---------------------------------------------------------------------------
// Partner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Partner {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default)]
    pub expertise: Vec<String>,
    #[serde(default)]
    pub recordings: Vec<Recording>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partner {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            phone: None,
            company: None,
            expertise: Vec::new(),
            recordings: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn add_recording(&mut self, recording: Recording) {
        self.recordings.push(recording);
        self.updated_at = Utc::now();
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::PARTNERS, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::PARTNERS, id)?
            .ok_or_else(|| OpsError::PartnerNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::PARTNERS)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::PARTNERS, id)? {
            return Err(OpsError::PartnerNotFound(id.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn roundtrip_with_recordings() {
        let dir = TempDir::new().unwrap();
        let mut partner = Partner::new("Lee Tran", "lee@partners.io");
        partner.expertise = vec!["paid media".into(), "analytics".into()];
        partner.add_recording(Recording {
            title: "Intro call".into(),
            url: "https://video.example.com/r/123".into(),
            recorded_on: NaiveDate::from_ymd_opt(2026, 3, 14),
        });
        partner.save(dir.path()).unwrap();

        let loaded = Partner::load(dir.path(), &partner.id).unwrap();
        assert_eq!(loaded.expertise.len(), 2);
        assert_eq!(loaded.recordings.len(), 1);
        assert_eq!(loaded.recordings[0].title, "Intro call");
    }

    #[test]
    fn load_missing_errors() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Partner::load(dir.path(), "nope"),
            Err(OpsError::PartnerNotFound(_))
        ));
    }
}
