use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use crate::types::RockStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Quarterly goal (EOS "rock"): one owner, one quarter, tracked to done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rock {
    pub id: String,
    pub title: String,
    pub owner: String,
    /// Quarter label, e.g. "2026-Q3".
    pub quarter: String,
    pub status: RockStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rock {
    pub fn new(
        title: impl Into<String>,
        owner: impl Into<String>,
        quarter: impl Into<String>,
    ) -> Result<Self> {
        let quarter = quarter.into();
        paths::validate_quarter(&quarter)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            owner: owner.into(),
            quarter,
            status: RockStatus::OnTrack,
            due_on: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn set_status(&mut self, status: RockStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::ROCKS, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::ROCKS, id)?
            .ok_or_else(|| OpsError::RockNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::ROCKS)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::ROCKS, id)? {
            return Err(OpsError::RockNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Rocks for a quarter, owner order preserved.
pub fn for_quarter<'a>(rocks: &'a [Rock], quarter: &str) -> Vec<&'a Rock> {
    rocks.iter().filter(|r| r.quarter == quarter).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn new_rock_validates_quarter() {
        assert!(Rock::new("Ship portal v2", "Dana", "2026-Q3").is_ok());
        assert!(matches!(
            Rock::new("Bad", "Dana", "Q3-2026"),
            Err(OpsError::InvalidQuarter(_))
        ));
    }

    #[test]
    fn status_lifecycle() {
        let mut rock = Rock::new("Ship portal v2", "Dana", "2026-Q3").unwrap();
        assert_eq!(rock.status, RockStatus::OnTrack);
        rock.set_status(RockStatus::Done);
        assert_eq!(rock.status, RockStatus::Done);
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let rock = Rock::new("Ship portal v2", "Dana", "2026-Q3").unwrap();
        rock.save(dir.path()).unwrap();
        let loaded = Rock::load(dir.path(), &rock.id).unwrap();
        assert_eq!(loaded.quarter, "2026-Q3");
    }

    #[test]
    fn for_quarter_filters() {
        let a = Rock::new("A", "Dana", "2026-Q3").unwrap();
        let b = Rock::new("B", "Lee", "2026-Q4").unwrap();
        let rocks = vec![a, b];
        let q3 = for_quarter(&rocks, "2026-Q3");
        assert_eq!(q3.len(), 1);
        assert_eq!(q3[0].title, "A");
    }
}
