use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use crate::types::MemberRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Team member, affiliate, or contractor. The original system kept one
/// directory for all three, distinguished by role and a client flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub role: MemberRole,
    #[serde(default)]
    pub is_client: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    pub fn new(name: impl Into<String>, email: impl Into<String>, role: MemberRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            phone: None,
            company: None,
            role,
            is_client: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::MEMBERS, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::MEMBERS, id)?
            .ok_or_else(|| OpsError::MemberNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::MEMBERS)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::MEMBERS, id)? {
            return Err(OpsError::MemberNotFound(id.to_string()));
        }
        Ok(())
    }
}

/// Members holding a given role, listing order preserved.
pub fn with_role(members: &[Member], role: MemberRole) -> Vec<&Member> {
    members.iter().filter(|m| m.role == role).collect()
}
