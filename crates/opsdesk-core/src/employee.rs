use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// EmployeeRole
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    Assistant,
    Researcher,
    Copywriter,
    Analyst,
}

impl EmployeeRole {
    pub fn as_str(self) -> &'static str {
        match self {
            EmployeeRole::Assistant => "assistant",
            EmployeeRole::Researcher => "researcher",
            EmployeeRole::Copywriter => "copywriter",
            EmployeeRole::Analyst => "analyst",
        }
    }
}

impl fmt::Display for EmployeeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EmployeeRole {
    type Err = crate::error::OpsError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "assistant" => Ok(EmployeeRole::Assistant),
            "researcher" => Ok(EmployeeRole::Researcher),
            "copywriter" => Ok(EmployeeRole::Copywriter),
            "analyst" => Ok(EmployeeRole::Analyst),
            _ => Err(OpsError::InvalidRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Employee
// ---------------------------------------------------------------------------

/// An AI "employee": a named persona routed to the completion API. The
/// persona text becomes the system prompt of every chat it holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: EmployeeRole,
    pub persona: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Employee {
    pub fn new(name: impl Into<String>, role: EmployeeRole, persona: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            role,
            persona: persona.into(),
            model: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::EMPLOYEES, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::EMPLOYEES, id)?
            .ok_or_else(|| OpsError::EmployeeNotFound(id.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::EMPLOYEES)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::EMPLOYEES, id)? {
            return Err(OpsError::EmployeeNotFound(id.to_string()));
        }
        Ok(())
    }
}
