use crate::error::{OpsError, Result};
use crate::paths;
use crate::store;
use crate::types::KeyStatus;
use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// The entitlement that grants every tool. When present it replaces any
/// individual tool selection.
pub const ALL_TOOLS: &str = "all";

// Code alphabet omits 0/O/1/I to keep keys readable over the phone.
const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

// ---------------------------------------------------------------------------
// SoftwareKey
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoftwareKey {
    pub id: String,
    /// Human-entered license code, `XXXX-XXXX-XXXX-XXXX`.
    pub code: String,
    /// Tool entitlements. Either a list of tool names or the single `"all"`
    /// entry; never both.
    pub tools: Vec<String>,
    pub status: KeyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_on: Option<NaiveDate>,
    pub max_activations: u32,
    #[serde(default)]
    pub activations: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Generate a fresh license code in `XXXX-XXXX-XXXX-XXXX` form.
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    let mut groups = Vec::with_capacity(4);
    for _ in 0..4 {
        let group: String = (0..4)
            .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
            .collect();
        groups.push(group);
    }
    groups.join("-")
}

/// Collapse a tool selection: the `"all"` entitlement clears individual
/// picks, and duplicates are dropped while preserving order.
pub fn normalize_tools(tools: Vec<String>) -> Vec<String> {
    if tools.iter().any(|t| t == ALL_TOOLS) {
        return vec![ALL_TOOLS.to_string()];
    }
    let mut seen = std::collections::HashSet::new();
    tools.into_iter().filter(|t| seen.insert(t.clone())).collect()
}

impl SoftwareKey {
    pub fn issue(tools: Vec<String>, max_activations: u32, expires_on: Option<NaiveDate>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            code: generate_code(),
            tools: normalize_tools(tools),
            status: KeyStatus::Active,
            expires_on,
            max_activations,
            activations: 0,
            issued_to: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Status with date expiry folded in: an `Active` key past its expiry
    /// date reads as `Expired` without a separate write.
    pub fn effective_status(&self, today: NaiveDate) -> KeyStatus {
        match self.status {
            KeyStatus::Active => match self.expires_on {
                Some(d) if d < today => KeyStatus::Expired,
                _ => KeyStatus::Active,
            },
            other => other,
        }
    }

    pub fn grants(&self, tool: &str) -> bool {
        self.tools.iter().any(|t| t == ALL_TOOLS || t == tool)
    }

    /// Consume one activation. Fails when the key is revoked, expired by
    /// date, or already at its activation cap.
    pub fn activate(&mut self, today: NaiveDate) -> Result<()> {
        match self.effective_status(today) {
            KeyStatus::Active => {}
            other => return Err(OpsError::KeyInactive(format!("{} is {other}", self.code))),
        }
        if self.activations >= self.max_activations {
            return Err(OpsError::ActivationLimit(self.code.clone()));
        }
        self.activations += 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn revoke(&mut self) {
        self.status = KeyStatus::Revoked;
        self.updated_at = Utc::now();
    }

    pub fn set_tools(&mut self, tools: Vec<String>) {
        self.tools = normalize_tools(tools);
        self.updated_at = Utc::now();
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn save(&self, root: &Path) -> Result<()> {
        store::write_doc(root, paths::KEYS, &self.id, self)
    }

    pub fn load(root: &Path, id: &str) -> Result<Self> {
        store::read_doc(root, paths::KEYS, id)?.ok_or_else(|| OpsError::KeyNotFound(id.to_string()))
    }

    /// Look a key up by its human-entered code.
    pub fn find_by_code(root: &Path, code: &str) -> Result<Self> {
        Self::list(root)?
            .into_iter()
            .find(|k| k.code == code)
            .ok_or_else(|| OpsError::KeyNotFound(code.to_string()))
    }

    pub fn list(root: &Path) -> Result<Vec<Self>> {
        let mut all: Vec<Self> = store::list_docs(root, paths::KEYS)?;
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(all)
    }

    pub fn delete(root: &Path, id: &str) -> Result<()> {
        if !store::delete_doc(root, paths::KEYS, id)? {
            return Err(OpsError::KeyNotFound(id.to_string()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 1).unwrap()
    }

    #[test]
    fn generated_code_shape() {
        let code = generate_code();
        assert_eq!(code.len(), 19);
        let groups: Vec<&str> = code.split('-').collect();
        assert_eq!(groups.len(), 4);
        for g in groups {
            assert_eq!(g.len(), 4);
            assert!(g.chars().all(|c| !"0O1I".contains(c)));
        }
    }

    #[test]
    fn all_tools_clears_individual_selection() {
        let tools = normalize_tools(vec!["reporter".into(), "all".into(), "planner".into()]);
        assert_eq!(tools, vec!["all".to_string()]);
    }

    #[test]
    fn normalize_drops_duplicates() {
        let tools = normalize_tools(vec!["reporter".into(), "reporter".into(), "planner".into()]);
        assert_eq!(tools, vec!["reporter".to_string(), "planner".to_string()]);
    }

    #[test]
    fn grants_via_all() {
        let key = SoftwareKey::issue(vec!["all".into()], 1, None);
        assert!(key.grants("anything"));
    }

    #[test]
    fn grants_specific_tool_only() {
        let key = SoftwareKey::issue(vec!["reporter".into()], 1, None);
        assert!(key.grants("reporter"));
        assert!(!key.grants("planner"));
    }

    #[test]
    fn activation_cap_enforced() {
        let mut key = SoftwareKey::issue(vec!["all".into()], 2, None);
        key.activate(today()).unwrap();
        key.activate(today()).unwrap();
        assert!(matches!(
            key.activate(today()),
            Err(OpsError::ActivationLimit(_))
        ));
        assert_eq!(key.activations, 2);
    }

    #[test]
    fn expired_key_rejects_activation() {
        let expiry = NaiveDate::from_ymd_opt(2026, 7, 31).unwrap();
        let mut key = SoftwareKey::issue(vec!["all".into()], 5, Some(expiry));
        assert_eq!(key.effective_status(today()), KeyStatus::Expired);
        assert!(matches!(key.activate(today()), Err(OpsError::KeyInactive(_))));
    }

    #[test]
    fn key_valid_on_expiry_date() {
        let mut key = SoftwareKey::issue(vec!["all".into()], 5, Some(today()));
        assert_eq!(key.effective_status(today()), KeyStatus::Active);
        key.activate(today()).unwrap();
    }

    #[test]
    fn revoked_key_rejects_activation() {
        let mut key = SoftwareKey::issue(vec!["all".into()], 5, None);
        key.revoke();
        assert!(matches!(key.activate(today()), Err(OpsError::KeyInactive(_))));
    }

    #[test]
    fn find_by_code() {
        let dir = TempDir::new().unwrap();
        let key = SoftwareKey::issue(vec!["reporter".into()], 3, None);
        key.save(dir.path()).unwrap();

        let found = SoftwareKey::find_by_code(dir.path(), &key.code).unwrap();
        assert_eq!(found.id, key.id);
        assert!(SoftwareKey::find_by_code(dir.path(), "XXXX-XXXX-XXXX-XXXX").is_err());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let key = SoftwareKey::issue(vec!["reporter".into(), "planner".into()], 3, None);
        key.save(dir.path()).unwrap();
        let loaded = SoftwareKey::load(dir.path(), &key.id).unwrap();
        assert_eq!(loaded.code, key.code);
        assert_eq!(loaded.tools.len(), 2);
    }
}
