use crate::error::{OpsError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const OPSDESK_DIR: &str = ".opsdesk";

pub const CONFIG_FILE: &str = ".opsdesk/config.yaml";
pub const ACTIVITY_DB: &str = ".opsdesk/activity.redb";

/// Collection names — one directory of JSON documents per collection.
pub const OPPORTUNITIES: &str = "opportunities";
pub const MEMBERS: &str = "members";
pub const PARTNERS: &str = "partners";
pub const KEYS: &str = "keys";
pub const SCHEDULES: &str = "schedules";
pub const BOOKINGS: &str = "bookings";
pub const TRACKER: &str = "tracker";
pub const EMPLOYEES: &str = "employees";
pub const CHATS: &str = "chats";
pub const ROCKS: &str = "rocks";

pub const ALL_COLLECTIONS: &[&str] = &[
    OPPORTUNITIES,
    MEMBERS,
    PARTNERS,
    KEYS,
    SCHEDULES,
    BOOKINGS,
    TRACKER,
    EMPLOYEES,
    CHATS,
    ROCKS,
];

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn opsdesk_dir(root: &Path) -> PathBuf {
    root.join(OPSDESK_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn activity_db_path(root: &Path) -> PathBuf {
    root.join(ACTIVITY_DB)
}

pub fn collection_dir(root: &Path, collection: &str) -> PathBuf {
    opsdesk_dir(root).join(collection)
}

pub fn doc_path(root: &Path, collection: &str, id: &str) -> PathBuf {
    collection_dir(root, collection).join(format!("{id}.json"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

static SLUG_RE: OnceLock<Regex> = OnceLock::new();
static QUARTER_RE: OnceLock<Regex> = OnceLock::new();

fn slug_re() -> &'static Regex {
    SLUG_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9\-]*[a-z0-9]$|^[a-z0-9]$").unwrap())
}

fn quarter_re() -> &'static Regex {
    QUARTER_RE.get_or_init(|| Regex::new(r"^\d{4}-Q[1-4]$").unwrap())
}

pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() || slug.len() > 64 || !slug_re().is_match(slug) {
        return Err(OpsError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

/// Quarter labels for rocks, e.g. "2026-Q3".
pub fn validate_quarter(quarter: &str) -> Result<()> {
    if !quarter_re().is_match(quarter) {
        return Err(OpsError::InvalidQuarter(quarter.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
