//! JSON document collections on disk.
//!
//! Each collection is a directory under `.opsdesk/`; each document is a
//! single `<id>.json` file written atomically. There is no schema layer and
//! no cross-collection integrity: a stored reference to another collection
//! may dangle, and readers must tolerate that.

use crate::error::Result;
use crate::io::atomic_write;
use crate::paths;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Serialize and write one document. Creates the collection directory on
/// first write.
pub fn write_doc<T: Serialize>(root: &Path, collection: &str, id: &str, doc: &T) -> Result<()> {
    let path = paths::doc_path(root, collection, id);
    let data = serde_json::to_vec_pretty(doc)?;
    atomic_write(&path, &data)
}

/// Read one document. Returns `None` when the file does not exist; the
/// caller maps that to its own not-found error.
pub fn read_doc<T: DeserializeOwned>(root: &Path, collection: &str, id: &str) -> Result<Option<T>> {
    let path = paths::doc_path(root, collection, id);
    if !path.exists() {
        return Ok(None);
    }
    let data = std::fs::read_to_string(&path)?;
    Ok(Some(serde_json::from_str(&data)?))
}

/// Read every document in a collection, in directory order. Documents that
/// fail to parse are skipped with a warning so one corrupt file cannot take
/// down a whole listing.
pub fn list_docs<T: DeserializeOwned>(root: &Path, collection: &str) -> Result<Vec<T>> {
    let dir = paths::collection_dir(root, collection);
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut docs = Vec::new();
    for entry in std::fs::read_dir(&dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let data = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&data) {
            Ok(doc) => docs.push(doc),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable document");
            }
        }
    }
    Ok(docs)
}

/// Delete one document. Returns `true` if a file was removed.
pub fn delete_doc(root: &Path, collection: &str, id: &str) -> Result<bool> {
    let path = paths::doc_path(root, collection, id);
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(&path)?;
    Ok(true)
}

pub fn doc_exists(root: &Path, collection: &str, id: &str) -> bool {
    paths::doc_path(root, collection, id).exists()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Doc {
        id: String,
        label: String,
    }

    #[test]
    fn write_read_roundtrip() {
        let dir = TempDir::new().unwrap();
        let doc = Doc {
            id: "d1".into(),
            label: "first".into(),
        };
        write_doc(dir.path(), "things", "d1", &doc).unwrap();
        let loaded: Doc = read_doc(dir.path(), "things", "d1").unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn read_missing_returns_none() {
        let dir = TempDir::new().unwrap();
        let loaded: Option<Doc> = read_doc(dir.path(), "things", "nope").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn list_missing_collection_is_empty() {
        let dir = TempDir::new().unwrap();
        let docs: Vec<Doc> = list_docs(dir.path(), "things").unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn list_skips_corrupt_documents() {
        let dir = TempDir::new().unwrap();
        let doc = Doc {
            id: "ok".into(),
            label: "fine".into(),
        };
        write_doc(dir.path(), "things", "ok", &doc).unwrap();
        std::fs::write(
            crate::paths::doc_path(dir.path(), "things", "bad"),
            b"not json",
        )
        .unwrap();

        let docs: Vec<Doc> = list_docs(dir.path(), "things").unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].id, "ok");
    }

    #[test]
    fn list_ignores_non_json_files() {
        let dir = TempDir::new().unwrap();
        let doc = Doc {
            id: "ok".into(),
            label: "fine".into(),
        };
        write_doc(dir.path(), "things", "ok", &doc).unwrap();
        std::fs::write(
            crate::paths::collection_dir(dir.path(), "things").join("notes.txt"),
            b"scratch",
        )
        .unwrap();

        let docs: Vec<Doc> = list_docs(dir.path(), "things").unwrap();
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn delete_doc_removes_file() {
        let dir = TempDir::new().unwrap();
        let doc = Doc {
            id: "d1".into(),
            label: "x".into(),
        };
        write_doc(dir.path(), "things", "d1", &doc).unwrap();
        assert!(delete_doc(dir.path(), "things", "d1").unwrap());
        assert!(!doc_exists(dir.path(), "things", "d1"));
        // Second delete is a no-op
        assert!(!delete_doc(dir.path(), "things", "d1").unwrap());
    }
}
