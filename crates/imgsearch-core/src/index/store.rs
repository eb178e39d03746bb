//! Index persistence as a single JSON document.
//!
//! `save` writes to a sibling temp file and renames it into place, so a
//! crash mid-write never leaves a truncated index behind.

use super::Index;
use crate::error::StoreError;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Reads and writes the index file at a fixed path.
pub struct IndexStore {
    path: PathBuf,
}

impl IndexStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the persisted index.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist the index, replacing any previous file atomically.
    pub fn save(&self, index: &Index) -> Result<(), StoreError> {
        let json = serde_json::to_vec(index).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json).map_err(|e| StoreError::Io {
            path: tmp.clone(),
            source: e,
        })?;
        std::fs::rename(&tmp, &self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        tracing::debug!(
            "Saved index with {} labels to {}",
            index.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Load the persisted index.
    ///
    /// A missing file maps to `StoreError::NotFound` so callers can suggest
    /// running a build; anything unreadable or undecodable is reported as-is.
    pub fn load(&self) -> Result<Index, StoreError> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StoreError::NotFound(self.path.clone())
            } else {
                StoreError::Io {
                    path: self.path.clone(),
                    source: e,
                }
            }
        })?;

        serde_json::from_str(&content).map_err(|e| StoreError::Parse {
            path: self.path.clone(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexEntry;

    fn sample_index() -> Index {
        let mut index = Index::new();
        index.insert("dog", IndexEntry::new("http://b.jpg", 0.95));
        index.insert("dog", IndexEntry::new("http://a.jpg", 0.9));
        index.insert("cat", IndexEntry::new("http://a.jpg", 0.5));
        index.finalize();
        index
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));

        let index = sample_index();
        store.save(&index).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, index);
        // order inside a label survives the trip
        assert_eq!(loaded.lookup("dog").unwrap()[0].image, "http://b.jpg");
    }

    #[test]
    fn test_save_overwrites_previous_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("index.json"));

        store.save(&sample_index()).unwrap();
        let mut smaller = Index::new();
        smaller.insert("bird", IndexEntry::new("http://c.jpg", 0.4));
        store.save(&smaller).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.lookup("dog").is_none());
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path().join("absent.json"));

        match store.load() {
            Err(StoreError::NotFound(path)) => {
                assert!(path.ends_with("absent.json"));
            }
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_load_garbage_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        std::fs::write(&path, "not json at all {").unwrap();

        let store = IndexStore::new(path);
        match store.load() {
            Err(StoreError::Parse { .. }) => {}
            other => panic!("Expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_persisted_document_shape() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");
        let store = IndexStore::new(&path);

        let mut index = Index::new();
        index.insert("metro", IndexEntry::new("http://m.jpg", 0.87));
        store.save(&index).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["terms"]["metro"][0]["image"], "http://m.jpg");
        assert_eq!(raw["terms"]["metro"][0]["score"], 0.87);
    }
}
