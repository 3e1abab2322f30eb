//! Fingerprint-state persistence.
//!
//! The change tracker only needs two operations over the previous run's
//! fingerprint set, so the store is a small trait: tests run against the
//! in-memory implementation, the pipeline against the newline-separated
//! `change_hash.txt` file.

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Persistence seam for the previous run's dataset fingerprints
pub trait ChangeStore {
    /// Load the prior fingerprint set; None means no prior state (first run)
    fn load(&self) -> Result<Option<Vec<String>>>;

    /// Overwrite the persisted fingerprint set with the current one
    fn save(&self, hashes: &[String]) -> Result<()>;
}

/// Newline-separated hash file under the data directory
pub struct FileChangeStore {
    path: PathBuf,
}

impl FileChangeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ChangeStore for FileChangeStore {
    fn load(&self) -> Result<Option<Vec<String>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)?;
        let hashes = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Ok(Some(hashes))
    }

    fn save(&self, hashes: &[String]) -> Result<()> {
        std::fs::write(&self.path, hashes.join("\n"))?;
        Ok(())
    }
}

/// In-memory store for tests
#[derive(Default)]
pub struct MemoryChangeStore {
    state: Mutex<Option<Vec<String>>>,
}

impl MemoryChangeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed prior state, as if a previous run had persisted it
    pub fn with_state(hashes: Vec<String>) -> Self {
        Self {
            state: Mutex::new(Some(hashes)),
        }
    }
}

impl ChangeStore for MemoryChangeStore {
    fn load(&self) -> Result<Option<Vec<String>>> {
        Ok(self.state.lock().unwrap().clone())
    }

    fn save(&self, hashes: &[String]) -> Result<()> {
        *self.state.lock().unwrap() = Some(hashes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_missing_file_is_first_run() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileChangeStore::new(dir.path().join("change_hash.txt"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_roundtrip_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("change_hash.txt");
        std::fs::write(&path, "aaa\n\nbbb\n").unwrap();

        let store = FileChangeStore::new(&path);
        assert_eq!(
            store.load().unwrap(),
            Some(vec!["aaa".to_string(), "bbb".to_string()])
        );

        store.save(&["ccc".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "ccc");
    }
}
