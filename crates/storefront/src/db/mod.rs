//! Local persistence for subscribers and affiliates.
//!
//! # Files
//!
//! Both stores live in the configured data directory as JSON arrays:
//!
//! - `subscribers.json` - subscriber email addresses, in subscription order
//! - `affiliates.json` - affiliate program records
//!
//! Each store is read once at startup and rewritten wholesale after every
//! successful mutation. A missing or unreadable file loads as an empty store.
//!
//! # Consistency
//!
//! Every store keeps its collection behind an async mutex that is held across
//! the whole check-mutate-persist sequence, so concurrent requests cannot both
//! pass a uniqueness check, and the file always reflects the latest in-memory
//! state. Writes go to a sibling temp file that is then renamed over the
//! target, so a crash never leaves a half-written file behind.
//!
//! A failed write is logged and otherwise ignored: the in-memory collection
//! stays authoritative for the rest of the process lifetime.

pub mod affiliates;
pub mod subscribers;

use std::path::{Path, PathBuf};

use affiliate_shop_core::AffiliateId;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use affiliates::{AffiliateRepository, AffiliateStore};
pub use subscribers::{SubscriberRepository, SubscriberStore};

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Request data failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The address is already subscribed (case-insensitive).
    #[error("already subscribed: {0}")]
    DuplicateSubscriber(String),

    /// No affiliate carries this id.
    #[error("affiliate not found: {0}")]
    NotFound(AffiliateId),
}

/// Errors writing a store file. Logged, never returned to callers.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A JSON array file rewritten atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    /// Create a handle for the file at `path`. Nothing is read or written yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the array, falling back to empty when the file is missing or
    /// cannot be parsed.
    #[must_use]
    pub fn load<T: DeserializeOwned>(&self) -> Vec<T> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "Store file not found, starting empty");
                return Vec::new();
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read store file, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Corrupt store file, starting empty");
                Vec::new()
            }
        }
    }

    /// Replace the file contents with `items`.
    ///
    /// # Errors
    ///
    /// Returns `PersistError` if serialization, the temp write, or the rename
    /// fails. The original file is untouched in that case.
    pub async fn save<T: Serialize + Sync>(&self, items: &[T]) -> Result<(), PersistError> {
        let json = serde_json::to_vec_pretty(items)?;
        let tmp = self.temp_path();

        tokio::fs::write(&tmp, json).await?;
        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        Ok(())
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Persist `items` if the store has a file, logging instead of failing.
async fn persist_best_effort<T: Serialize + Sync>(file: Option<&JsonFile>, items: &[T], store: &str) {
    let Some(file) = file else {
        return;
    };

    if let Err(e) = file.save(items).await {
        tracing::warn!(
            store,
            path = %file.path().display(),
            error = %e,
            "Failed to persist store; in-memory state remains authoritative"
        );
    }
}


#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::test_support::temp_dir;
    use super::*;

    #[tokio::test]
    async fn test_save_then_load() {
        let file = JsonFile::new(temp_dir().join("names.json"));
        file.save(&["a".to_string(), "b".to_string()]).await.unwrap();

        let loaded: Vec<String> = file.load();
        assert_eq!(loaded, ["a", "b"]);
        assert!(!file.temp_path().exists());
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let file = JsonFile::new(temp_dir().join("absent.json"));
        let loaded: Vec<String> = file.load();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let path = temp_dir().join("corrupt.json");
        std::fs::write(&path, "[\"half-written").unwrap();

        let loaded: Vec<String> = JsonFile::new(path).load();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_save_overwrites_previous_contents() {
        let file = JsonFile::new(temp_dir().join("names.json"));
        file.save(&["a", "b", "c"]).await.unwrap();
        file.save(&["z"]).await.unwrap();

        let loaded: Vec<String> = file.load();
        assert_eq!(loaded, ["z"]);
    }

    #[tokio::test]
    async fn test_save_into_missing_directory_fails() {
        let file = JsonFile::new(temp_dir().join("missing").join("names.json"));
        assert!(matches!(file.save(&["a"]).await, Err(PersistError::Io(_))));
    }
}
