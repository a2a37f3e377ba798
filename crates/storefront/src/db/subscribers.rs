//! Subscriber list storage.

use std::path::PathBuf;

use affiliate_shop_core::Email;
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{JsonFile, RepositoryError, persist_best_effort};

/// Storage for newsletter subscribers.
#[async_trait]
pub trait SubscriberRepository: Send + Sync + 'static {
    /// All subscribers in subscription order.
    async fn list(&self) -> Vec<Email>;

    /// Add a subscriber.
    ///
    /// Returns `Err(DuplicateSubscriber)` if the address is already present,
    /// compared case-insensitively.
    async fn subscribe(&self, email: Email) -> Result<(), RepositoryError>;
}

/// Subscriber list kept in memory and mirrored to a JSON file.
pub struct SubscriberStore {
    file: Option<JsonFile>,
    entries: Mutex<Vec<Email>>,
}

impl SubscriberStore {
    /// Open the store backed by `path`, loading any existing subscribers.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file = JsonFile::new(path);
        let entries: Vec<Email> = file.load();
        tracing::info!(
            path = %file.path().display(),
            count = entries.len(),
            "Loaded subscribers"
        );

        Self {
            file: Some(file),
            entries: Mutex::new(entries),
        }
    }

    /// A store that never touches the filesystem.
    #[must_use]
    pub fn in_memory(entries: Vec<Email>) -> Self {
        Self {
            file: None,
            entries: Mutex::new(entries),
        }
    }
}

#[async_trait]
impl SubscriberRepository for SubscriberStore {
    async fn list(&self) -> Vec<Email> {
        self.entries.lock().await.clone()
    }

    async fn subscribe(&self, email: Email) -> Result<(), RepositoryError> {
        let mut entries = self.entries.lock().await;

        if entries.iter().any(|existing| existing.same_address(&email)) {
            return Err(RepositoryError::DuplicateSubscriber(email.into_inner()));
        }

        entries.push(email);
        tracing::info!(count = entries.len(), "Subscriber added");

        persist_best_effort(self.file.as_ref(), entries.as_slice(), "subscribers").await;
        Ok(())
    }
}
