//! Affiliate program storage.

use std::path::PathBuf;

use affiliate_shop_core::{Affiliate, AffiliateId, AffiliateInput};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{JsonFile, RepositoryError, persist_best_effort};

/// Storage for affiliate program records.
#[async_trait]
pub trait AffiliateRepository: Send + Sync + 'static {
    /// All affiliates, as stored.
    async fn list(&self) -> Vec<Affiliate>;

    /// Create or replace an affiliate.
    ///
    /// Without an id, the record is appended with an id one past the current
    /// maximum (1 for an empty store). With an id, the record with that id is
    /// replaced in place, or `Err(NotFound)` is returned and nothing changes.
    async fn upsert(&self, input: AffiliateInput) -> Result<Affiliate, RepositoryError>;

    /// Remove the affiliate with `id`, returning the removed record.
    async fn remove(&self, id: AffiliateId) -> Result<Affiliate, RepositoryError>;
}

/// Affiliate list kept in memory and mirrored to a JSON file.
pub struct AffiliateStore {
    file: Option<JsonFile>,
    entries: Mutex<Vec<Affiliate>>,
}

impl AffiliateStore {
    /// Open the store backed by `path`, loading any existing affiliates.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let file = JsonFile::new(path);
        let entries: Vec<Affiliate> = file.load();
        tracing::info!(
            path = %file.path().display(),
            count = entries.len(),
            "Loaded affiliates"
        );

        Self {
            file: Some(file),
            entries: Mutex::new(entries),
        }
    }

    /// A store that never touches the filesystem.
    #[must_use]
    pub fn in_memory(entries: Vec<Affiliate>) -> Self {
        Self {
            file: None,
            entries: Mutex::new(entries),
        }
    }
}

/// Id for a new record: one past the current maximum.
fn next_id(entries: &[Affiliate]) -> AffiliateId {
    entries
        .iter()
        .map(|affiliate| affiliate.id)
        .max()
        .map_or(AffiliateId::FIRST, AffiliateId::next)
}

#[async_trait]
impl AffiliateRepository for AffiliateStore {
    async fn list(&self) -> Vec<Affiliate> {
        self.entries.lock().await.clone()
    }

    async fn upsert(&self, input: AffiliateInput) -> Result<Affiliate, RepositoryError> {
        input
            .validate()
            .map_err(|e| RepositoryError::InvalidInput(e.to_string()))?;

        let mut entries = self.entries.lock().await;

        let record = match input.id {
            Some(id) => {
                let slot = entries
                    .iter_mut()
                    .find(|affiliate| affiliate.id == id)
                    .ok_or(RepositoryError::NotFound(id))?;
                let record = input
                    .into_record(id)
                    .map_err(|e| RepositoryError::InvalidInput(e.to_string()))?;
                slot.clone_from(&record);
                tracing::info!(id = %id, "Affiliate updated");
                record
            }
            None => {
                let id = next_id(&entries);
                let record = input
                    .into_record(id)
                    .map_err(|e| RepositoryError::InvalidInput(e.to_string()))?;
                entries.push(record.clone());
                tracing::info!(id = %id, "Affiliate created");
                record
            }
        };

        persist_best_effort(self.file.as_ref(), entries.as_slice(), "affiliates").await;
        Ok(record)
    }

    async fn remove(&self, id: AffiliateId) -> Result<Affiliate, RepositoryError> {
        let mut entries = self.entries.lock().await;

        let index = entries
            .iter()
            .position(|affiliate| affiliate.id == id)
            .ok_or(RepositoryError::NotFound(id))?;
        let removed = entries.remove(index);
        tracing::info!(id = %id, "Affiliate removed");

        persist_best_effort(self.file.as_ref(), entries.as_slice(), "affiliates").await;
        Ok(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::test_support::temp_dir;
    use super::*;

    fn input(id: Option<u64>, name: &str) -> AffiliateInput {
        AffiliateInput {
            id: id.map(AffiliateId::new),
            name: Some(name.to_string()),
            link: Some(format!("https://{}.example.com/ref", name.to_lowercase())),
            ..AffiliateInput::default()
        }
    }

    fn ids(entries: &[Affiliate]) -> Vec<u64> {
        entries.iter().map(|affiliate| affiliate.id.as_u64()).collect()
    }

    #[tokio::test]
    async fn test_first_id_is_one() {
        let store = AffiliateStore::in_memory(Vec::new());
        let created = store.upsert(input(None, "Acme")).await.unwrap();
        assert_eq!(created.id, AffiliateId::FIRST);
    }

    #[tokio::test]
    async fn test_new_id_is_max_plus_one() {
        let store = AffiliateStore::in_memory(Vec::new());
        store.upsert(input(None, "A")).await.unwrap();
        store.upsert(input(None, "B")).await.unwrap();
        store.upsert(input(None, "C")).await.unwrap();

        // Gaps are not reused; the next id follows the maximum
        store.remove(AffiliateId::new(2)).await.unwrap();
        let created = store.upsert(input(None, "D")).await.unwrap();
        assert_eq!(created.id, AffiliateId::new(4));
        assert_eq!(ids(&store.list().await), [1, 3, 4]);
    }

    #[tokio::test]
    async fn test_update_replaces_in_place() {
        let store = AffiliateStore::in_memory(Vec::new());
        store.upsert(input(None, "A")).await.unwrap();
        store.upsert(input(None, "B")).await.unwrap();
        store.upsert(input(None, "C")).await.unwrap();

        let mut update = input(Some(2), "Bee");
        update.description = Some("Renamed".to_string());
        store.upsert(update).await.unwrap();

        let entries = store.list().await;
        assert_eq!(ids(&entries), [1, 2, 3]);
        assert_eq!(entries[1].name, "Bee");
        assert_eq!(entries[1].description.as_deref(), Some("Renamed"));
    }

    #[tokio::test]
    async fn test_update_unknown_id_changes_nothing() {
        let store = AffiliateStore::in_memory(Vec::new());
        store.upsert(input(None, "A")).await.unwrap();
        let before = store.list().await;

        let result = store.upsert(input(Some(99), "Ghost")).await;
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound(id)) if id == AffiliateId::new(99)
        ));
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn test_missing_name_or_link_is_invalid() {
        let store = AffiliateStore::in_memory(Vec::new());
        let no_link = AffiliateInput {
            name: Some("Acme".to_string()),
            ..AffiliateInput::default()
        };
        assert!(matches!(
            store.upsert(no_link).await,
            Err(RepositoryError::InvalidInput(_))
        ));

        // Validation runs before the id lookup
        let no_name = AffiliateInput {
            id: Some(AffiliateId::new(5)),
            link: Some("https://x.example.com".to_string()),
            ..AffiliateInput::default()
        };
        assert!(matches!(
            store.upsert(no_name).await,
            Err(RepositoryError::InvalidInput(_))
        ));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_twice_is_not_found() {
        let store = AffiliateStore::in_memory(Vec::new());
        store.upsert(input(None, "A")).await.unwrap();
        store.upsert(input(None, "B")).await.unwrap();

        let removed = store.remove(AffiliateId::FIRST).await.unwrap();
        assert_eq!(removed.name, "A");

        let again = store.remove(AffiliateId::FIRST).await;
        assert!(matches!(again, Err(RepositoryError::NotFound(_))));
        assert_eq!(store.list().await.len(), 1);
    }

    #[tokio::test]
    async fn test_persists_every_mutation() {
        let path = temp_dir().join("affiliates.json");
        let store = AffiliateStore::open(&path);

        store.upsert(input(None, "A")).await.unwrap();
        store.upsert(input(None, "B")).await.unwrap();
        store.remove(AffiliateId::FIRST).await.unwrap();

        let reopened = AffiliateStore::open(&path);
        let entries = reopened.list().await;
        assert_eq!(ids(&entries), [2]);
        assert_eq!(entries[0].name, "B");
    }

    #[test]
    fn test_next_id_empty() {
        assert_eq!(next_id(&[]), AffiliateId::FIRST);
    }
}
