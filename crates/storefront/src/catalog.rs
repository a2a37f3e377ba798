//! Static product catalog.
//!
//! The catalog is read once at startup, either from the bundled
//! `content/catalog.json` or from a file named in configuration, and never
//! changes while the process runs. Each item's searchable text is derived at
//! load time when the source does not carry one.

use std::path::Path;
use std::sync::Arc;

use affiliate_shop_core::{Category, Item};
use thiserror::Error;

/// Catalog bundled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../content/catalog.json");

/// Errors loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only list of curated items, cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    items: Arc<Vec<Item>>,
}

impl Catalog {
    /// Build a catalog from items, filling in missing searchable text.
    #[must_use]
    pub fn new(items: Vec<Item>) -> Self {
        let items = items
            .into_iter()
            .map(|mut item| {
                if item.search.is_empty() {
                    item.search = item.searchable_text();
                } else {
                    item.search = item.search.to_lowercase();
                }
                item
            })
            .collect();

        Self {
            items: Arc::new(items),
        }
    }

    /// The catalog shipped with the storefront.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the bundled JSON is malformed.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Parse a catalog from a JSON array of items.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Parse` if the JSON is not an array of items.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Ok(Self::new(items))
    }

    /// Load a catalog from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&json)?;
        tracing::info!(path = %path.display(), items = catalog.len(), "Loaded catalog");
        Ok(catalog)
    }

    /// All items in catalog order.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in one category, catalog order.
    pub fn in_category(&self, category: Category) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |item| item.category == category)
    }
}
