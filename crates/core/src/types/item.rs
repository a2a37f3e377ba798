//! Catalog item type.

use serde::{Deserialize, Serialize};

use crate::Category;

/// A curated product in the catalog.
///
/// Items have no stable id; they are identified by their position in the
/// catalog. `search` holds the lowercased `name` and `description` joined by a
/// space and is what substring search matches against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub category: Category,
    pub name: String,
    pub image: String,
    pub description: String,
    pub link: String,
    #[serde(default)]
    pub search: String,
}

impl Item {
    /// Build an item, deriving its searchable text.
    #[must_use]
    pub fn new(
        category: Category,
        name: impl Into<String>,
        image: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        let mut item = Self {
            category,
            name: name.into(),
            image: image.into(),
            description: description.into(),
            link: link.into(),
            search: String::new(),
        };
        item.search = item.searchable_text();
        item
    }

    /// Lowercased `name` and `description`, the text search runs against.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.name, self.description).to_lowercase()
    }

    /// Whether the item's searchable text contains an already-normalized
    /// (trimmed, lowercased) query.
    #[must_use]
    pub fn matches(&self, normalized_query: &str) -> bool {
        self.search.contains(normalized_query)
    }
}
