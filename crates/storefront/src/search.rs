//! Substring search over the catalog.
//!
//! There is no index and no ranking: a query matches an item when the item's
//! lowercased searchable text contains the trimmed, lowercased query. Results
//! keep catalog order. The browser client applies the same rule to its
//! fallback copy of the catalog when `/api/search` is unreachable.

use affiliate_shop_core::Item;

use crate::catalog::Catalog;

/// Normalize a raw query the way matching expects it.
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Return every item whose searchable text contains `query`.
///
/// An empty or whitespace-only query returns the whole catalog.
#[must_use]
pub fn search(catalog: &Catalog, query: &str) -> Vec<Item> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return catalog.items().to_vec();
    }

    catalog
        .items()
        .iter()
        .filter(|item| item.matches(&needle))
        .cloned()
        .collect()
}
