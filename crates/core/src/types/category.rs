//! Catalog categories.

use core::fmt;

use serde::{Deserialize, Serialize};

/// The shelf a catalog item is displayed under.
///
/// Serialized in lowercase (`"clothing"`, `"accessories"`, `"home"`), which is
/// also the order the storefront groups cards in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Accessories,
    Home,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 3] = [Self::Clothing, Self::Accessories, Self::Home];

    /// Wire name of the category.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clothing => "clothing",
            Self::Accessories => "accessories",
            Self::Home => "home",
        }
    }

    /// Human-readable heading for the category.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Clothing => "Clothing",
            Self::Accessories => "Accessories",
            Self::Home => "Home",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Category::Accessories).ok().as_deref(),
            Some("\"accessories\"")
        );
        let parsed: Option<Category> = serde_json::from_str("\"home\"").ok();
        assert_eq!(parsed, Some(Category::Home));
    }

    #[test]
    fn test_unknown_category_rejected() {
        assert!(serde_json::from_str::<Category>("\"garden\"").is_err());
    }

    #[test]
    fn test_display_matches_wire_name() {
        for category in Category::ALL {
            assert_eq!(category.to_string(), category.as_str());
        }
    }
}
