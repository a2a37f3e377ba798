//! Affiliate program records.

use serde::{Deserialize, Serialize};

use crate::AffiliateId;

/// A third-party affiliate program curated by administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Affiliate {
    pub id: AffiliateId,
    pub name: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub banner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

/// Create-or-update payload for an affiliate.
///
/// Every field is optional at the type level so that a missing `name` or
/// `link` surfaces as a validation error rather than a body rejection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliateInput {
    #[serde(default)]
    pub id: Option<AffiliateId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub banner: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

/// Validation failure for an [`AffiliateInput`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum AffiliateInputError {
    #[error("name and link are required")]
    MissingRequired,
}

impl AffiliateInput {
    /// Turn the payload into a record carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`AffiliateInputError::MissingRequired`] if `name` or `link`
    /// is absent or blank.
    pub fn into_record(self, id: AffiliateId) -> Result<Affiliate, AffiliateInputError> {
        let name = non_blank(self.name).ok_or(AffiliateInputError::MissingRequired)?;
        let link = non_blank(self.link).ok_or(AffiliateInputError::MissingRequired)?;

        Ok(Affiliate {
            id,
            name,
            link,
            banner: self.banner,
            description: self.description,
            categories: self.categories,
        })
    }

    /// Check required fields without consuming the payload.
    ///
    /// # Errors
    ///
    /// Returns [`AffiliateInputError::MissingRequired`] if `name` or `link`
    /// is absent or blank.
    pub fn validate(&self) -> Result<(), AffiliateInputError> {
        let present = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.trim().is_empty());
        if present(&self.name) && present(&self.link) {
            Ok(())
        } else {
            Err(AffiliateInputError::MissingRequired)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
