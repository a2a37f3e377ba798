//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError};
use crate::config::StorefrontConfig;
use crate::db::{AffiliateRepository, AffiliateStore, SubscriberRepository, SubscriberStore};
use crate::middleware::{AdminAuthorizer, SharedTokenAuthorizer};
use crate::services::Notifier;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. Stores, the mail transport and
/// the admin authorizer are held behind traits so tests can inject their own.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Catalog,
    subscribers: Arc<dyn SubscriberRepository>,
    affiliates: Arc<dyn AffiliateRepository>,
    notifier: Notifier,
    authorizer: Arc<dyn AdminAuthorizer>,
}

impl AppState {
    /// Assemble state from already-built parts.
    #[must_use]
    pub fn new(
        catalog: Catalog,
        subscribers: Arc<dyn SubscriberRepository>,
        affiliates: Arc<dyn AffiliateRepository>,
        notifier: Notifier,
        authorizer: Arc<dyn AdminAuthorizer>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                subscribers,
                affiliates,
                notifier,
                authorizer,
            }),
        }
    }

    /// Build the production state described by `config`.
    ///
    /// Loads the catalog, opens the file-backed stores in the data directory,
    /// and configures the SMTP transport and admin token check.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if a configured catalog file cannot be loaded.
    /// Store files never fail startup; unreadable ones load empty.
    pub fn from_config(config: &StorefrontConfig) -> Result<Self, CatalogError> {
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load(path)?,
            None => Catalog::bundled()?,
        };

        let subscribers = Arc::new(SubscriberStore::open(config.subscribers_path()));
        let affiliates = Arc::new(AffiliateStore::open(config.affiliates_path()));
        let notifier = Notifier::from_config(config.email.as_ref());
        let authorizer = Arc::new(SharedTokenAuthorizer::new(config.admin_token.clone()));

        Ok(Self::new(catalog, subscribers, affiliates, notifier, authorizer))
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the subscriber store.
    #[must_use]
    pub fn subscribers(&self) -> &dyn SubscriberRepository {
        self.inner.subscribers.as_ref()
    }

    /// Get a reference to the affiliate store.
    #[must_use]
    pub fn affiliates(&self) -> &dyn AffiliateRepository {
        self.inner.affiliates.as_ref()
    }

    /// Get a reference to the notification dispatcher.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Get a reference to the admin authorizer.
    #[must_use]
    pub fn authorizer(&self) -> &dyn AdminAuthorizer {
        self.inner.authorizer.as_ref()
    }
}
