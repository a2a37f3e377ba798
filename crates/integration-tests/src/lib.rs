//! Integration tests for the affiliate shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p affiliate-shop-integration-tests
//! ```
//!
//! Tests drive the full storefront router in-process with
//! `tower::ServiceExt::oneshot`; no server, SMTP relay or network is needed.
//!
//! # Test Categories
//!
//! - `api_catalog` - Catalog listing, search, page fallback
//! - `api_affiliates` - Affiliate CRUD and admin token checks
//! - `api_newsletter` - Subscriptions and notification dispatch

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use affiliate_shop_core::Email;
use affiliate_shop_storefront::catalog::Catalog;
use affiliate_shop_storefront::db::{
    AffiliateRepository, AffiliateStore, SubscriberRepository, SubscriberStore,
};
use affiliate_shop_storefront::middleware::SharedTokenAuthorizer;
use affiliate_shop_storefront::routes;
use affiliate_shop_storefront::services::{EmailError, Mailer, Notifier};
use affiliate_shop_storefront::state::AppState;
use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

/// Admin token used by contexts built with [`TestContext::with_admin_token`].
pub const ADMIN_TOKEN: &str = "test-admin-token-8f3kQ2";

/// Mailer that records sends and fails for chosen recipients.
#[derive(Default)]
pub struct RecordingMailer {
    failing: HashSet<String>,
    sent: Mutex<Vec<(String, String, String)>>,
}

impl RecordingMailer {
    /// Fail every send addressed to one of `addresses`.
    #[must_use]
    pub fn failing_for(addresses: &[&str]) -> Self {
        Self {
            failing: addresses.iter().map(|a| (*a).to_string()).collect(),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// `(to, subject, body)` of every successful send.
    pub fn sent(&self) -> Vec<(String, String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        if self.failing.contains(to) {
            return Err(EmailError::InvalidAddress(to.to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}

/// Builder for an in-process storefront.
pub struct TestContext {
    catalog: Catalog,
    subscribers: Arc<dyn SubscriberRepository>,
    affiliates: Arc<dyn AffiliateRepository>,
    notifier: Notifier,
    admin_token: Option<SecretString>,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// Bundled catalog, empty in-memory stores, no mail transport, open admin.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Catalog::bundled().unwrap(),
            subscribers: Arc::new(SubscriberStore::in_memory(Vec::new())),
            affiliates: Arc::new(AffiliateStore::in_memory(Vec::new())),
            notifier: Notifier::unavailable("SMTP is not configured"),
            admin_token: None,
        }
    }

    /// Require [`ADMIN_TOKEN`] for affiliate mutations.
    #[must_use]
    pub fn with_admin_token(mut self) -> Self {
        self.admin_token = Some(SecretString::from(ADMIN_TOKEN));
        self
    }

    /// Start with these subscribers.
    #[must_use]
    pub fn with_subscribers(mut self, addresses: &[&str]) -> Self {
        let emails = addresses.iter().map(|a| Email::parse(a).unwrap()).collect();
        self.subscribers = Arc::new(SubscriberStore::in_memory(emails));
        self
    }

    /// Send notifications through `mailer`.
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<RecordingMailer>) -> Self {
        self.notifier = Notifier::new(mailer);
        self
    }

    /// Back both stores with files in `dir`.
    #[must_use]
    pub fn with_data_dir(mut self, dir: &Path) -> Self {
        self.subscribers = Arc::new(SubscriberStore::open(dir.join("subscribers.json")));
        self.affiliates = Arc::new(AffiliateStore::open(dir.join("affiliates.json")));
        self
    }

    /// Build the router.
    #[must_use]
    pub fn app(self) -> Router {
        let state = AppState::new(
            self.catalog,
            self.subscribers,
            self.affiliates,
            self.notifier,
            Arc::new(SharedTokenAuthorizer::new(self.admin_token)),
        );
        routes::app(state, Path::new("../storefront/static"))
    }
}

/// Fresh, empty directory under the system temp dir.
#[must_use]
pub fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("affiliate-shop-it-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Response status and body parsed as JSON (`Value::Null` if not JSON).
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

/// Send one request through `app`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    admin_token: Option<&str>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = admin_token {
        builder = builder.header("x-admin-token", token);
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let text = String::from_utf8_lossy(&bytes).into_owned();
    let body = serde_json::from_str(&text).unwrap_or(Value::Null);

    TestResponse { status, body, text }
}

/// `GET uri`.
pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Method::GET, uri, None, None).await
}

/// `POST uri` with a JSON body.
pub async fn post(app: &Router, uri: &str, body: Value) -> TestResponse {
    send(app, Method::POST, uri, Some(body), None).await
}
