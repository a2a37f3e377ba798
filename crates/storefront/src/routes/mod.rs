//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                 - Health check
//!
//! # Catalog
//! GET    /api/items              - Full catalog
//! GET    /api/search?q=          - Substring search over the catalog
//!
//! # Affiliates
//! GET    /api/affiliates         - List affiliate programs
//! POST   /api/affiliates         - Create or update (X-Admin-Token)
//! DELETE /api/affiliates/{id}    - Delete (X-Admin-Token)
//!
//! # Newsletter
//! POST   /api/subscribe          - Add a subscriber
//! POST   /api/notify             - Email every subscriber
//!
//! # Assets and pages
//! GET    /static/*               - Client script and styles
//! GET    *                       - Storefront page (single-page fallback)
//! ```

pub mod api;
pub mod pages;

use std::path::Path;

use axum::{
    Router,
    extract::Request,
    middleware,
    routing::{delete, get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(api::catalog::list_items))
        .route("/search", get(api::catalog::search_items))
        .route(
            "/affiliates",
            get(api::affiliates::list).post(api::affiliates::upsert),
        )
        .route("/affiliates/{id}", delete(api::affiliates::remove))
        .route("/subscribe", post(api::newsletter::subscribe))
        .route("/notify", post(api::newsletter::notify))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .fallback(pages::index)
}

/// Build the complete application with state, static assets and the
/// tracing and request-id layers.
pub fn app(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
