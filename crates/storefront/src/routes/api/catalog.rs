//! Catalog listing and search endpoints.

use affiliate_shop_core::Item;
use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use crate::search;
use crate::state::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Full catalog in catalog order.
#[instrument(skip(state))]
pub async fn list_items(State(state): State<AppState>) -> Json<Vec<Item>> {
    Json(state.catalog().items().to_vec())
}

/// Items whose searchable text contains `q`; all items for an empty `q`.
#[instrument(skip(state))]
pub async fn search_items(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Item>> {
    let results = search::search(state.catalog(), &query.q);
    tracing::debug!(results = results.len(), "Search complete");
    Json(results)
}
