//! Affiliate program endpoints.
//!
//! Listing is public. Creating, updating and deleting require the admin
//! token (see [`RequireAdmin`]).

use affiliate_shop_core::{Affiliate, AffiliateId, AffiliateInput};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use tracing::instrument;

use super::{MessageResponse, json_body};
use crate::error::{AppError, Result};
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// All affiliates, as stored.
#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Json<Vec<Affiliate>> {
    Json(state.affiliates().list().await)
}

/// Create an affiliate, or update one when the body carries an `id`.
///
/// # Errors
///
/// - 401 if the admin token is refused
/// - 400 if `name` or `link` is missing
/// - 404 if `id` is given but unknown
#[instrument(skip(state, payload))]
pub async fn upsert(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    payload: std::result::Result<Json<AffiliateInput>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let input = json_body(payload)?;
    let updating = input.id.is_some();

    let saved = state.affiliates().upsert(input).await?;

    let message = if updating {
        "Affiliate updated"
    } else {
        "Affiliate created"
    };
    Ok(MessageResponse::with_id(message, saved.id.as_u64()))
}

/// Delete an affiliate by id.
///
/// An id that is not a number cannot name an affiliate and is reported as
/// not found.
///
/// # Errors
///
/// - 401 if the admin token is refused
/// - 404 if no affiliate has this id
#[instrument(skip(state))]
pub async fn remove(
    _admin: RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = id
        .parse::<u64>()
        .map(AffiliateId::new)
        .map_err(|_| AppError::NotFound(format!("affiliate {id}")))?;

    state.affiliates().remove(id).await?;
    Ok(MessageResponse::new("Affiliate deleted"))
}
