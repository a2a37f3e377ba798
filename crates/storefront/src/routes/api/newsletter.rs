//! Newsletter subscription and notification endpoints.

use affiliate_shop_core::Email;
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::Value;
use tracing::instrument;

use super::{MessageResponse, json_body};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Add an email address to the subscriber list.
///
/// The body must be `{"email": "<address>"}`.
///
/// # Errors
///
/// - 400 if `email` is missing, not a string, or not an address
/// - 400 if the address is already subscribed (any casing)
#[instrument(skip(state, payload))]
pub async fn subscribe(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let body = json_body(payload)?;
    let raw = body
        .get("email")
        .and_then(Value::as_str)
        .ok_or_else(|| AppError::InvalidInput("Valid email is required".to_string()))?;

    let email = Email::parse(raw)
        .map_err(|e| AppError::InvalidInput(format!("Valid email is required: {e}")))?;

    state.subscribers().subscribe(email).await?;
    Ok(MessageResponse::new("Subscribed successfully"))
}

/// Email every subscriber.
///
/// The body must be `{"subject": "...", "content": "..."}`. Responds with
/// `{"message": "<n> succeeded, <m> failed"}` once every send has settled.
///
/// # Errors
///
/// - 400 if `subject` or `content` is missing
/// - 500 if no mail transport is available
#[instrument(skip(state, payload))]
pub async fn notify(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let body = json_body(payload)?;
    let subject = body.get("subject").and_then(Value::as_str);
    let content = body.get("content").and_then(Value::as_str);

    let recipients = state.subscribers().list().await;
    let report = state
        .notifier()
        .dispatch(&recipients, subject, content)
        .await?;

    Ok(MessageResponse::new(report.to_string()))
}
