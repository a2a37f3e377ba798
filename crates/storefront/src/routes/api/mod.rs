//! JSON API routes.
//!
//! Successful mutations answer with [`MessageResponse`]; failures go through
//! `AppError` and answer `{"error": "..."}`.

pub mod affiliates;
pub mod catalog;
pub mod newsletter;

use axum::{
    Json,
    extract::rejection::JsonRejection,
};
use serde::Serialize;

use crate::error::AppError;

/// Success body for mutations.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl MessageResponse {
    fn new(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            message: message.into(),
            id: None,
        })
    }

    fn with_id(message: impl Into<String>, id: u64) -> Json<Self> {
        Json(Self {
            message: message.into(),
            id: Some(id),
        })
    }
}

/// Unwrap a JSON body, turning any rejection into `InvalidInput`.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}
