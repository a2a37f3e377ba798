//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All API handlers return `Result<T, AppError>`;
//! the client always receives a JSON body of the form `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::notify::NotifyError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing request fields.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Email is already on the subscriber list.
    #[error("Email already subscribed")]
    DuplicateSubscriber,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admin token missing or wrong.
    #[error("Unauthorized")]
    Unauthorized,

    /// Outbound mail could not be dispatched at all.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) | Self::DuplicateSubscriber => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Transport(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::InvalidInput(msg) => Self::InvalidInput(msg),
            RepositoryError::DuplicateSubscriber(_) => Self::DuplicateSubscriber,
            RepositoryError::NotFound(id) => Self::NotFound(format!("affiliate {id}")),
        }
    }
}

impl From<NotifyError> for AppError {
    fn from(err: NotifyError) -> Self {
        match err {
            NotifyError::MissingField(field) => Self::InvalidInput(format!("{field} is required")),
            NotifyError::TransportUnavailable(reason) => Self::Transport(reason),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::Transport(_) => "Failed to send notifications".to_string(),
            Self::InvalidInput(msg) => msg.clone(),
            _ => self.to_string(),
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use affiliate_shop_core::AffiliateId;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("affiliate 3".to_string());
        assert_eq!(err.to_string(), "Not found: affiliate 3");

        let err = AppError::InvalidInput("email is required".to_string());
        assert_eq!(err.to_string(), "Invalid input: email is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::InvalidInput("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::DuplicateSubscriber),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(
            get_status(AppError::Transport("smtp down".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_repository_errors_map_to_taxonomy() {
        assert!(matches!(
            AppError::from(RepositoryError::DuplicateSubscriber("a@b.c".to_string())),
            AppError::DuplicateSubscriber
        ));
        assert!(matches!(
            AppError::from(RepositoryError::NotFound(AffiliateId::new(9))),
            AppError::NotFound(msg) if msg == "affiliate 9"
        ));
    }

    #[test]
    fn test_notify_errors_map_to_taxonomy() {
        assert_eq!(
            AppError::from(NotifyError::MissingField("subject")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(NotifyError::TransportUnavailable("no smtp".to_string())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
