//! Admin authorization for affiliate mutations.
//!
//! Callers present a shared secret in the `X-Admin-Token` header. Whether that
//! is enough is decided by an [`AdminAuthorizer`] held in application state;
//! handlers only ask for the [`RequireAdmin`] extractor.
//!
//! When no token is configured, [`SharedTokenAuthorizer`] lets every request
//! through. This open mode exists for local demos and is announced with a
//! warning at startup.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
};
use secrecy::{ExposeSecret, SecretString};

use crate::error::AppError;
use crate::state::AppState;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Decides whether a presented admin token grants access.
pub trait AdminAuthorizer: Send + Sync + 'static {
    /// `token` is the raw header value, or `None` if the header was absent.
    fn authorize(&self, token: Option<&str>) -> bool;

    /// Whether every request is let through regardless of token.
    fn is_open(&self) -> bool {
        false
    }
}

/// Compares the presented token with a single configured secret.
pub struct SharedTokenAuthorizer {
    token: Option<SecretString>,
}

impl SharedTokenAuthorizer {
    /// Require `token`, or allow everyone when `None`.
    #[must_use]
    pub const fn new(token: Option<SecretString>) -> Self {
        Self { token }
    }
}

impl AdminAuthorizer for SharedTokenAuthorizer {
    fn authorize(&self, presented: Option<&str>) -> bool {
        let Some(expected) = &self.token else {
            return true;
        };
        presented.is_some_and(|p| constant_time_eq(p.as_bytes(), expected.expose_secret().as_bytes()))
    }

    fn is_open(&self) -> bool {
        self.token.is_none()
    }
}

/// Byte comparison whose timing does not depend on where the inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extractor that requires admin authorization.
///
/// Rejects with `AppError::Unauthorized` (401) when the authorizer refuses
/// the request's `X-Admin-Token`.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(_admin: RequireAdmin) -> impl IntoResponse {
///     "admin only"
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequireAdmin;

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());

        if state.authorizer().authorize(token) {
            Ok(Self)
        } else {
            tracing::warn!(
                path = %parts.uri.path(),
                token_present = token.is_some(),
                "Rejected admin request"
            );
            Err(AppError::Unauthorized)
        }
    }
}
