//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//!
//! Admin authorization is not a layer: affiliate mutation handlers take the
//! [`RequireAdmin`] extractor, which consults the configured
//! [`AdminAuthorizer`].

pub mod admin;
pub mod request_id;

pub use admin::{ADMIN_TOKEN_HEADER, AdminAuthorizer, RequireAdmin, SharedTokenAuthorizer};
pub use request_id::request_id_middleware;
