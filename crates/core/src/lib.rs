//! Affiliate Shop Core - Shared types library.
//!
//! This crate provides the domain types used by the storefront and its tests:
//! - `storefront` - Public catalog, subscriptions, affiliate admin API
//! - `integration-tests` - HTTP-level tests against the storefront router
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no file access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Catalog items, affiliate records, emails and type-safe IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
