//! Core types for the affiliate shop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod affiliate;
pub mod category;
pub mod email;
pub mod id;
pub mod item;

pub use affiliate::{Affiliate, AffiliateInput, AffiliateInputError};
pub use category::Category;
pub use email::{Email, EmailError};
pub use id::*;
pub use item::Item;
