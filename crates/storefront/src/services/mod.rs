//! Business logic services for storefront.
//!
//! # Services
//!
//! - `email` - Outbound mail transport (SMTP via lettre)
//! - `notify` - Fan-out of one notification email to every subscriber

pub mod email;
pub mod notify;

pub use email::{EmailError, Mailer, SmtpMailer};
pub use notify::{DispatchReport, NotifyError, Notifier};
