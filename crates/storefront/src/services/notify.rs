//! Notification fan-out to subscribers.
//!
//! A dispatch sends the same message to every subscriber at once and waits for
//! every send to settle. One failing recipient never stops the others; the
//! caller only learns how many sends succeeded and how many failed. The only
//! hard failure is having no transport to send with at all.

use std::fmt;
use std::sync::Arc;

use affiliate_shop_core::Email;
use futures::future::join_all;
use thiserror::Error;
use tracing::instrument;

use super::email::{Mailer, SmtpMailer};
use crate::config::EmailConfig;

/// Errors that prevent a dispatch from starting.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Subject or body is missing or blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// No mail transport could be constructed.
    #[error("mail transport unavailable: {0}")]
    TransportUnavailable(String),
}

/// Aggregate outcome of one dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub succeeded: usize,
    pub failed: usize,
}

impl fmt::Display for DispatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} succeeded, {} failed", self.succeeded, self.failed)
    }
}

/// Sends notification emails through a shared transport.
#[derive(Clone)]
pub struct Notifier {
    transport: Result<Arc<dyn Mailer>, String>,
}

impl Notifier {
    /// A notifier that sends through `mailer`.
    #[must_use]
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            transport: Ok(mailer),
        }
    }

    /// A notifier whose every dispatch fails with `TransportUnavailable`.
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            transport: Err(reason.into()),
        }
    }

    /// Build an SMTP-backed notifier, or an unavailable one if mail is not
    /// configured or the transport cannot be built.
    #[must_use]
    pub fn from_config(config: Option<&EmailConfig>) -> Self {
        let Some(config) = config else {
            tracing::warn!("SMTP_HOST not set; notifications are disabled");
            return Self::unavailable("SMTP is not configured");
        };

        match SmtpMailer::new(config) {
            Ok(mailer) => {
                tracing::info!(host = %config.smtp_host, port = config.smtp_port, "SMTP transport configured");
                Self::new(Arc::new(mailer))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to configure SMTP transport");
                Self::unavailable(e.to_string())
            }
        }
    }

    /// Whether a transport is available.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.transport.is_ok()
    }

    /// Send `body` with `subject` to every recipient concurrently.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` if subject or body is absent or blank, and
    /// `TransportUnavailable` if there is no transport. Individual send
    /// failures are counted in the report, not returned.
    #[instrument(skip(self, recipients, body), fields(recipients = recipients.len()))]
    pub async fn dispatch(
        &self,
        recipients: &[Email],
        subject: Option<&str>,
        body: Option<&str>,
    ) -> Result<DispatchReport, NotifyError> {
        let subject = required(subject, "subject")?;
        let body = required(body, "content")?;
        let mailer = self
            .transport
            .as_ref()
            .map_err(|reason| NotifyError::TransportUnavailable(reason.clone()))?;

        let sends = recipients.iter().map(|recipient| {
            let mailer = Arc::clone(mailer);
            async move {
                let result = mailer.send(recipient.as_str(), subject, body).await;
                if let Err(e) = &result {
                    tracing::warn!(to = %recipient, error = %e, "Notification send failed");
                }
                result.is_ok()
            }
        });

        let outcomes = join_all(sends).await;
        let succeeded = outcomes.iter().filter(|ok| **ok).count();
        let report = DispatchReport {
            succeeded,
            failed: outcomes.len() - succeeded,
        };

        tracing::info!(succeeded = report.succeeded, failed = report.failed, "Notification dispatch finished");
        Ok(report)
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, NotifyError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(NotifyError::MissingField(field))
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::services::email::{EmailError, Mailer};

    /// Records every send and fails for a fixed set of recipients.
    #[derive(Default)]
    pub struct RecordingMailer {
        pub failing: HashSet<String>,
        pub sent: Mutex<Vec<(String, String, String)>>,
    }

    impl RecordingMailer {
        pub fn failing_for(addresses: &[&str]) -> Self {
            Self {
                failing: addresses.iter().map(|a| (*a).to_string()).collect(),
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
            if self.failing.contains(to) {
                return Err(EmailError::InvalidAddress(to.to_string()));
            }
            self.sent
                .lock()
                .expect("sent log poisoned")
                .push((to.to_string(), subject.to_string(), body.to_string()));
            Ok(())
        }
    }
}
