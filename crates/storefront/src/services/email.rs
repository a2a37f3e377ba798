//! Outbound email transport.
//!
//! Uses SMTP via lettre for delivery. Handlers and the notification
//! dispatcher only see the [`Mailer`] trait so tests can substitute a fake
//! transport.

use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Something that can deliver a single plain-text email.
#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    /// Send one message to one recipient.
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError>;
}

/// SMTP mailer using a STARTTLS relay.
#[derive(Clone)]
pub struct SmtpMailer {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration.
    ///
    /// No connection is opened until the first message is sent.
    ///
    /// # Errors
    ///
    /// Returns error if the relay cannot be configured or the sender address
    /// does not parse.
    pub fn new(config: &EmailConfig) -> Result<Self, EmailError> {
        let from = config
            .from_address
            .parse::<Mailbox>()
            .map_err(|_| EmailError::InvalidAddress(config.from_address.clone()))?;

        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self { mailer, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailError> {
        let recipient = to
            .parse::<Mailbox>()
            .map_err(|_| EmailError::InvalidAddress(to.to_string()))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(recipient)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.mailer.send(email).await?;

        tracing::debug!(to = %to, subject = %subject, "Email sent successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(from: &str) -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer".to_string(),
            smtp_password: SecretString::from("pw"),
            from_address: from.to_string(),
        }
    }

    // The pooled transport spawns onto the runtime, so these run under tokio
    #[tokio::test]
    async fn test_new_accepts_named_sender() {
        assert!(SmtpMailer::new(&config("Curated Picks <news@example.com>")).is_ok());
    }

    #[tokio::test]
    async fn test_new_rejects_bad_sender() {
        assert!(matches!(
            SmtpMailer::new(&config("not an address")),
            Err(EmailError::InvalidAddress(_))
        ));
    }

    #[tokio::test]
    async fn test_send_rejects_bad_recipient_before_connecting() {
        let mailer = SmtpMailer::new(&config("news@example.com")).expect("valid config");
        let result = mailer.send("nobody", "Hi", "Body").await;
        assert!(matches!(result, Err(EmailError::InvalidAddress(_))));
    }
}
