//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the storefront runs as a local demo with none
//! of them set.
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: `PORT`, then 3000)
//! - `STOREFRONT_DATA_DIR` - Directory holding `subscribers.json` and
//!   `affiliates.json` (default: working directory)
//! - `STOREFRONT_CATALOG_PATH` - JSON catalog file (default: bundled catalog)
//!
//! ## Admin
//! - `ADMIN_TOKEN` - Shared secret for affiliate mutations. When unset the
//!   affiliate endpoints are open to anyone.
//!
//! ## Outbound mail (notifications)
//! - `SMTP_HOST` - SMTP relay host; notifications are unavailable without it
//! - `SMTP_PORT` - SMTP port (default: 587)
//! - `SMTP_USERNAME` - SMTP username
//! - `SMTP_PASSWORD` - SMTP password
//! - `SMTP_FROM` - Sender address (default: `SMTP_USERNAME`)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const SUBSCRIBERS_FILE: &str = "subscribers.json";
const AFFILIATES_FILE: &str = "affiliates.json";

const MIN_ADMIN_TOKEN_LENGTH: usize = 16;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory for the subscriber and affiliate files
    pub data_dir: PathBuf,
    /// Catalog file overriding the bundled catalog
    pub catalog_path: Option<PathBuf>,
    /// Admin token; `None` leaves the affiliate endpoints open
    pub admin_token: Option<SecretString>,
    /// Outbound mail configuration; `None` disables notifications
    pub email: Option<EmailConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Email (SMTP) configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    /// SMTP relay host
    pub smtp_host: String,
    /// SMTP port
    pub smtp_port: u16,
    /// SMTP username
    pub smtp_username: String,
    /// SMTP password
    pub smtp_password: SecretString,
    /// Email sender address (From header)
    pub from_address: String,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .field("from_address", &self.from_address)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unparseable value, or
    /// if `SMTP_HOST` is set without the credentials that go with it.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("STOREFRONT_HOST".to_string(), e.to_string())
            })?;
        let port = get_port()?;
        let data_dir = PathBuf::from(get_env_or_default("STOREFRONT_DATA_DIR", "."));
        let catalog_path = get_optional_env("STOREFRONT_CATALOG_PATH").map(PathBuf::from);

        let admin_token = get_optional_env("ADMIN_TOKEN").map(SecretString::from);

        let email = EmailConfig::from_env()?;

        Ok(Self {
            host,
            port,
            data_dir,
            catalog_path,
            admin_token,
            email,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Why the configured admin token is weak, if it is.
    ///
    /// Returns `None` when no token is configured or the token looks random.
    #[must_use]
    pub fn admin_token_weakness(&self) -> Option<String> {
        let token = self.admin_token.as_ref()?;
        check_admin_token_strength(token.expose_secret()).err()
    }

    /// Path of the subscriber list file.
    #[must_use]
    pub fn subscribers_path(&self) -> PathBuf {
        self.data_dir.join(SUBSCRIBERS_FILE)
    }

    /// Path of the affiliate list file.
    #[must_use]
    pub fn affiliates_path(&self) -> PathBuf {
        self.data_dir.join(AFFILIATES_FILE)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };

        let smtp_port = get_env_or_default("SMTP_PORT", "587")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("SMTP_PORT".to_string(), e.to_string()))?;
        let smtp_username = get_required_env("SMTP_USERNAME")?;
        let smtp_password = SecretString::from(get_required_env("SMTP_PASSWORD")?);
        let from_address = get_optional_env("SMTP_FROM").unwrap_or_else(|| smtp_username.clone());

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable, treating empty values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Listen port with fallback to generic `PORT` (set by most PaaS hosts).
fn get_port() -> Result<u16, ConfigError> {
    let (key, value) = match get_optional_env("STOREFRONT_PORT") {
        Some(value) => ("STOREFRONT_PORT", value),
        None => ("PORT", get_env_or_default("PORT", "3000")),
    };
    value
        .parse::<u16>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Check an admin token for length and entropy.
///
/// A weak token is still accepted; the caller only warns about it.
fn check_admin_token_strength(token: &str) -> Result<(), String> {
    let len = token.chars().count();
    if len < MIN_ADMIN_TOKEN_LENGTH {
        return Err(format!(
            "shorter than {MIN_ADMIN_TOKEN_LENGTH} characters (got {len})"
        ));
    }

    let entropy = shannon_entropy(token);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(format!(
            "entropy too low ({entropy:.2} bits/char, want >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_config() -> StorefrontConfig {
        StorefrontConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            data_dir: PathBuf::from("/var/lib/shop"),
            catalog_path: None,
            admin_token: None,
            email: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_admin_token_too_short() {
        assert!(check_admin_token_strength("letmein").is_err());
    }

    #[test]
    fn test_admin_token_low_entropy() {
        assert!(check_admin_token_strength(&"a".repeat(40)).is_err());
    }

    #[test]
    fn test_admin_token_strong() {
        assert!(check_admin_token_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6").is_ok());
    }

    #[test]
    fn test_admin_token_weakness_only_reported_when_set() {
        let mut config = test_config();
        assert!(config.admin_token_weakness().is_none());

        config.admin_token = Some(SecretString::from("short"));
        assert!(config.admin_token_weakness().is_some());
    }

    #[test]
    fn test_socket_addr() {
        let addr = test_config().socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_store_paths_live_in_data_dir() {
        let config = test_config();
        assert_eq!(
            config.subscribers_path(),
            PathBuf::from("/var/lib/shop/subscribers.json")
        );
        assert_eq!(
            config.affiliates_path(),
            PathBuf::from("/var/lib/shop/affiliates.json")
        );
    }

    #[test]
    fn test_email_config_debug_redacts_secrets() {
        let config = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            smtp_username: "mailer@example.com".to_string(),
            smtp_password: SecretString::from("super_secret_smtp_password"),
            from_address: "Shop <news@example.com>".to_string(),
        };

        let debug_output = format!("{config:?}");

        assert!(debug_output.contains("smtp.example.com"));
        assert!(debug_output.contains("mailer@example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_smtp_password"));
    }
}
