//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `PRODAVNICA_DATABASE_URL` - `PostgreSQL` connection string
//! - `PRODAVNICA_BASE_URL` - Public URL for the storefront
//! - `PRODAVNICA_SESSION_SECRET` - Session signing secret (min 32 chars, high entropy)
//! - `MAILER_URL` - HTTP endpoint of the mail-sending service
//!
//! ## Required in production only
//! - `IMAGE_CDN_UPLOAD_URL` - Image host upload endpoint
//! - `IMAGE_CDN_API_KEY` - Image host API key
//!
//! ## Optional
//! - `PRODAVNICA_HOST` - Bind address (default: 127.0.0.1)
//! - `PRODAVNICA_PORT` - Listen port (default: 3000)
//! - `PRODAVNICA_ENV` - `development` or `production` (default: development)
//! - `UPLOAD_DIR` - Local upload directory in development (default: uploads)
//! - `IMAGE_CDN_FOLDER` - Remote folder for CDN uploads (default: prodavnica)
//! - `MAILER_API_KEY` - Bearer token for the mail-sending service
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Deployment environment, decides the image-upload backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::InvalidEnvVar(
                "PRODAVNICA_ENV".to_string(),
                format!("expected development or production, got {other}"),
            )),
        }
    }
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// Deployment environment
    pub environment: Environment,
    /// Mail-sending service configuration
    pub mailer: MailerConfig,
    /// Image upload configuration
    pub uploads: UploadConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Mail-sending service configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct MailerConfig {
    /// Endpoint that accepts `{email, subject, html}` JSON posts
    pub url: url::Url,
    /// Optional bearer token for the endpoint
    pub api_key: Option<SecretString>,
}

impl std::fmt::Debug for MailerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailerConfig")
            .field("url", &self.url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Image upload configuration.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Local directory for development uploads
    pub local_dir: PathBuf,
    /// Hosted image CDN, required in production
    pub cdn: Option<ImageCdnConfig>,
}

/// Hosted image CDN configuration.
///
/// Implements `Debug` manually to redact the API key.
#[derive(Clone)]
pub struct ImageCdnConfig {
    /// Upload endpoint URL
    pub upload_url: url::Url,
    /// API key sent with every upload
    pub api_key: SecretString,
    /// Remote folder uploads are grouped under
    pub folder: String,
}

impl std::fmt::Debug for ImageCdnConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCdnConfig")
            .field("upload_url", &self.upload_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field("folder", &self.folder)
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
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("PRODAVNICA_DATABASE_URL")?;
        let host = get_env_or_default("PRODAVNICA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRODAVNICA_HOST".to_string(), e.to_string())
            })?;
        let port = get_env_or_default("PRODAVNICA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("PRODAVNICA_PORT".to_string(), e.to_string())
            })?;
        let base_url = get_required_env("PRODAVNICA_BASE_URL")?;
        let session_secret = get_validated_secret("PRODAVNICA_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "PRODAVNICA_SESSION_SECRET")?;

        let environment = Environment::parse(&get_env_or_default("PRODAVNICA_ENV", "development"))?;
        let mailer = MailerConfig::from_env()?;
        let uploads = UploadConfig::from_env(environment)?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");
        let sentry_environment = get_optional_env("SENTRY_ENVIRONMENT");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            environment,
            mailer,
            uploads,
            sentry_dsn,
            sentry_environment,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl MailerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = get_required_env("MAILER_URL")?;
        let url = url::Url::parse(&raw)
            .map_err(|e| ConfigError::InvalidEnvVar("MAILER_URL".to_string(), e.to_string()))?;

        let api_key = match get_optional_env("MAILER_API_KEY") {
            Some(value) => {
                validate_secret_strength(&value, "MAILER_API_KEY")?;
                Some(SecretString::from(value))
            }
            None => None,
        };

        Ok(Self { url, api_key })
    }
}

impl UploadConfig {
    fn from_env(environment: Environment) -> Result<Self, ConfigError> {
        let local_dir = PathBuf::from(get_env_or_default("UPLOAD_DIR", "uploads"));

        let cdn = match get_optional_env("IMAGE_CDN_UPLOAD_URL") {
            Some(raw) => {
                let upload_url = url::Url::parse(&raw).map_err(|e| {
                    ConfigError::InvalidEnvVar("IMAGE_CDN_UPLOAD_URL".to_string(), e.to_string())
                })?;
                let api_key = get_validated_secret("IMAGE_CDN_API_KEY")?;
                let folder = get_env_or_default("IMAGE_CDN_FOLDER", "prodavnica");
                Some(ImageCdnConfig {
                    upload_url,
                    api_key,
                    folder,
                })
            }
            None => None,
        };

        // Production must not silently fall back to local disk.
        if environment == Environment::Production && cdn.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "IMAGE_CDN_UPLOAD_URL".to_string(),
            ));
        }

        Ok(Self { local_dir, cdn })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL` (used by hosted postgres attach).
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    // Try primary key first (e.g., PRODAVNICA_DATABASE_URL)
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    // Fallback to generic DATABASE_URL
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
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
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    // Check entropy (real secrets like API keys have high entropy)
    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shannon_entropy_empty() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_single_char() {
        // All same character = 0 entropy
        assert!((shannon_entropy("aaaaaaa") - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shannon_entropy_two_chars() {
        // "ab" has entropy of 1 bit per char (50% a, 50% b)
        let entropy = shannon_entropy("ab");
        assert!((entropy - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_validate_secret_strength_placeholder() {
        let result = validate_secret_strength("your-api-key-here", "TEST_VAR");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_validate_secret_strength_low_entropy() {
        let result = validate_secret_strength("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_secret_strength_valid() {
        // High-entropy random string
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn test_validate_session_secret_too_short() {
        let secret = SecretString::from("short");
        let result = validate_session_secret(&secret, "TEST_SESSION");
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!(
            Environment::parse("development").unwrap(),
            Environment::Development
        );
        assert_eq!(
            Environment::parse("prod").unwrap(),
            Environment::Production
        );
        assert!(Environment::parse("staging").is_err());
    }

    #[test]
    fn test_socket_addr() {
        let config = StorefrontConfig {
            database_url: SecretString::from("postgres://localhost/test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            environment: Environment::Development,
            mailer: MailerConfig {
                url: url::Url::parse("http://localhost:4000/email/send").unwrap(),
                api_key: None,
            },
            uploads: UploadConfig {
                local_dir: PathBuf::from("uploads"),
                cdn: None,
            },
            sentry_dsn: None,
            sentry_environment: None,
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_mailer_config_debug_redacts_api_key() {
        let config = MailerConfig {
            url: url::Url::parse("http://localhost:4000/email/send").unwrap(),
            api_key: Some(SecretString::from("super_secret_mailer_key")),
        };

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("http://localhost:4000/email/send"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_mailer_key"));
    }
}
