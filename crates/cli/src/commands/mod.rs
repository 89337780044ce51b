//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Load the database URL from the environment.
///
/// Reads `PRODAVNICA_DATABASE_URL` with a fallback to the generic
/// `DATABASE_URL` used by hosted postgres attach.
///
/// # Errors
///
/// Returns an error when neither variable is set.
pub fn database_url() -> Result<SecretString, Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    std::env::var("PRODAVNICA_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| "PRODAVNICA_DATABASE_URL not set".into())
}
