//! Database migration command.
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded in
//! this binary at compile time, so it can run against a fresh database
//! without a source checkout.

use tracing::info;

use prodavnica_storefront::db;

/// Run all pending database migrations.
///
/// # Errors
///
/// Returns an error when the database is unreachable or a migration fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
