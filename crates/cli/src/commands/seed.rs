//! Catalog seeding command.
//!
//! Inserts a small set of sample products for local development. Products are
//! matched by name, so re-running the command does not duplicate them.

use rust_decimal::{Decimal, dec};
use tracing::info;

use prodavnica_storefront::db;

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: Decimal,
}

fn sample_products() -> Vec<SeedProduct> {
    vec![
        SeedProduct {
            name: "Pamučna majica",
            description: "Jednobojna pamučna majica, dostupna u više boja.",
            price: dec!(14.90),
        },
        SeedProduct {
            name: "Farmerke slim fit",
            description: "Klasične farmerke uskog kroja.",
            price: dec!(39.90),
        },
        SeedProduct {
            name: "Zimska jakna",
            description: "Topla zimska jakna sa kapuljačom.",
            price: dec!(89.00),
        },
        SeedProduct {
            name: "Sportske patike",
            description: "Lagane patike za trčanje.",
            price: dec!(64.50),
        },
        SeedProduct {
            name: "Kožni kaiš",
            description: "Kaiš od prave kože, ručna izrada.",
            price: dec!(24.00),
        },
        SeedProduct {
            name: "Vunena kapa",
            description: "Pletena kapa od merino vune.",
            price: dec!(12.50),
        },
    ]
}

/// Insert sample products into the catalog.
///
/// # Errors
///
/// Returns an error when the database is unreachable or an insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let mut inserted = 0_u32;
    let mut skipped = 0_u32;

    for product in sample_products() {
        let result = sqlx::query(
            r"
            INSERT INTO products (name, description, price)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO NOTHING
            ",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price)
        .execute(&pool)
        .await?;

        if result.rows_affected() == 0 {
            skipped += 1;
        } else {
            inserted += 1;
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {inserted}");
    info!("  Products skipped (already exist): {skipped}");

    Ok(())
}
