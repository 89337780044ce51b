//! Integration tests for Prodavnica.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p prodavnica-cli -- migrate
//!
//! # Start the storefront
//! cargo run -p prodavnica-storefront
//!
//! # Run integration tests
//! cargo test -p prodavnica-integration-tests -- --ignored
//! ```
//!
//! The tests talk to a running storefront over HTTP. The base URL is read
//! from `STOREFRONT_BASE_URL` and defaults to `http://localhost:3000`.
//! Each test registers its own throwaway user so tests do not interfere
//! with each other.

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client that keeps session cookies across requests.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Register a fresh user and leave the client logged in.
///
/// Returns the generated email address.
///
/// # Panics
///
/// Panics if registration fails.
pub async fn register_test_user(client: &Client) -> String {
    let email = format!("test-{}@example.com", Uuid::new_v4());
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({
            "email": email,
            "password": "lozinka123",
            "first_name": "Test",
            "last_name": "Kupac",
        }))
        .send()
        .await
        .expect("Failed to register test user");

    assert!(
        resp.status().is_success(),
        "registration failed: {}",
        resp.status()
    );

    email
}

/// Save delivery data for the logged-in user.
///
/// # Panics
///
/// Panics if the request fails.
pub async fn save_test_delivery_data(client: &Client) {
    let base_url = base_url();

    let resp = client
        .put(format!("{base_url}/account/delivery"))
        .json(&json!({
            "first_name": "Test",
            "last_name": "Kupac",
            "phone": "+381601234567",
            "address": "Bulevar oslobođenja 1",
            "city": "Beograd",
            "postal_code": "11000",
        }))
        .send()
        .await
        .expect("Failed to save delivery data");

    assert!(resp.status().is_success());
}

/// Fetch the first product from the catalog, if any exists.
///
/// # Panics
///
/// Panics if the listing request fails.
pub async fn first_product_id(client: &Client) -> Option<i64> {
    let base_url = base_url();

    let body: Value = client
        .get(format!("{base_url}/products"))
        .send()
        .await
        .expect("Failed to list products")
        .json()
        .await
        .expect("Failed to parse product listing");

    body["products"]
        .as_array()
        .and_then(|products| products.first())
        .and_then(|product| product["id"].as_i64())
}
