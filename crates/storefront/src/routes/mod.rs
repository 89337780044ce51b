//! HTTP route handlers for the storefront.
//!
//! All handlers return JSON. Action endpoints respond with an
//! [`ActionResponse`] carrying a `success` flag and a human-readable
//! `message`, plus optional follow-up data such as a redirect target.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (first page of the product grid)
//!
//! # Products
//! GET  /products               - Product listing (?page=N, 12 per page)
//! GET  /products/{id}          - Product detail
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart contents with subtotal
//! POST /cart/add               - Add a product to the cart
//! POST /cart/update            - Set quantity of a cart line
//! POST /cart/remove            - Remove a cart line
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Total units in the cart
//!
//! # Checkout (requires auth)
//! POST /checkout               - Run the checkout flow
//!
//! # Account (requires auth)
//! GET  /account/delivery       - Saved delivery data
//! PUT  /account/delivery       - Save delivery data
//! GET  /account/orders         - Order history with lines
//!
//! # Auth
//! POST /auth/register          - Create account and log in
//! POST /auth/login             - Log in
//! POST /auth/logout            - Log out
//!
//! # Uploads (requires auth)
//! POST /upload                 - Upload a product image
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;
pub mod upload;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use serde::Serialize;

use prodavnica_core::OrderId;

use crate::state::AppState;

/// JSON body returned by action endpoints.
#[derive(Debug, Serialize)]
pub struct ActionResponse {
    /// Whether the action succeeded.
    pub success: bool,
    /// Human-readable outcome message.
    pub message: String,
    /// ID of the order created by a checkout, when one was.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<OrderId>,
    /// Where the client should navigate next, when the action cannot
    /// complete where it was requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl ActionResponse {
    /// A successful action with a message.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            order_id: None,
            redirect: None,
        }
    }

    /// A failed action with a message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            order_id: None,
            redirect: None,
        }
    }

    /// Attach a redirect target.
    #[must_use]
    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect = Some(target.into());
        self
    }

    /// Attach the created order ID.
    #[must_use]
    pub const fn with_order_id(mut self, order_id: OrderId) -> Self {
        self.order_id = Some(order_id);
        self
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/delivery",
            get(account::delivery).put(account::save_delivery),
        )
        .route("/orders", get(account::orders))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(checkout::checkout))
        // Account routes
        .nest("/account", account_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // Image upload, with headroom over the stored-image limit for the
        // multipart framing
        .route(
            "/upload",
            post(upload::upload)
                .layer(DefaultBodyLimit::max(crate::services::uploads::MAX_UPLOAD_BYTES + 64 * 1024)),
        )
}
