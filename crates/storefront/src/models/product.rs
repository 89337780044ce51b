//! Product domain type.

use chrono::{DateTime, Utc};
use serde::Serialize;

use prodavnica_core::{Price, ProductId};

/// A catalog product.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Unique product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Optional long description.
    pub description: Option<String>,
    /// Current unit price.
    pub price: Price,
    /// Optional product image URL.
    pub image_url: Option<String>,
    /// When the product was created.
    pub created_at: DateTime<Utc>,
}
