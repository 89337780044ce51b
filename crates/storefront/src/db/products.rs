//! Product catalog repository.

use rust_decimal::Decimal;
use sqlx::PgPool;

use prodavnica_core::{Price, ProductId};

use crate::db::RepositoryError;
use crate::models::Product;

/// Products shown per catalog page.
pub const PAGE_SIZE: u32 = 12;

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    description: Option<String>,
    price: Decimal,
    image_url: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: Price::eur(row.price),
            image_url: row.image_url,
            created_at: row.created_at,
        }
    }
}

/// A page of catalog products.
#[derive(Debug)]
pub struct ProductPage {
    /// Products on this page, newest first.
    pub products: Vec<Product>,
    /// 1-based page number.
    pub page: u32,
    /// Total number of pages, at least 1.
    pub total_pages: u32,
    /// Total product count across all pages.
    pub total_count: i64,
}

/// Repository for the product catalog.
#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List one page of products, newest first. Pages are 1-based and a page
    /// past the end returns an empty list rather than an error.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure.
    pub async fn list_page(&self, page: u32) -> Result<ProductPage, RepositoryError> {
        let page = page.max(1);
        let offset = i64::from(page - 1) * i64::from(PAGE_SIZE);

        let rows: Vec<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, image_url, created_at
            FROM products
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(i64::from(PAGE_SIZE))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let (total_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let total_pages =
            u32::try_from(total_count.max(0).div_ceil(i64::from(PAGE_SIZE))).unwrap_or(u32::MAX);

        Ok(ProductPage {
            products: rows.into_iter().map(Product::from).collect(),
            page,
            total_pages: total_pages.max(1),
            total_count,
        })
    }

    /// Look up a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure.
    pub async fn get(&self, product_id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, price, image_url, created_at
            FROM products
            WHERE id = $1
            ",
        )
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }
}
