//! Cart repository.
//!
//! Cart lines reference products by ID; prices and images are joined in at
//! read time so the cart always reflects the current catalog.

use rust_decimal::Decimal;
use sqlx::PgPool;

use prodavnica_core::{CartItemId, Price, ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::CartItem;

#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: CartItemId,
    user_id: UserId,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    unit_price: Decimal,
    image_url: Option<String>,
}

impl CartItemRow {
    fn into_item(self) -> Result<CartItem, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "non-positive quantity {} for cart item {}",
                self.quantity, self.id
            ))
        })?;
        Ok(CartItem {
            id: self.id,
            user_id: self.user_id,
            product_id: self.product_id,
            product_name: self.product_name,
            quantity,
            unit_price: Price::eur(self.unit_price),
            image_url: self.image_url,
        })
    }
}

/// Repository for per-user cart lines.
#[derive(Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// All cart lines for a user, joined with current product data.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure or corrupted rows.
    pub async fn items_for_user(&self, user_id: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows: Vec<CartItemRow> = sqlx::query_as(
            r"
            SELECT c.id, c.user_id, c.product_id,
                   p.name AS product_name, c.quantity,
                   p.price AS unit_price, p.image_url
            FROM cart_items c
            JOIN products p ON p.id = c.product_id
            WHERE c.user_id = $1
            ORDER BY c.created_at ASC, c.id ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CartItemRow::into_item).collect()
    }

    /// Add a product to the cart, or bump the quantity if it is already there.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] for a zero quantity,
    /// [`RepositoryError::NotFound`] for an unknown product, or
    /// [`RepositoryError::Database`] on other failures.
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        if quantity == 0 {
            return Err(RepositoryError::Validation(
                "quantity must be positive".to_string(),
            ));
        }

        let quantity = i32::try_from(quantity)
            .map_err(|_| RepositoryError::Validation("quantity too large".to_string()))?;

        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(user_id)
        .bind(product_id)
        .bind(quantity)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                RepositoryError::NotFound
            }
            _ => RepositoryError::Database(e),
        })?;

        Ok(())
    }

    /// Set the quantity of an existing cart line. The line must belong to the
    /// given user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] for a zero quantity,
    /// [`RepositoryError::NotFound`] if the line does not exist for this user,
    /// or [`RepositoryError::Database`] on other failures.
    pub async fn update_quantity(
        &self,
        user_id: UserId,
        item_id: CartItemId,
        quantity: u32,
    ) -> Result<(), RepositoryError> {
        if quantity == 0 {
            return Err(RepositoryError::Validation(
                "quantity must be positive".to_string(),
            ));
        }

        let quantity = i32::try_from(quantity)
            .map_err(|_| RepositoryError::Validation("quantity too large".to_string()))?;

        let result = sqlx::query(
            "UPDATE cart_items SET quantity = $3 WHERE id = $2 AND user_id = $1",
        )
        .bind(user_id)
        .bind(item_id)
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove one cart line. The line must belong to the given user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::NotFound`] if the line does not exist for
    /// this user, or [`RepositoryError::Database`] on other failures.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        item_id: CartItemId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = $2 AND user_id = $1")
            .bind(user_id)
            .bind(item_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Remove all cart lines for a user. Clearing an already-empty cart is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure.
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Total number of units across all cart lines for a user.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure.
    pub async fn count(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM cart_items WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
