//! Order repository.
//!
//! Order creation is transactional: the order row and all of its lines are
//! inserted together or not at all. Inputs are validated up front so a bad
//! order never opens a transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use prodavnica_core::{OrderId, OrderLineId, OrderStatus, ProductId, UserId};

use crate::db::RepositoryError;
use crate::models::{NewOrder, Order, OrderLine};

/// Repository for persisted orders.
#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    total_amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
struct OrderLineRow {
    id: OrderLineId,
    order_id: OrderId,
    product_id: ProductId,
    quantity: i32,
    unit_price: Decimal,
    image_url: Option<String>,
}

impl OrderLineRow {
    fn into_line(self) -> Result<OrderLine, RepositoryError> {
        let quantity = u32::try_from(self.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!(
                "negative quantity for order line {}",
                self.id
            ))
        })?;
        Ok(OrderLine {
            id: self.id,
            product_id: self.product_id,
            quantity,
            unit_price: self.unit_price,
            image_url: self.image_url,
        })
    }
}

/// Attach lines to their orders, preserving the order of `orders`.
fn assemble_orders(
    orders: Vec<OrderRow>,
    lines: Vec<OrderLineRow>,
) -> Result<Vec<Order>, RepositoryError> {
    let mut lines_by_order: HashMap<OrderId, Vec<OrderLine>> = HashMap::new();
    for row in lines {
        let order_id = row.order_id;
        lines_by_order
            .entry(order_id)
            .or_default()
            .push(row.into_line()?);
    }

    orders
        .into_iter()
        .map(|row| {
            let status: OrderStatus = row.status.parse().map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid status for order {}: {e}",
                    row.id
                ))
            })?;
            Ok(Order {
                id: row.id,
                user_id: row.user_id,
                total_amount: row.total_amount,
                status,
                created_at: row.created_at,
                lines: lines_by_order.remove(&row.id).unwrap_or_default(),
            })
        })
        .collect()
}

/// Check a [`NewOrder`] before it touches the database.
///
/// # Errors
///
/// Returns [`RepositoryError::Validation`] when the order has no lines, any
/// line has a zero quantity, or the stated total does not match the line sum.
pub fn validate_new_order(order: &NewOrder) -> Result<(), RepositoryError> {
    if order.lines.is_empty() {
        return Err(RepositoryError::Validation(
            "order has no lines".to_string(),
        ));
    }
    if order.lines.iter().any(|line| line.quantity == 0) {
        return Err(RepositoryError::Validation(
            "order line has zero quantity".to_string(),
        ));
    }
    if order.total_amount != order.line_sum() {
        return Err(RepositoryError::Validation(format!(
            "order total {} does not match line sum {}",
            order.total_amount,
            order.line_sum()
        )));
    }
    Ok(())
}

impl OrderRepository {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist an order and its lines in one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError::Validation`] for a malformed order, or
    /// [`RepositoryError::Database`] on failure. No rows are written when an
    /// error is returned.
    pub async fn create(&self, order: &NewOrder) -> Result<OrderId, RepositoryError> {
        validate_new_order(order)?;

        let mut tx = self.pool.begin().await?;

        let (order_id,): (OrderId,) = sqlx::query_as(
            r"
            INSERT INTO orders (user_id, total_amount, status)
            VALUES ($1, $2, $3)
            RETURNING id
            ",
        )
        .bind(order.user_id)
        .bind(order.total_amount)
        .bind(order.status.to_string())
        .fetch_one(&mut *tx)
        .await?;

        for line in &order.lines {
            let quantity = i32::try_from(line.quantity)
                .map_err(|_| RepositoryError::Validation("quantity too large".to_string()))?;

            sqlx::query(
                r"
                INSERT INTO order_lines (order_id, product_id, quantity, unit_price, image_url)
                VALUES ($1, $2, $3, $4, $5)
                ",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(quantity)
            .bind(line.unit_price)
            .bind(line.image_url.as_deref())
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(order_id)
    }

    /// List a user's orders with their lines, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] on database failure or corrupted rows.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let orders: Vec<OrderRow> = sqlx::query_as(
            r"
            SELECT id, user_id, total_amount, status, created_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let lines: Vec<OrderLineRow> = sqlx::query_as(
            r"
            SELECT l.id, l.order_id, l.product_id, l.quantity, l.unit_price, l.image_url
            FROM order_lines l
            JOIN orders o ON o.id = l.order_id
            WHERE o.user_id = $1
            ORDER BY l.id
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        assemble_orders(orders, lines)
    }
}

#[cfg(test)]
mod tests {
    use prodavnica_core::{OrderStatus, ProductId, UserId};
    use rust_decimal::dec;

    use super::*;
    use crate::models::NewOrderLine;

    fn order_with(total: rust_decimal::Decimal, lines: Vec<NewOrderLine>) -> NewOrder {
        NewOrder {
            user_id: UserId::new(1),
            total_amount: total,
            status: OrderStatus::Pending,
            lines,
        }
    }

    fn line(quantity: u32, unit_price: rust_decimal::Decimal) -> NewOrderLine {
        NewOrderLine {
            product_id: ProductId::new(1),
            quantity,
            unit_price,
            image_url: None,
        }
    }

    #[test]
    fn test_validate_rejects_empty_order() {
        let order = order_with(dec!(0), vec![]);
        assert!(matches!(
            validate_new_order(&order),
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let order = order_with(dec!(0.00), vec![line(0, dec!(10.00))]);
        assert!(matches!(
            validate_new_order(&order),
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_total_mismatch() {
        let order = order_with(dec!(99.00), vec![line(2, dec!(10.00))]);
        assert!(matches!(
            validate_new_order(&order),
            Err(RepositoryError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_accepts_consistent_order() {
        let order = order_with(dec!(20.00), vec![line(2, dec!(10.00))]);
        assert!(validate_new_order(&order).is_ok());
    }

    fn order_row(id: i32, total: rust_decimal::Decimal, status: &str) -> OrderRow {
        OrderRow {
            id: OrderId::new(id),
            user_id: UserId::new(1),
            total_amount: total,
            status: status.to_string(),
            created_at: chrono::Utc::now(),
        }
    }

    fn line_row(id: i32, order: i32, quantity: i32) -> OrderLineRow {
        OrderLineRow {
            id: OrderLineId::new(id),
            order_id: OrderId::new(order),
            product_id: ProductId::new(1),
            quantity,
            unit_price: dec!(10.00),
            image_url: None,
        }
    }

    #[test]
    fn test_assemble_groups_lines_under_their_orders() {
        let orders = vec![
            order_row(2, dec!(30.00), "pending"),
            order_row(1, dec!(10.00), "pending"),
        ];
        let lines = vec![line_row(1, 1, 1), line_row(2, 2, 2), line_row(3, 2, 1)];

        let assembled = assemble_orders(orders, lines).expect("assemble");

        assert_eq!(assembled.len(), 2);
        assert_eq!(assembled[0].id, OrderId::new(2));
        assert_eq!(assembled[0].lines.len(), 2);
        assert_eq!(assembled[0].lines[0].quantity, 2);
        assert_eq!(assembled[1].id, OrderId::new(1));
        assert_eq!(assembled[1].lines.len(), 1);
        assert_eq!(assembled[1].status, OrderStatus::Pending);
    }

    #[test]
    fn test_assemble_rejects_unknown_status() {
        let orders = vec![order_row(1, dec!(10.00), "misplaced")];
        assert!(matches!(
            assemble_orders(orders, vec![]),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
