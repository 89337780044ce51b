//! Order domain types.
//!
//! Orders snapshot the cart at checkout time: each [`OrderLine`] carries the
//! unit price that was current when the order was created, and the order
//! total is fixed at creation. Within the storefront an order is immutable
//! once persisted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use prodavnica_core::price::round_money;
use prodavnica_core::{OrderId, OrderLineId, OrderStatus, ProductId, UserId};

use crate::models::cart::CartItem;

/// A persisted order.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// User who placed the order.
    pub user_id: UserId,
    /// Total fixed at creation time.
    pub total_amount: Decimal,
    /// Lifecycle status, `pending` at creation.
    pub status: OrderStatus,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// Snapshotted line items.
    pub lines: Vec<OrderLine>,
}

/// A persisted order line.
#[derive(Debug, Clone, Serialize)]
pub struct OrderLine {
    /// Unique order line ID.
    pub id: OrderLineId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Number of units.
    pub quantity: u32,
    /// Unit price at order-creation time.
    pub unit_price: Decimal,
    /// Product image at order-creation time.
    pub image_url: Option<String>,
}

/// An order about to be created.
#[derive(Debug, Clone)]
pub struct NewOrder {
    /// User placing the order.
    pub user_id: UserId,
    /// Computed total, must match the line-item sum.
    pub total_amount: Decimal,
    /// Initial status.
    pub status: OrderStatus,
    /// Lines derived from the cart.
    pub lines: Vec<NewOrderLine>,
}

/// A line of an order about to be created.
#[derive(Debug, Clone)]
pub struct NewOrderLine {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Number of units, must be positive.
    pub quantity: u32,
    /// Unit price snapshotted from the cart.
    pub unit_price: Decimal,
    /// Product image snapshotted from the cart.
    pub image_url: Option<String>,
}

impl NewOrder {
    /// Build a pending order from cart items, deriving lines 1:1 and summing
    /// the total from the snapshotted prices.
    #[must_use]
    pub fn from_cart(user_id: UserId, items: &[CartItem]) -> Self {
        let lines: Vec<NewOrderLine> = items
            .iter()
            .map(|item| NewOrderLine {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price.amount,
                image_url: item.image_url.clone(),
            })
            .collect();

        let total_amount = round_money(
            lines
                .iter()
                .map(|line| line.unit_price * Decimal::from(line.quantity))
                .sum(),
        );

        Self {
            user_id,
            total_amount,
            status: OrderStatus::Pending,
            lines,
        }
    }

    /// Sum of `quantity * unit_price` over all lines, rounded to two decimals.
    #[must_use]
    pub fn line_sum(&self) -> Decimal {
        round_money(
            self.lines
                .iter()
                .map(|line| line.unit_price * Decimal::from(line.quantity))
                .sum(),
        )
    }
}

#[cfg(test)]
mod tests {
    use prodavnica_core::{CartItemId, Price};
    use rust_decimal::dec;

    use super::*;

    fn cart_item(product: i32, quantity: u32, amount: Decimal) -> CartItem {
        CartItem {
            id: CartItemId::new(product),
            user_id: UserId::new(1),
            product_id: ProductId::new(product),
            product_name: format!("Product {product}"),
            quantity,
            unit_price: Price::eur(amount),
            image_url: Some(format!("/uploads/{product}.jpg")),
        }
    }

    #[test]
    fn test_from_cart_derives_lines_one_to_one() {
        let items = vec![cart_item(1, 2, dec!(10.00)), cart_item(2, 1, dec!(5.00))];
        let order = NewOrder::from_cart(UserId::new(7), &items);

        assert_eq!(order.user_id, UserId::new(7));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.lines.len(), 2);
        assert_eq!(order.total_amount, dec!(25.00));

        let first = order.lines.first().expect("first line");
        assert_eq!(first.product_id, ProductId::new(1));
        assert_eq!(first.quantity, 2);
        assert_eq!(first.unit_price, dec!(10.00));
        assert_eq!(first.image_url.as_deref(), Some("/uploads/1.jpg"));
    }

    #[test]
    fn test_total_matches_line_sum() {
        let items = vec![cart_item(1, 3, dec!(3.33)), cart_item(2, 2, dec!(0.10))];
        let order = NewOrder::from_cart(UserId::new(1), &items);
        assert_eq!(order.total_amount, order.line_sum());
        assert_eq!(order.total_amount, dec!(10.19));
    }
}
