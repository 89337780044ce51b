//! Cart domain types.

use rust_decimal::Decimal;
use serde::Serialize;

use prodavnica_core::price::round_money;
use prodavnica_core::{CartItemId, Price, ProductId, UserId};

/// A line item in a user's cart.
///
/// `unit_price` and `image_url` are snapshotted from the product row when the
/// cart is read, so a checkout works from one consistent view of prices.
#[derive(Debug, Clone, Serialize)]
pub struct CartItem {
    /// Unique cart item ID.
    pub id: CartItemId,
    /// Owning user.
    pub user_id: UserId,
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Product display name, for the cart page.
    pub product_name: String,
    /// Number of units, always positive.
    pub quantity: u32,
    /// Unit price at the time the cart was read.
    pub unit_price: Price,
    /// Product image at the time the cart was read.
    pub image_url: Option<String>,
}

impl CartItem {
    /// Total for this line, rounded to two decimals.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price.line_total(self.quantity)
    }
}

/// Sum of all line totals, rounded to two decimals.
#[must_use]
pub fn cart_subtotal(items: &[CartItem]) -> Decimal {
    round_money(items.iter().map(CartItem::line_total).sum())
}
