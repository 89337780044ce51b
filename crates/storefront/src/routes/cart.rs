//! Cart handlers.
//!
//! All cart endpoints require a logged-in user; carts are keyed by user ID.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};

use prodavnica_core::{CartItemId, ProductId};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::cart::cart_subtotal;
use crate::routes::ActionResponse;
use crate::state::AppState;

/// Body for adding a product to the cart.
#[derive(Debug, Deserialize)]
pub struct AddForm {
    /// Product to add.
    pub product_id: i32,
    /// Units to add, defaults to one.
    pub quantity: Option<u32>,
}

/// Body for changing the quantity of a cart line.
#[derive(Debug, Deserialize)]
pub struct UpdateForm {
    /// Cart line to change.
    pub item_id: i32,
    /// New quantity, must be positive.
    pub quantity: u32,
}

/// Body for removing a cart line.
#[derive(Debug, Deserialize)]
pub struct RemoveForm {
    /// Cart line to remove.
    pub item_id: i32,
}

/// Cart contents with line totals and subtotal.
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let items = state.cart().items_for_user(user.id).await?;
    let subtotal = cart_subtotal(&items);

    let lines: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "id": item.id,
                "product_id": item.product_id,
                "product_name": item.product_name,
                "quantity": item.quantity,
                "unit_price": item.unit_price,
                "line_total": item.line_total(),
                "image_url": item.image_url,
            })
        })
        .collect();

    Ok(Json(json!({
        "items": lines,
        "subtotal": subtotal,
    })))
}

/// Add a product to the cart.
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<AddForm>,
) -> Result<Json<ActionResponse>> {
    state
        .cart()
        .add_item(
            user.id,
            ProductId::new(form.product_id),
            form.quantity.unwrap_or(1),
        )
        .await?;

    Ok(Json(ActionResponse::ok("Product added to cart")))
}

/// Set the quantity of a cart line.
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<UpdateForm>,
) -> Result<Json<ActionResponse>> {
    state
        .cart()
        .update_quantity(user.id, CartItemId::new(form.item_id), form.quantity)
        .await?;

    Ok(Json(ActionResponse::ok("Cart updated")))
}

/// Remove a cart line.
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<RemoveForm>,
) -> Result<Json<ActionResponse>> {
    state
        .cart()
        .remove_item(user.id, CartItemId::new(form.item_id))
        .await?;

    Ok(Json(ActionResponse::ok("Item removed from cart")))
}

/// Empty the cart.
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ActionResponse>> {
    state.cart().clear(user.id).await?;

    Ok(Json(ActionResponse::ok("Cart cleared")))
}

/// Total number of units in the cart, for the header badge.
pub async fn count(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let count = state.cart().count(user.id).await?;

    Ok(Json(json!({ "count": count })))
}
