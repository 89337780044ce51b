//! Account handlers for delivery data and order history.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::db::delivery::DeliveryForm;
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Saved delivery data for the logged-in user, or `null` when none exists.
pub async fn delivery(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let info = state.delivery().get(user.id).await?;

    Ok(Json(json!({ "delivery": info })))
}

/// Save (insert or replace) the delivery data for the logged-in user.
pub async fn save_delivery(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(form): Json<DeliveryForm>,
) -> Result<Json<Value>> {
    let info = state.delivery().upsert(user.id, &form).await?;

    Ok(Json(json!({
        "success": true,
        "message": "Delivery data saved",
        "delivery": info,
    })))
}

/// The logged-in user's orders with their lines, newest first.
pub async fn orders(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Value>> {
    let orders = state.orders().list_for_user(user.id).await?;

    Ok(Json(json!({ "orders": orders })))
}
