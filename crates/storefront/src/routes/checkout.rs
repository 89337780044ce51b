//! Checkout handler.

use axum::{Json, extract::State};

use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::routes::ActionResponse;
use crate::services::checkout::{CheckoutError, CheckoutOutcome};
use crate::state::AppState;

/// Run the checkout flow over the user's current cart.
///
/// Responds with `success: false` and a redirect to the delivery form when
/// the user has not saved delivery data yet. An empty cart is a successful
/// no-op: nothing is created and no `order_id` is returned.
pub async fn checkout(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<ActionResponse>> {
    let items = state.cart().items_for_user(user.id).await?;

    let outcome = state.checkout().complete_checkout(&user, &items).await;

    let response = match outcome {
        Ok(CheckoutOutcome::Completed {
            order_id,
            notification_sent,
            ..
        }) => {
            let message = if notification_sent {
                "Order created successfully"
            } else {
                "Order created successfully, confirmation email could not be sent"
            };
            ActionResponse::ok(message).with_order_id(order_id)
        }
        Ok(CheckoutOutcome::NothingToDo) => {
            ActionResponse::ok("Your cart is empty, there is nothing to order")
        }
        Err(CheckoutError::MissingDeliveryData) => {
            ActionResponse::failure("Please fill in your delivery data first")
                .with_redirect("/account/delivery")
        }
        Err(CheckoutError::OrderCreationFailed(reason)) => {
            tracing::error!(user_id = %user.id, %reason, "order creation failed");
            ActionResponse::failure("Order could not be created, please try again")
        }
    };

    Ok(Json(response))
}
