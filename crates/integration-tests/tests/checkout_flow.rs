//! Integration tests for the checkout flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront running (cargo run -p prodavnica-storefront)
//! - At least one seeded product (cargo run -p prodavnica-cli -- seed)
//!
//! Run with: cargo test -p prodavnica-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use prodavnica_integration_tests::{
    base_url, first_product_id, register_test_user, save_test_delivery_data, session_client,
};

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_checkout_requires_authentication() {
    let client = session_client();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to call checkout");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_checkout_with_empty_cart_does_nothing() {
    let client = session_client();
    register_test_user(&client).await;
    let base_url = base_url();

    let body: Value = client
        .post(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to call checkout")
        .json()
        .await
        .expect("Failed to parse checkout response");

    // A no-op, but a successful one: no order is created
    assert_eq!(body["success"], json!(true));
    assert!(body.get("order_id").is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_checkout_without_delivery_data_redirects_to_form() {
    let client = session_client();
    register_test_user(&client).await;
    let base_url = base_url();

    let product_id = first_product_id(&client)
        .await
        .expect("catalog must contain at least one product");

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert!(resp.status().is_success());

    let body: Value = client
        .post(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to call checkout")
        .json()
        .await
        .expect("Failed to parse checkout response");

    assert_eq!(body["success"], json!(false));
    assert_eq!(body["redirect"], json!("/account/delivery"));

    // The cart must be untouched by the failed checkout
    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to read cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_full_checkout_creates_order_and_clears_cart() {
    let client = session_client();
    register_test_user(&client).await;
    save_test_delivery_data(&client).await;
    let base_url = base_url();

    let product_id = first_product_id(&client)
        .await
        .expect("catalog must contain at least one product");

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert!(resp.status().is_success());

    let body: Value = client
        .post(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to call checkout")
        .json()
        .await
        .expect("Failed to parse checkout response");

    assert_eq!(body["success"], json!(true), "checkout failed: {body}");
    assert!(body["order_id"].as_i64().is_some());

    // The cart is emptied after a successful checkout
    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to read cart")
        .json()
        .await
        .expect("Failed to parse cart");
    assert_eq!(cart["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_order_history_lists_created_order() {
    let client = session_client();
    register_test_user(&client).await;
    save_test_delivery_data(&client).await;
    let base_url = base_url();

    let product_id = first_product_id(&client)
        .await
        .expect("catalog must contain at least one product");

    client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to add to cart");

    let body: Value = client
        .post(format!("{base_url}/checkout"))
        .send()
        .await
        .expect("Failed to call checkout")
        .json()
        .await
        .expect("Failed to parse checkout response");
    let order_id = body["order_id"].as_i64().expect("order id");

    let history: Value = client
        .get(format!("{base_url}/account/orders"))
        .send()
        .await
        .expect("Failed to read order history")
        .json()
        .await
        .expect("Failed to parse order history");

    let orders = history["orders"].as_array().expect("orders array");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["id"], json!(order_id));
    assert_eq!(orders[0]["status"], json!("pending"));
    let lines = orders[0]["lines"].as_array().expect("order lines");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], json!(2));
    assert_eq!(lines[0]["product_id"], json!(product_id));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_cart_quantity_update_and_remove() {
    let client = session_client();
    register_test_user(&client).await;
    let base_url = base_url();

    let product_id = first_product_id(&client)
        .await
        .expect("catalog must contain at least one product");

    client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to read cart")
        .json()
        .await
        .expect("Failed to parse cart");
    let item_id = cart["items"][0]["id"].as_i64().expect("cart item id");

    let resp = client
        .post(format!("{base_url}/cart/update"))
        .json(&json!({ "item_id": item_id, "quantity": 3 }))
        .send()
        .await
        .expect("Failed to update cart");
    assert!(resp.status().is_success());

    let count: Value = client
        .get(format!("{base_url}/cart/count"))
        .send()
        .await
        .expect("Failed to read cart count")
        .json()
        .await
        .expect("Failed to parse cart count");
    assert_eq!(count["count"], json!(3));

    let resp = client
        .post(format!("{base_url}/cart/remove"))
        .json(&json!({ "item_id": item_id }))
        .send()
        .await
        .expect("Failed to remove cart item");
    assert!(resp.status().is_success());

    let count: Value = client
        .get(format!("{base_url}/cart/count"))
        .send()
        .await
        .expect("Failed to read cart count")
        .json()
        .await
        .expect("Failed to parse cart count");
    assert_eq!(count["count"], json!(0));
}
