//! Home page handler.

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::error::Result;
use crate::state::AppState;

/// Home page: the first page of the product grid.
pub async fn home(State(state): State<AppState>) -> Result<Json<Value>> {
    let page = state.products().list_page(1).await?;

    Ok(Json(json!({
        "products": page.products,
        "page": page.page,
        "total_pages": page.total_pages,
        "total_count": page.total_count,
    })))
}
