//! Product image upload handler.

use axum::{
    Json,
    extract::{Multipart, State},
};
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Accept a multipart upload with a `file` field and return the stored
/// image's public URL.
pub async fn upload(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .ok_or_else(|| AppError::BadRequest("file field has no content type".to_string()))?
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read file field: {e}")))?;

        let url = state.uploads().store_image(&content_type, data.to_vec()).await?;

        tracing::info!(user_id = %user.id, %url, "image uploaded");

        return Ok(Json(json!({
            "success": true,
            "message": "Image uploaded",
            "url": url,
        })));
    }

    Err(AppError::BadRequest("missing file field".to_string()))
}
