// handlers/public/uploads.rs - POST /upload/pictures

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
};
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::storage_service::is_allowed_image;
use crate::state::AppState;

const FILE_FIELD: &str = "data";

/// Store the image sent in multipart field `data` and return its public URL
pub async fn post_picture(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Value> {
    let mut multipart = multipart.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !is_allowed_image(&content_type) {
            return Err(ApiError::bad_request(format!(
                "\"content-type\" must be an image, got \"{}\"",
                content_type
            )));
        }

        let filename = field.file_name().unwrap_or("picture").to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let picture_url = state.storage.write_file(&bytes, &filename).await?;
        return Ok(ApiResponse::created(json!({ "pictureUrl": picture_url })).with_message("Picture uploaded"));
    }

    Err(ApiError::bad_request(format!("\"{}\" is required", FILE_FIELD)))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Payload content length greater than maximum allowed")
    } else {
        ApiError::bad_request(err.body_text())
    }
}
