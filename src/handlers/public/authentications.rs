// handlers/public/authentications.rs - login, token refresh and logout

use axum::extract::State;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::authentications_service::invalid_refresh_token;
use crate::state::AppState;
use crate::validators::{LoginPayload, RefreshTokenPayload};

/// POST /authentications - Exchange credentials for an access/refresh token pair
pub async fn post_authentication(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<LoginPayload>,
) -> ApiResult<Value> {
    let user_id = state
        .users
        .verify_user_credential(&payload.username, &payload.password)
        .await?;

    let access_token = state.tokens.generate_access_token(&user_id)?;
    let refresh_token = state.tokens.generate_refresh_token(&user_id)?;
    state.authentications.add_refresh_token(&refresh_token).await?;

    tracing::info!(user = %user_id, "user logged in");
    Ok(ApiResponse::created(json!({
        "accessToken": access_token,
        "refreshToken": refresh_token,
    }))
    .with_message("Authentication added"))
}

/// PUT /authentications - Issue a fresh access token for a stored refresh token
pub async fn put_authentication(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RefreshTokenPayload>,
) -> ApiResult<Value> {
    state.authentications.verify_refresh_token(&payload.refresh_token).await?;
    let claims = state
        .tokens
        .verify_refresh_token(&payload.refresh_token)
        .map_err(|_| ApiError::from(invalid_refresh_token()))?;

    let access_token = state.tokens.generate_access_token(&claims.id)?;

    Ok(ApiResponse::success(json!({ "accessToken": access_token })).with_message("Access Token updated"))
}

/// DELETE /authentications - Revoke a refresh token
pub async fn delete_authentication(
    State(state): State<AppState>,
    ValidJson(payload): ValidJson<RefreshTokenPayload>,
) -> ApiResult<()> {
    state.authentications.verify_refresh_token(&payload.refresh_token).await?;
    state.authentications.delete_refresh_token(&payload.refresh_token).await?;

    Ok(ApiResponse::message("Refresh token deleted"))
}
