// handlers/public/users.rs - POST /users, GET /users/:id

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::database::models::UserPayload;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::state::AppState;

/// POST /users - Register a new account
pub async fn post_user(State(state): State<AppState>, ValidJson(payload): ValidJson<UserPayload>) -> ApiResult<Value> {
    let user_id = state.users.add_user(&payload).await?;

    Ok(ApiResponse::created(json!({ "userId": user_id })).with_message("User added"))
}

/// GET /users/:id - Public profile
pub async fn get_user(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let user = state.users.get_user_by_id(&id).await?;

    Ok(ApiResponse::success(json!({ "user": user })))
}
