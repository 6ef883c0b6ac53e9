// handlers/protected/collaborations.rs - share a playlist with another user

use axum::extract::State;
use axum::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};
use crate::state::AppState;
use crate::validators::CollaborationPayload;

/// POST /collaborations - playlist owner only
pub async fn post_collaboration(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(payload): ValidJson<CollaborationPayload>,
) -> ApiResult<Value> {
    state.playlists.verify_playlist_owner(&user.id, &payload.playlist_id).await?;
    state.users.get_user_by_id(&payload.user_id).await?;

    let collaboration_id = state
        .collaborations
        .add_collaboration(&payload.user_id, &payload.playlist_id)
        .await?;

    Ok(ApiResponse::created(json!({ "collaborationId": collaboration_id })).with_message("Collaboration added"))
}

/// DELETE /collaborations - playlist owner only
pub async fn delete_collaboration(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(payload): ValidJson<CollaborationPayload>,
) -> ApiResult<()> {
    state.playlists.verify_playlist_owner(&user.id, &payload.playlist_id).await?;
    state
        .collaborations
        .delete_collaboration(&payload.user_id, &payload.playlist_id)
        .await?;

    Ok(ApiResponse::message("Collaboration deleted"))
}
