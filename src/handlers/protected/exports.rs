// handlers/protected/exports.rs - POST /export/playlists/:playlistId

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Extension;

use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};
use crate::services::producer_service::{publish_export, ExportMessage};
use crate::state::AppState;
use crate::validators::ExportPayload;

/// Queue an export of the playlist's songs to the given address
pub async fn post_export_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(playlist_id): Path<String>,
    ValidJson(payload): ValidJson<ExportPayload>,
) -> ApiResult<()> {
    state.playlists.verify_playlist_access(&user.id, &playlist_id).await?;

    let message = ExportMessage {
        playlist_id,
        target_email: payload.target_email,
    };
    publish_export(state.producer.as_ref(), &state.export_queue, &message).await?;

    Ok(ApiResponse::message("Your request is being processed").with_status(StatusCode::CREATED))
}
