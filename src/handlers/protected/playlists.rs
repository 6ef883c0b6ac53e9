// handlers/protected/playlists.rs - playlists and their songs

use axum::extract::{Path, State};
use axum::Extension;
use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult, AuthUser, ValidJson};
use crate::state::AppState;
use crate::validators::{PlaylistPayload, PlaylistSongPayload};

/// POST /playlists
pub async fn post_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ValidJson(payload): ValidJson<PlaylistPayload>,
) -> ApiResult<Value> {
    let playlist_id = state.playlists.add_playlist(&payload.name, &user.id).await?;

    Ok(ApiResponse::created(json!({ "playlistId": playlist_id })).with_message("Playlist added"))
}

/// GET /playlists - owned and shared playlists
pub async fn get_playlists(State(state): State<AppState>, Extension(user): Extension<AuthUser>) -> ApiResult<Value> {
    let playlists = state.playlists.get_playlists(&user.id).await?;

    Ok(ApiResponse::success(json!({ "playlists": playlists })))
}

/// DELETE /playlists/:id - owner only
pub async fn delete_playlist(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.playlists.verify_playlist_owner(&user.id, &id).await?;
    state.playlists.delete_playlist_by_id(&id).await?;

    Ok(ApiResponse::message("Playlist deleted"))
}

/// POST /playlists/:id/songs
pub async fn post_playlist_song(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<PlaylistSongPayload>,
) -> ApiResult<()> {
    state.playlists.verify_playlist_access(&user.id, &id).await?;
    state.playlists.add_playlist_song(&id, &payload.song_id).await?;

    Ok(ApiResponse::message("Song added to playlist").with_status(axum::http::StatusCode::CREATED))
}

/// GET /playlists/:id/songs
pub async fn get_playlist_songs(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    state.playlists.verify_playlist_access(&user.id, &id).await?;
    let playlist = state.playlists.get_playlist_by_id(&id).await?;
    let songs = state.playlists.get_playlist_songs(&id).await?;

    Ok(ApiResponse::success(json!({
        "playlist": {
            "id": playlist.id,
            "name": playlist.name,
            "username": playlist.username,
            "songs": songs,
        }
    })))
}

/// DELETE /playlists/:id/songs
pub async fn delete_playlist_song(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<PlaylistSongPayload>,
) -> ApiResult<()> {
    state.playlists.verify_playlist_access(&user.id, &id).await?;
    state.playlists.delete_playlist_song(&id, &payload.song_id).await?;

    Ok(ApiResponse::message("Song removed from playlist"))
}
