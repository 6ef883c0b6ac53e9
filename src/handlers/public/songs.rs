// handlers/public/songs.rs - Song catalog CRUD

use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::database::models::SongPayload;
use crate::middleware::{ApiResponse, ApiResult, ValidJson};
use crate::services::{SongFilter, SongLookup};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SongQuery {
    pub title: Option<String>,
    pub performer: Option<String>,
}

impl From<SongQuery> for SongFilter {
    fn from(query: SongQuery) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            title: non_empty(query.title),
            performer: non_empty(query.performer),
        }
    }
}

/// POST /songs
pub async fn post_song(State(state): State<AppState>, ValidJson(payload): ValidJson<SongPayload>) -> ApiResult<Value> {
    let song_id = state.songs.add_song(&payload).await?;

    Ok(ApiResponse::created(json!({ "songId": song_id })).with_message("Song added"))
}

/// GET /songs?title=&performer=
pub async fn get_songs(State(state): State<AppState>, Query(query): Query<SongQuery>) -> ApiResult<Value> {
    let songs = state.songs.get_songs(&query.into()).await?;

    Ok(ApiResponse::success(json!({ "songs": songs })))
}

/// GET /songs/:id
pub async fn get_song(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Value> {
    let song = state.songs.get_song_by_id(&id).await?;

    Ok(ApiResponse::success(json!({ "song": song })))
}

/// PUT /songs/:id
pub async fn put_song(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<SongPayload>,
) -> ApiResult<()> {
    state.songs.edit_song(&id, &payload).await?;

    Ok(ApiResponse::message("Song updated"))
}

/// DELETE /songs/:id
pub async fn delete_song(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    state.songs.delete_song(&id).await?;

    Ok(ApiResponse::message("Song deleted"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filters_are_ignored() {
        let filter = SongFilter::from(SongQuery {
            title: Some("  ".to_string()),
            performer: Some("queen".to_string()),
        });
        assert_eq!(filter.title, None);
        assert_eq!(filter.performer.as_deref(), Some("queen"));
    }
}
