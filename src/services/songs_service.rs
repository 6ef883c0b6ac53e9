use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use sqlx::PgPool;

use crate::database::models::{Song, SongPayload, SongSummary};
use crate::database::new_id;
use crate::services::error::ServiceError;

/// Song existence check used when songs are attached to playlists
#[async_trait]
pub trait SongLookup: Send + Sync {
    /// `ServiceError::NotFound` when no song has this id
    async fn get_song_by_id(&self, id: &str) -> Result<Song, ServiceError>;
}

/// Optional case-insensitive substring filters for GET /songs
#[derive(Debug, Clone, Default)]
pub struct SongFilter {
    pub title: Option<String>,
    pub performer: Option<String>,
}

pub struct SongsService {
    pool: PgPool,
}

impl SongsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add_song(&self, payload: &SongPayload) -> Result<String, ServiceError> {
        let id = new_id("song");
        let now = timestamp();

        let row = sqlx::query(
            "INSERT INTO songs (id, title, year, performer, genre, duration, inserted_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id",
        )
        .bind(&id)
        .bind(&payload.title)
        .bind(payload.year)
        .bind(&payload.performer)
        .bind(&payload.genre)
        .bind(payload.duration)
        .bind(&now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| ServiceError::from_write(e.into(), "Failed to add song"))?;

        if row.is_none() {
            return Err(ServiceError::Conflict("Failed to add song".to_string()));
        }

        tracing::info!(song = %id, "song added");
        Ok(id)
    }

    pub async fn get_songs(&self, filter: &SongFilter) -> Result<Vec<SongSummary>, ServiceError> {
        let songs = sqlx::query_as::<_, SongSummary>(
            "SELECT id, title, performer FROM songs
             WHERE ($1::TEXT IS NULL OR title ILIKE '%' || $1 || '%')
               AND ($2::TEXT IS NULL OR performer ILIKE '%' || $2 || '%')
             ORDER BY inserted_at, id",
        )
        .bind(&filter.title)
        .bind(&filter.performer)
        .fetch_all(&self.pool)
        .await?;

        Ok(songs)
    }

    pub async fn edit_song(&self, id: &str, payload: &SongPayload) -> Result<(), ServiceError> {
        let row = sqlx::query(
            "UPDATE songs
             SET title = $2, year = $3, performer = $4, genre = $5, duration = $6, updated_at = $7
             WHERE id = $1
             RETURNING id",
        )
        .bind(id)
        .bind(&payload.title)
        .bind(payload.year)
        .bind(&payload.performer)
        .bind(&payload.genre)
        .bind(payload.duration)
        .bind(timestamp())
        .fetch_optional(&self.pool)
        .await?;

        if row.is_none() {
            return Err(ServiceError::NotFound("Failed to update song, id not found".to_string()));
        }

        tracing::info!(song = %id, "song updated");
        Ok(())
    }

    pub async fn delete_song(&self, id: &str) -> Result<(), ServiceError> {
        let row = sqlx::query("DELETE FROM songs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        if row.is_none() {
            return Err(ServiceError::NotFound("Failed to delete song, id not found".to_string()));
        }

        tracing::info!(song = %id, "song deleted");
        Ok(())
    }
}

#[async_trait]
impl SongLookup for SongsService {
    async fn get_song_by_id(&self, id: &str) -> Result<Song, ServiceError> {
        sqlx::query_as::<_, Song>(
            "SELECT id, title, year, performer, genre, duration, inserted_at, updated_at
             FROM songs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::NotFound("Song not found".to_string()))
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
