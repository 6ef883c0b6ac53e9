use async_trait::async_trait;
use sqlx::{PgPool, Row};

use super::{DeletedPlaylist, PlaylistRepository};
use crate::database::manager::DatabaseError;
use crate::database::models::{Playlist, PlaylistSummary, SongSummary};

pub struct PgPlaylistRepository {
    pool: PgPool,
}

impl PgPlaylistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaylistRepository for PgPlaylistRepository {
    async fn insert_playlist(&self, playlist: &Playlist) -> Result<bool, DatabaseError> {
        let row = sqlx::query(
            "INSERT INTO playlists (id, name, owner) VALUES ($1, $2, $3)
             ON CONFLICT DO NOTHING
             RETURNING id",
        )
        .bind(&playlist.id)
        .bind(&playlist.name)
        .bind(&playlist.owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    async fn find_playlist(&self, id: &str) -> Result<Option<Playlist>, DatabaseError> {
        let playlist = sqlx::query_as::<_, Playlist>("SELECT id, name, owner FROM playlists WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(playlist)
    }

    async fn find_playlist_summary(&self, id: &str) -> Result<Option<PlaylistSummary>, DatabaseError> {
        let summary = sqlx::query_as::<_, PlaylistSummary>(
            "SELECT playlists.id, playlists.name, users.username
             FROM playlists
             JOIN users ON users.id = playlists.owner
             WHERE playlists.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn playlists_visible_to(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DatabaseError> {
        let playlists = sqlx::query_as::<_, PlaylistSummary>(
            "SELECT DISTINCT playlists.id, playlists.name, users.username
             FROM playlists
             LEFT JOIN collaborations ON collaborations.playlist_id = playlists.id
             JOIN users ON users.id = playlists.owner
             WHERE playlists.owner = $1 OR collaborations.user_id = $1
             ORDER BY playlists.id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(playlists)
    }

    async fn delete_playlist(&self, id: &str) -> Result<Option<DeletedPlaylist>, DatabaseError> {
        // The outer SELECT still sees the collaborations the cascade removes
        let rows = sqlx::query(
            "WITH removed AS (
                 DELETE FROM playlists WHERE id = $1 RETURNING id, owner
             )
             SELECT removed.owner, collaborations.user_id AS collaborator
             FROM removed
             LEFT JOIN collaborations ON collaborations.playlist_id = removed.id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let Some(first) = rows.first() else {
            return Ok(None);
        };

        let owner: String = first.try_get("owner")?;
        let mut collaborators = Vec::with_capacity(rows.len());
        for row in &rows {
            if let Some(user_id) = row.try_get::<Option<String>, _>("collaborator")? {
                collaborators.push(user_id);
            }
        }

        Ok(Some(DeletedPlaylist { owner, collaborators }))
    }

    async fn insert_playlist_song(&self, id: &str, playlist_id: &str, song_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "INSERT INTO playlistsongs (id, playlist_id, song_id) VALUES ($1, $2, $3)
             ON CONFLICT (playlist_id, song_id) DO NOTHING",
        )
        .bind(id)
        .bind(playlist_id)
        .bind(song_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn playlist_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DatabaseError> {
        let songs = sqlx::query_as::<_, SongSummary>(
            "SELECT songs.id, songs.title, songs.performer
             FROM songs
             JOIN playlistsongs ON playlistsongs.song_id = songs.id
             WHERE playlistsongs.playlist_id = $1",
        )
        .bind(playlist_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(songs)
    }

    async fn delete_playlist_song(&self, playlist_id: &str, song_id: &str) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM playlistsongs WHERE playlist_id = $1 AND song_id = $2")
            .bind(playlist_id)
            .bind(song_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
