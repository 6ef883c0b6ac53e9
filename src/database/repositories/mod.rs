//! Statements behind the playlist and collaboration registries.
//!
//! The traits are the seam between the registries and PostgreSQL. Writes that
//! PostgreSQL skips because of `ON CONFLICT DO NOTHING` report "nothing
//! written" through their return value rather than an error.

pub mod collaborations;
pub mod playlists;

use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{Playlist, PlaylistSummary, SongSummary};

pub use collaborations::PgCollaborationRepository;
pub use playlists::PgPlaylistRepository;

/// Who needs their cached playlist list refreshed after a playlist is removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedPlaylist {
    pub owner: String,
    pub collaborators: Vec<String>,
}

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Returns false when no row was written
    async fn insert_playlist(&self, playlist: &Playlist) -> Result<bool, DatabaseError>;

    async fn find_playlist(&self, id: &str) -> Result<Option<Playlist>, DatabaseError>;

    async fn find_playlist_summary(&self, id: &str) -> Result<Option<PlaylistSummary>, DatabaseError>;

    /// Playlists owned by `user_id` or shared with them, each listed once
    async fn playlists_visible_to(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DatabaseError>;

    async fn delete_playlist(&self, id: &str) -> Result<Option<DeletedPlaylist>, DatabaseError>;

    /// Returns false when the song was already in the playlist
    async fn insert_playlist_song(&self, id: &str, playlist_id: &str, song_id: &str) -> Result<bool, DatabaseError>;

    async fn playlist_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DatabaseError>;

    /// Returns false when the song was not in the playlist
    async fn delete_playlist_song(&self, playlist_id: &str, song_id: &str) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait CollaborationRepository: Send + Sync {
    /// Insert a grant and return the owner of the playlist it points at, or
    /// `None` when the grant already existed
    async fn insert_collaboration(
        &self,
        id: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<Option<String>, DatabaseError>;

    async fn collaboration_exists(&self, user_id: &str, playlist_id: &str) -> Result<bool, DatabaseError>;

    /// Remove a grant and return the owner of its playlist, or `None` when
    /// there was no such grant
    async fn delete_collaboration(&self, user_id: &str, playlist_id: &str) -> Result<Option<String>, DatabaseError>;
}
