use std::sync::Arc;
use std::time::Duration;

use crate::cache::{self, keys, CacheStore};
use crate::database::models::{Playlist, PlaylistSummary, SongSummary};
use crate::database::new_id;
use crate::database::repositories::PlaylistRepository;
use crate::services::collaborations_service::CollaborationsService;
use crate::services::error::ServiceError;
use crate::services::songs_service::SongLookup;

/// Result of comparing a caller with a playlist's owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owned,
    Missing,
    NotOwner,
}

/// Playlists and their song memberships, with cached reads
pub struct PlaylistsService {
    repository: Arc<dyn PlaylistRepository>,
    collaborations: Arc<CollaborationsService>,
    songs: Arc<dyn SongLookup>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl PlaylistsService {
    pub fn new(
        repository: Arc<dyn PlaylistRepository>,
        collaborations: Arc<CollaborationsService>,
        songs: Arc<dyn SongLookup>,
        cache: Arc<dyn CacheStore>,
        ttl: Duration,
    ) -> Self {
        Self {
            repository,
            collaborations,
            songs,
            cache,
            ttl,
        }
    }

    pub async fn add_playlist(&self, name: &str, owner: &str) -> Result<String, ServiceError> {
        let playlist = Playlist {
            id: new_id("playlist"),
            name: name.to_string(),
            owner: owner.to_string(),
        };

        let inserted = self
            .repository
            .insert_playlist(&playlist)
            .await
            .map_err(|e| ServiceError::from_write(e, "Failed to add playlist"))?;
        if !inserted {
            return Err(ServiceError::Conflict("Failed to add playlist".to_string()));
        }

        tracing::info!(playlist = %playlist.id, owner = %owner, "playlist created");
        cache::invalidate(self.cache.as_ref(), &keys::user_playlists(owner)).await;

        Ok(playlist.id)
    }

    /// Playlists the user owns or collaborates on
    pub async fn get_playlists(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, ServiceError> {
        let key = keys::user_playlists(user_id);
        let repository = self.repository.as_ref();
        cache::read_through(self.cache.as_ref(), &key, self.ttl, || async move {
            Ok::<_, ServiceError>(repository.playlists_visible_to(user_id).await?)
        })
        .await
    }

    pub async fn get_playlist_by_id(&self, id: &str) -> Result<PlaylistSummary, ServiceError> {
        self.repository
            .find_playlist_summary(id)
            .await?
            .ok_or_else(playlist_missing)
    }

    pub async fn delete_playlist_by_id(&self, id: &str) -> Result<(), ServiceError> {
        let deleted = self
            .repository
            .delete_playlist(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Failed to delete playlist, id not found".to_string()))?;

        tracing::info!(playlist = %id, "playlist deleted");
        cache::invalidate(self.cache.as_ref(), &keys::user_playlists(&deleted.owner)).await;
        for collaborator in &deleted.collaborators {
            cache::invalidate(self.cache.as_ref(), &keys::user_playlists(collaborator)).await;
        }
        cache::invalidate(self.cache.as_ref(), &keys::playlist_songs(id)).await;

        Ok(())
    }

    /// Add a song to a playlist. Adding a song that is already there changes nothing.
    pub async fn add_playlist_song(&self, playlist_id: &str, song_id: &str) -> Result<(), ServiceError> {
        self.ensure_song(song_id).await?;

        let id = new_id("playlistsongs");
        let inserted = self
            .repository
            .insert_playlist_song(&id, playlist_id, song_id)
            .await
            .map_err(|e| ServiceError::from_write(e, "Failed to add song to playlist"))?;

        if inserted {
            tracing::info!(playlist = %playlist_id, song = %song_id, "song added to playlist");
        } else {
            tracing::debug!(playlist = %playlist_id, song = %song_id, "song already in playlist");
        }
        cache::invalidate(self.cache.as_ref(), &keys::playlist_songs(playlist_id)).await;

        Ok(())
    }

    pub async fn get_playlist_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, ServiceError> {
        let key = keys::playlist_songs(playlist_id);
        let repository = self.repository.as_ref();
        cache::read_through(self.cache.as_ref(), &key, self.ttl, || async move {
            Ok::<_, ServiceError>(repository.playlist_songs(playlist_id).await?)
        })
        .await
    }

    pub async fn delete_playlist_song(&self, playlist_id: &str, song_id: &str) -> Result<(), ServiceError> {
        self.ensure_song(song_id).await?;

        let removed = self.repository.delete_playlist_song(playlist_id, song_id).await?;
        if !removed {
            return Err(ServiceError::NotFound(
                "Failed to delete song from playlist, song is not in the playlist".to_string(),
            ));
        }

        tracing::info!(playlist = %playlist_id, song = %song_id, "song removed from playlist");
        cache::invalidate(self.cache.as_ref(), &keys::playlist_songs(playlist_id)).await;

        Ok(())
    }

    pub async fn ownership(&self, caller_id: &str, playlist_id: &str) -> Result<Ownership, ServiceError> {
        let outcome = match self.repository.find_playlist(playlist_id).await? {
            None => Ownership::Missing,
            Some(playlist) if playlist.owner == caller_id => Ownership::Owned,
            Some(_) => Ownership::NotOwner,
        };
        Ok(outcome)
    }

    pub async fn verify_playlist_owner(&self, caller_id: &str, playlist_id: &str) -> Result<(), ServiceError> {
        match self.ownership(caller_id, playlist_id).await? {
            Ownership::Owned => Ok(()),
            Ownership::Missing => Err(playlist_missing()),
            Ownership::NotOwner => Err(not_owner()),
        }
    }

    /// Owners always pass. Anyone else needs a collaboration grant, and is
    /// refused with the ownership error when they have none.
    pub async fn verify_playlist_access(&self, caller_id: &str, playlist_id: &str) -> Result<(), ServiceError> {
        match self.ownership(caller_id, playlist_id).await? {
            Ownership::Owned => Ok(()),
            Ownership::Missing => Err(playlist_missing()),
            Ownership::NotOwner => match self.collaborations.verify_collaborator(caller_id, playlist_id).await {
                Ok(()) => Ok(()),
                Err(e) => {
                    tracing::debug!(caller = %caller_id, playlist = %playlist_id, reason = %e, "playlist access denied");
                    Err(not_owner())
                }
            },
        }
    }

    async fn ensure_song(&self, song_id: &str) -> Result<(), ServiceError> {
        match self.songs.get_song_by_id(song_id).await {
            Ok(_) => Ok(()),
            Err(ServiceError::NotFound(_)) => Err(ServiceError::InvalidReference("Song not found".to_string())),
            Err(e) => Err(e),
        }
    }
}

fn playlist_missing() -> ServiceError {
    ServiceError::NotFound("Playlist not found".to_string())
}

fn not_owner() -> ServiceError {
    ServiceError::Forbidden("You are not entitled to access this resource".to_string())
}
