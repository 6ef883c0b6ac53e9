#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use openmusic_api::cache::{CacheError, CacheStore, MemoryCache, DEFAULT_TTL};
use openmusic_api::database::models::{Playlist, PlaylistSummary, Song, SongSummary};
use openmusic_api::database::repositories::{CollaborationRepository, DeletedPlaylist, PlaylistRepository};
use openmusic_api::database::DatabaseError;
use openmusic_api::services::{CollaborationsService, ExportProducer, PlaylistsService, ServiceError, SongLookup};

/// Rows shared by the in-memory playlist and collaboration repositories
#[derive(Default)]
pub struct Tables {
    pub usernames: HashMap<String, String>,
    pub playlists: Vec<Playlist>,
    pub collaborations: Vec<(String, String, String)>,
    pub memberships: Vec<(String, String, String)>,
}

#[derive(Default)]
pub struct MemoryStore {
    pub tables: Mutex<Tables>,
    pub visible_queries: AtomicUsize,
    pub song_queries: AtomicUsize,
}

impl MemoryStore {
    pub fn add_user(&self, id: &str, username: &str) {
        self.tables
            .lock()
            .unwrap()
            .usernames
            .insert(id.to_string(), username.to_string());
    }

    pub fn add_playlist(&self, id: &str, name: &str, owner: &str) {
        self.tables.lock().unwrap().playlists.push(Playlist {
            id: id.to_string(),
            name: name.to_string(),
            owner: owner.to_string(),
        });
    }

    pub fn membership_count(&self, playlist_id: &str) -> usize {
        self.tables
            .lock()
            .unwrap()
            .memberships
            .iter()
            .filter(|(_, p, _)| p == playlist_id)
            .count()
    }

    pub fn visible_queries(&self) -> usize {
        self.visible_queries.load(Ordering::SeqCst)
    }

    pub fn song_queries(&self) -> usize {
        self.song_queries.load(Ordering::SeqCst)
    }

    fn summary(tables: &Tables, playlist: &Playlist) -> PlaylistSummary {
        PlaylistSummary {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            username: tables.usernames.get(&playlist.owner).cloned().unwrap_or_default(),
        }
    }
}

pub struct MemoryPlaylists(pub Arc<MemoryStore>);

#[async_trait]
impl PlaylistRepository for MemoryPlaylists {
    async fn insert_playlist(&self, playlist: &Playlist) -> Result<bool, DatabaseError> {
        let mut tables = self.0.tables.lock().unwrap();
        if tables.playlists.iter().any(|p| p.id == playlist.id) {
            return Ok(false);
        }
        tables.playlists.push(playlist.clone());
        Ok(true)
    }

    async fn find_playlist(&self, id: &str) -> Result<Option<Playlist>, DatabaseError> {
        let tables = self.0.tables.lock().unwrap();
        Ok(tables.playlists.iter().find(|p| p.id == id).cloned())
    }

    async fn find_playlist_summary(&self, id: &str) -> Result<Option<PlaylistSummary>, DatabaseError> {
        let tables = self.0.tables.lock().unwrap();
        Ok(tables
            .playlists
            .iter()
            .find(|p| p.id == id)
            .map(|p| MemoryStore::summary(&tables, p)))
    }

    async fn playlists_visible_to(&self, user_id: &str) -> Result<Vec<PlaylistSummary>, DatabaseError> {
        self.0.visible_queries.fetch_add(1, Ordering::SeqCst);
        let tables = self.0.tables.lock().unwrap();
        let mut visible: Vec<PlaylistSummary> = tables
            .playlists
            .iter()
            .filter(|p| {
                p.owner == user_id
                    || tables
                        .collaborations
                        .iter()
                        .any(|(_, u, pl)| u == user_id && pl == &p.id)
            })
            .map(|p| MemoryStore::summary(&tables, p))
            .collect();
        visible.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(visible)
    }

    async fn delete_playlist(&self, id: &str) -> Result<Option<DeletedPlaylist>, DatabaseError> {
        let mut tables = self.0.tables.lock().unwrap();
        let Some(index) = tables.playlists.iter().position(|p| p.id == id) else {
            return Ok(None);
        };
        let playlist = tables.playlists.remove(index);
        let collaborators = tables
            .collaborations
            .iter()
            .filter(|(_, _, pl)| pl == id)
            .map(|(_, u, _)| u.clone())
            .collect();
        tables.collaborations.retain(|(_, _, pl)| pl != id);
        tables.memberships.retain(|(_, pl, _)| pl != id);
        Ok(Some(DeletedPlaylist {
            owner: playlist.owner,
            collaborators,
        }))
    }

    async fn insert_playlist_song(&self, id: &str, playlist_id: &str, song_id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.0.tables.lock().unwrap();
        if tables
            .memberships
            .iter()
            .any(|(_, p, s)| p == playlist_id && s == song_id)
        {
            return Ok(false);
        }
        tables
            .memberships
            .push((id.to_string(), playlist_id.to_string(), song_id.to_string()));
        Ok(true)
    }

    async fn playlist_songs(&self, playlist_id: &str) -> Result<Vec<SongSummary>, DatabaseError> {
        self.0.song_queries.fetch_add(1, Ordering::SeqCst);
        let tables = self.0.tables.lock().unwrap();
        Ok(tables
            .memberships
            .iter()
            .filter(|(_, p, _)| p == playlist_id)
            .map(|(_, _, s)| SongSummary {
                id: s.clone(),
                title: format!("Title of {}", s),
                performer: format!("Performer of {}", s),
            })
            .collect())
    }

    async fn delete_playlist_song(&self, playlist_id: &str, song_id: &str) -> Result<bool, DatabaseError> {
        let mut tables = self.0.tables.lock().unwrap();
        let before = tables.memberships.len();
        tables
            .memberships
            .retain(|(_, p, s)| !(p == playlist_id && s == song_id));
        Ok(tables.memberships.len() != before)
    }
}

pub struct MemoryCollaborations(pub Arc<MemoryStore>);

#[async_trait]
impl CollaborationRepository for MemoryCollaborations {
    async fn insert_collaboration(
        &self,
        id: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let mut tables = self.0.tables.lock().unwrap();
        let Some(owner) = tables
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .map(|p| p.owner.clone())
        else {
            return Err(DatabaseError::QueryError("playlist does not exist".to_string()));
        };
        if tables
            .collaborations
            .iter()
            .any(|(_, u, p)| u == user_id && p == playlist_id)
        {
            return Ok(None);
        }
        tables
            .collaborations
            .push((id.to_string(), user_id.to_string(), playlist_id.to_string()));
        Ok(Some(owner))
    }

    async fn collaboration_exists(&self, user_id: &str, playlist_id: &str) -> Result<bool, DatabaseError> {
        let tables = self.0.tables.lock().unwrap();
        Ok(tables
            .collaborations
            .iter()
            .any(|(_, u, p)| u == user_id && p == playlist_id))
    }

    async fn delete_collaboration(&self, user_id: &str, playlist_id: &str) -> Result<Option<String>, DatabaseError> {
        let mut tables = self.0.tables.lock().unwrap();
        let before = tables.collaborations.len();
        tables
            .collaborations
            .retain(|(_, u, p)| !(u == user_id && p == playlist_id));
        if tables.collaborations.len() == before {
            return Ok(None);
        }
        Ok(tables
            .playlists
            .iter()
            .find(|p| p.id == playlist_id)
            .map(|p| p.owner.clone()))
    }
}

/// Song catalog keyed by id
#[derive(Default)]
pub struct MemorySongs {
    songs: Mutex<HashMap<String, Song>>,
}

impl MemorySongs {
    pub fn with(ids: &[&str]) -> Self {
        let songs = MemorySongs::default();
        for id in ids {
            songs.songs.lock().unwrap().insert(id.to_string(), song(id));
        }
        songs
    }
}

pub fn song(id: &str) -> Song {
    Song {
        id: id.to_string(),
        title: format!("Title of {}", id),
        year: 2008,
        performer: format!("Performer of {}", id),
        genre: None,
        duration: None,
        inserted_at: "2024-01-01T00:00:00.000Z".to_string(),
        updated_at: "2024-01-01T00:00:00.000Z".to_string(),
    }
}

#[async_trait]
impl SongLookup for MemorySongs {
    async fn get_song_by_id(&self, id: &str) -> Result<Song, ServiceError> {
        self.songs
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound("Song not found".to_string()))
    }
}

/// MemoryCache that records every key it is asked to delete
#[derive(Default)]
pub struct CountingCache {
    inner: MemoryCache,
    deleted: Mutex<Vec<String>>,
}

impl CountingCache {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.deleted.lock().unwrap().clear();
    }
}

#[async_trait]
impl CacheStore for CountingCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        self.inner.set(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        self.inner.get(key).await
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        self.inner.expire(key, ttl).await
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.deleted.lock().unwrap().push(key.to_string());
        self.inner.del(key).await
    }
}

/// Cache whose backend is always down
pub struct BrokenCache;

#[async_trait]
impl CacheStore for BrokenCache {
    async fn set(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn get(&self, _key: &str) -> Result<String, CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn expire(&self, _key: &str, _ttl: Duration) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }

    async fn del(&self, _key: &str) -> Result<(), CacheError> {
        Err(CacheError::Backend("connection refused".to_string()))
    }
}

/// Producer that keeps published messages in memory
#[derive(Default)]
pub struct RecordingProducer {
    pub sent: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl ExportProducer for RecordingProducer {
    async fn send_message(&self, queue: &str, payload: &str) -> Result<(), ServiceError> {
        self.sent
            .lock()
            .unwrap()
            .push((queue.to_string(), payload.to_string()));
        Ok(())
    }
}

/// Registries wired against in-memory tables
pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub cache: Arc<CountingCache>,
    pub collaborations: Arc<CollaborationsService>,
    pub playlists: PlaylistsService,
}

impl Fixture {
    pub fn new(song_ids: &[&str]) -> Self {
        Self::with_cache(song_ids, Arc::new(CountingCache::default()))
    }

    pub fn with_cache(song_ids: &[&str], cache: Arc<CountingCache>) -> Self {
        let store = Arc::new(MemoryStore::default());
        let collaborations = Arc::new(CollaborationsService::new(
            Arc::new(MemoryCollaborations(store.clone())),
            cache.clone(),
        ));
        let playlists = PlaylistsService::new(
            Arc::new(MemoryPlaylists(store.clone())),
            collaborations.clone(),
            Arc::new(MemorySongs::with(song_ids)),
            cache.clone(),
            DEFAULT_TTL,
        );

        Self {
            store,
            cache,
            collaborations,
            playlists,
        }
    }

    /// `playlist-abc` owned by `user-1`, with `user-2` and `user-3` registered
    pub fn scenario(song_ids: &[&str]) -> Self {
        let fixture = Self::new(song_ids);
        fixture.store.add_user("user-1", "owner");
        fixture.store.add_user("user-2", "guest");
        fixture.store.add_user("user-3", "friend");
        fixture.store.add_playlist("playlist-abc", "Road trip", "user-1");
        fixture
    }
}
