use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::auth::TokenManager;
use crate::cache::CacheStore;
use crate::config::AppConfig;
use crate::database::repositories::{PgCollaborationRepository, PgPlaylistRepository};
use crate::services::{
    AuthenticationsService, CollaborationsService, ExportProducer, LocalStorageService, PlaylistsService,
    SongsService, UsersService,
};

/// Shared handles injected into every handler
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub cache: Arc<dyn CacheStore>,
    pub tokens: Arc<TokenManager>,
    pub users: Arc<UsersService>,
    pub authentications: Arc<AuthenticationsService>,
    pub songs: Arc<SongsService>,
    pub playlists: Arc<PlaylistsService>,
    pub collaborations: Arc<CollaborationsService>,
    pub producer: Arc<dyn ExportProducer>,
    pub storage: Arc<LocalStorageService>,
    pub export_queue: String,
}

impl AppState {
    /// Wire every service against one pool and one cache
    pub fn new(
        config: &AppConfig,
        pool: PgPool,
        cache: Arc<dyn CacheStore>,
        producer: Arc<dyn ExportProducer>,
    ) -> Self {
        let ttl = Duration::from_secs(config.cache.ttl_secs);
        let songs = Arc::new(SongsService::new(pool.clone()));
        let collaborations = Arc::new(CollaborationsService::new(
            Arc::new(PgCollaborationRepository::new(pool.clone())),
            cache.clone(),
        ));
        let playlists = Arc::new(PlaylistsService::new(
            Arc::new(PgPlaylistRepository::new(pool.clone())),
            collaborations.clone(),
            songs.clone(),
            cache.clone(),
            ttl,
        ));
        let storage = LocalStorageService::new(
            &config.uploads.dir,
            format!("{}/upload/pictures", config.public_base_url()),
        );

        Self {
            tokens: Arc::new(TokenManager::new(&config.security)),
            users: Arc::new(UsersService::new(pool.clone())),
            authentications: Arc::new(AuthenticationsService::new(pool.clone())),
            songs,
            playlists,
            collaborations,
            producer,
            storage: Arc::new(storage),
            export_queue: config.queue.export_queue.clone(),
            pool,
            cache,
        }
    }
}
