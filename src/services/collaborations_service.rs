use std::sync::Arc;

use crate::cache::{self, keys, CacheStore};
use crate::database::new_id;
use crate::database::repositories::CollaborationRepository;
use crate::services::error::ServiceError;

/// Records which users may act on playlists they do not own
pub struct CollaborationsService {
    repository: Arc<dyn CollaborationRepository>,
    cache: Arc<dyn CacheStore>,
}

impl CollaborationsService {
    pub fn new(repository: Arc<dyn CollaborationRepository>, cache: Arc<dyn CacheStore>) -> Self {
        Self { repository, cache }
    }

    /// Grant `user_id` access to `playlist_id` and return the grant id
    pub async fn add_collaboration(&self, user_id: &str, playlist_id: &str) -> Result<String, ServiceError> {
        let id = new_id("collab");

        let owner = self
            .repository
            .insert_collaboration(&id, user_id, playlist_id)
            .await
            .map_err(|e| ServiceError::from_write(e, "Failed to add collaboration"))?
            .ok_or_else(|| ServiceError::Conflict("Failed to add collaboration".to_string()))?;

        tracing::info!(collaboration = %id, user = %user_id, playlist = %playlist_id, "collaboration added");
        self.invalidate(&owner, user_id, playlist_id).await;

        Ok(id)
    }

    /// Succeeds only when a grant for (`user_id`, `playlist_id`) exists
    pub async fn verify_collaborator(&self, user_id: &str, playlist_id: &str) -> Result<(), ServiceError> {
        if self.repository.collaboration_exists(user_id, playlist_id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound("Collaboration could not be verified".to_string()))
        }
    }

    pub async fn delete_collaboration(&self, user_id: &str, playlist_id: &str) -> Result<(), ServiceError> {
        let owner = self
            .repository
            .delete_collaboration(user_id, playlist_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Failed to delete collaboration, it does not exist".to_string()))?;

        tracing::info!(user = %user_id, playlist = %playlist_id, "collaboration removed");
        self.invalidate(&owner, user_id, playlist_id).await;

        Ok(())
    }

    // A grant changes what both the owner and the collaborator see
    async fn invalidate(&self, owner: &str, collaborator: &str, playlist_id: &str) {
        cache::invalidate(self.cache.as_ref(), &keys::user_playlists(owner)).await;
        cache::invalidate(self.cache.as_ref(), &keys::user_playlists(collaborator)).await;
        cache::invalidate(self.cache.as_ref(), &keys::playlist_songs(playlist_id)).await;
    }
}
