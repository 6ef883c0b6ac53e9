use async_trait::async_trait;
use sqlx::PgPool;

use super::CollaborationRepository;
use crate::database::manager::DatabaseError;

pub struct PgCollaborationRepository {
    pool: PgPool,
}

impl PgCollaborationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CollaborationRepository for PgCollaborationRepository {
    async fn insert_collaboration(
        &self,
        id: &str,
        user_id: &str,
        playlist_id: &str,
    ) -> Result<Option<String>, DatabaseError> {
        let owner: Option<(String,)> = sqlx::query_as(
            "WITH inserted AS (
                 INSERT INTO collaborations (id, playlist_id, user_id) VALUES ($1, $2, $3)
                 ON CONFLICT DO NOTHING
                 RETURNING playlist_id
             )
             SELECT playlists.owner
             FROM inserted
             JOIN playlists ON playlists.id = inserted.playlist_id",
        )
        .bind(id)
        .bind(playlist_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner.map(|(owner,)| owner))
    }

    async fn collaboration_exists(&self, user_id: &str, playlist_id: &str) -> Result<bool, DatabaseError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM collaborations WHERE user_id = $1 AND playlist_id = $2",
        )
        .bind(user_id)
        .bind(playlist_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    async fn delete_collaboration(&self, user_id: &str, playlist_id: &str) -> Result<Option<String>, DatabaseError> {
        let owner: Option<(String,)> = sqlx::query_as(
            "WITH removed AS (
                 DELETE FROM collaborations WHERE user_id = $1 AND playlist_id = $2
                 RETURNING playlist_id
             )
             SELECT playlists.owner
             FROM removed
             JOIN playlists ON playlists.id = removed.playlist_id",
        )
        .bind(user_id)
        .bind(playlist_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner.map(|(owner,)| owner))
    }
}
