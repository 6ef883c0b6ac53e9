use sqlx::PgPool;

use crate::services::error::ServiceError;

/// Registry of refresh tokens that have not been revoked
pub struct AuthenticationsService {
    pool: PgPool,
}

impl AuthenticationsService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add_refresh_token(&self, token: &str) -> Result<(), ServiceError> {
        sqlx::query("INSERT INTO authentications (token) VALUES ($1)")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn verify_refresh_token(&self, token: &str) -> Result<(), ServiceError> {
        let row = sqlx::query("SELECT token FROM authentications WHERE token = $1")
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(_) => Ok(()),
            None => Err(invalid_refresh_token()),
        }
    }

    pub async fn delete_refresh_token(&self, token: &str) -> Result<(), ServiceError> {
        sqlx::query("DELETE FROM authentications WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        tracing::debug!("refresh token revoked");
        Ok(())
    }
}

pub fn invalid_refresh_token() -> ServiceError {
    ServiceError::Validation("Refresh token not valid".to_string())
}
