use sqlx::PgPool;

use crate::database::models::{User, UserPayload, UserProfile};
use crate::database::new_id;
use crate::services::error::ServiceError;

const WRONG_CREDENTIALS: &str = "The credentials you provided are wrong";

pub struct UsersService {
    pool: PgPool,
}

impl UsersService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a user and return the new id. Usernames are unique.
    pub async fn add_user(&self, payload: &UserPayload) -> Result<String, ServiceError> {
        self.verify_new_username(&payload.username).await?;

        let id = new_id("user");
        let hashed = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST)?;

        sqlx::query("INSERT INTO users (id, username, password, fullname) VALUES ($1, $2, $3, $4)")
            .bind(&id)
            .bind(&payload.username)
            .bind(&hashed)
            .bind(&payload.fullname)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::from_write(e.into(), "Failed to add user, username is already taken"))?;

        tracing::info!(user = %id, username = %payload.username, "user registered");
        Ok(id)
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<UserProfile, ServiceError> {
        sqlx::query_as::<_, UserProfile>("SELECT id, username, fullname FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))
    }

    /// Check a username/password pair and return the user's id
    pub async fn verify_user_credential(&self, username: &str, password: &str) -> Result<String, ServiceError> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, password, fullname FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized(WRONG_CREDENTIALS.to_string()))?;

        if !bcrypt::verify(password, &user.password)? {
            tracing::debug!(username = %username, "password mismatch");
            return Err(ServiceError::Unauthorized(WRONG_CREDENTIALS.to_string()));
        }

        Ok(user.id)
    }

    async fn verify_new_username(&self, username: &str) -> Result<(), ServiceError> {
        let existing = sqlx::query("SELECT id FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        if existing.is_some() {
            return Err(ServiceError::Conflict(
                "Failed to add user, username is already taken".to_string(),
            ));
        }
        Ok(())
    }
}
