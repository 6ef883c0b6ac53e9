use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    /// bcrypt hash
    pub password: String,
    pub fullname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub fullname: String,
}

/// Body of POST /users
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub username: String,
    pub password: String,
    pub fullname: String,
}
