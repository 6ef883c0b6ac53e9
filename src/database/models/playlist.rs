use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the `playlists` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub owner: String,
}

/// Playlist as listed to users: owner shown by username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
    pub username: String,
}
