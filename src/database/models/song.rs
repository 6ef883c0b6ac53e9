use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub id: String,
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: Option<String>,
    pub duration: Option<i32>,
    pub inserted_at: String,
    pub updated_at: String,
}

/// Song as it appears in catalog and playlist listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct SongSummary {
    pub id: String,
    pub title: String,
    pub performer: String,
}

/// Body of POST /songs and PUT /songs/:id
#[derive(Debug, Clone, Deserialize)]
pub struct SongPayload {
    pub title: String,
    pub year: i32,
    pub performer: String,
    pub genre: Option<String>,
    pub duration: Option<i32>,
}
