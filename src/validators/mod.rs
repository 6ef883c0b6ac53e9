//! Request payloads and the rules they must satisfy before reaching a service.

use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::database::models::{SongPayload, UserPayload};

/// Checks run on a decoded request body. The error is shown to the client.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub const MIN_SONG_YEAR: i32 = 1900;

fn require(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("\"{}\" is not allowed to be empty", field));
    }
    Ok(())
}

impl Validate for SongPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.title, "title")?;
        require(&self.performer, "performer")?;

        let current_year = Utc::now().year();
        if self.year < MIN_SONG_YEAR || self.year > current_year {
            return Err(format!(
                "\"year\" must be between {} and {}",
                MIN_SONG_YEAR, current_year
            ));
        }

        if let Some(genre) = &self.genre {
            require(genre, "genre")?;
        }

        if matches!(self.duration, Some(d) if d < 0) {
            return Err("\"duration\" must be greater than or equal to 0".to_string());
        }

        Ok(())
    }
}

impl Validate for UserPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.username, "username")?;
        require(&self.password, "password")?;
        require(&self.fullname, "fullname")?;

        if self.username.len() > 50 {
            return Err("\"username\" length must be less than or equal to 50 characters long".to_string());
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err("\"username\" must not contain whitespace".to_string());
        }

        Ok(())
    }
}

/// POST /authentications
#[derive(Debug, Clone, Deserialize)]
pub struct LoginPayload {
    pub username: String,
    pub password: String,
}

impl Validate for LoginPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.username, "username")?;
        require(&self.password, "password")
    }
}

/// PUT and DELETE /authentications
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenPayload {
    pub refresh_token: String,
}

impl Validate for RefreshTokenPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.refresh_token, "refreshToken")
    }
}

/// POST /playlists
#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistPayload {
    pub name: String,
}

impl Validate for PlaylistPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.name, "name")
    }
}

/// POST and DELETE /playlists/:id/songs
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongPayload {
    pub song_id: String,
}

impl Validate for PlaylistSongPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.song_id, "songId")
    }
}

/// POST and DELETE /collaborations
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationPayload {
    pub playlist_id: String,
    pub user_id: String,
}

impl Validate for CollaborationPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.playlist_id, "playlistId")?;
        require(&self.user_id, "userId")
    }
}

/// POST /export/playlists/:playlistId
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportPayload {
    pub target_email: String,
}

impl Validate for ExportPayload {
    fn validate(&self) -> Result<(), String> {
        require(&self.target_email, "targetEmail")?;
        validate_email_format(&self.target_email)
    }
}

/// Basic shape check: one `@` with text on both sides
pub fn validate_email_format(email: &str) -> Result<(), String> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || email.chars().any(char::is_whitespace) {
        return Err("\"targetEmail\" must be a valid email".to_string());
    }
    Ok(())
}
