use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;

use crate::services::error::ServiceError;

/// Content types accepted by POST /upload/pictures
pub const ALLOWED_IMAGE_TYPES: &[&str] = &[
    "image/apng",
    "image/avif",
    "image/bmp",
    "image/gif",
    "image/jpeg",
    "image/png",
    "image/svg+xml",
    "image/tiff",
    "image/webp",
    "image/x-icon",
];

pub fn is_allowed_image(content_type: &str) -> bool {
    ALLOWED_IMAGE_TYPES.contains(&content_type.trim().to_ascii_lowercase().as_str())
}

/// Stores uploaded pictures on local disk and hands out their public URL
#[derive(Debug, Clone)]
pub struct LocalStorageService {
    folder: PathBuf,
    public_url: String,
}

impl LocalStorageService {
    /// `public_url` is the URL prefix the folder is served under
    pub fn new(folder: impl Into<PathBuf>, public_url: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            public_url: public_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn initialize(&self) -> Result<(), ServiceError> {
        fs::create_dir_all(&self.folder).await?;
        tracing::info!(folder = %self.folder.display(), "upload folder ready");
        Ok(())
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Write `data` under a timestamped name and return its URL
    pub async fn write_file(&self, data: &[u8], filename: &str) -> Result<String, ServiceError> {
        let stored = format!("{}_-_{}", Utc::now().timestamp_millis(), sanitize_filename(filename));
        fs::write(self.folder.join(&stored), data).await?;

        tracing::info!(file = %stored, bytes = data.len(), "picture stored");
        Ok(format!("{}/{}", self.public_url, stored))
    }
}

/// Keep only the final path component and replace anything outside
/// `[A-Za-z0-9._-]`
fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "picture".to_string()
    } else {
        cleaned.to_string()
    }
}
