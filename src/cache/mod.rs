//! Lookaside cache used by the playlist and collaboration registries.
//!
//! The cache is never authoritative: every entry can be rebuilt from
//! PostgreSQL, so backend failures degrade to a miss instead of an error.

pub mod memory;
pub mod redis;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use memory::MemoryCache;
pub use redis::RedisCache;

/// Sliding lifetime applied on every write and every successful read
pub const DEFAULT_TTL: Duration = Duration::from_secs(1800);

#[derive(Debug, Error)]
pub enum CacheError {
    /// Key absent or expired. The two cases are not distinguished.
    #[error("Cache entry not found")]
    Miss,

    #[error("Cache backend error: {0}")]
    Backend(String),
}

/// Key/value store with per-key TTL
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Store `value` under `key` and reset its lifetime to `ttl`
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    async fn get(&self, key: &str) -> Result<String, CacheError>;

    /// Reset the lifetime of an existing key. Returns `Miss` when the key is gone.
    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a key. Removing an absent key succeeds.
    async fn del(&self, key: &str) -> Result<(), CacheError>;

    /// Liveness check used by the health endpoint
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}

/// Cache key namespaces
pub mod keys {
    /// Playlists visible to a user (owned or collaborating)
    pub fn user_playlists(user_id: &str) -> String {
        format!("playlists:{}", user_id)
    }

    /// Song list of a single playlist
    pub fn playlist_songs(playlist_id: &str) -> String {
        format!("playlist:{}", playlist_id)
    }
}

/// Cache-aside read: serve `key` from the cache when present (extending its
/// lifetime), otherwise run `loader`, store its result and return it.
///
/// Loader errors are returned as-is. Cache failures never are.
pub async fn read_through<T, E, F, Fut>(
    cache: &dyn CacheStore,
    key: &str,
    ttl: Duration,
    loader: F,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    match cache.get(key).await {
        Ok(snapshot) => {
            if let Err(e) = cache.expire(key, ttl).await {
                tracing::debug!(key = %key, error = %e, "failed to extend cache entry");
            }
            match serde_json::from_str::<T>(&snapshot) {
                Ok(value) => {
                    tracing::debug!(key = %key, "cache hit");
                    return Ok(value);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "discarding unreadable cache entry");
                    invalidate(cache, key).await;
                }
            }
        }
        Err(CacheError::Miss) => {
            tracing::debug!(key = %key, "cache miss");
        }
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "cache unavailable, reading from database");
        }
    }

    let value = loader().await?;

    match serde_json::to_string(&value) {
        Ok(snapshot) => {
            if let Err(e) = cache.set(key, &snapshot, ttl).await {
                tracing::warn!(key = %key, error = %e, "failed to populate cache");
            }
        }
        Err(e) => tracing::error!(key = %key, error = %e, "failed to serialize cache snapshot"),
    }

    Ok(value)
}

/// Drop `key` from the cache, logging instead of failing
pub async fn invalidate(cache: &dyn CacheStore, key: &str) {
    match cache.del(key).await {
        Ok(()) => tracing::debug!(key = %key, "cache invalidated"),
        Err(e) => tracing::warn!(key = %key, error = %e, "failed to invalidate cache entry"),
    }
}
