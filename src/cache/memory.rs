use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::{CacheError, CacheStore};

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Writes between sweeps of expired entries
const SWEEP_INTERVAL: usize = 64;

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, Entry>,
    writes: usize,
}

impl Entries {
    fn sweep(&mut self, now: Instant) {
        self.map.retain(|_, entry| !entry.is_expired(now));
        self.writes = 0;
    }
}

/// In-process cache for local development and tests. Expired entries are
/// dropped when touched, and swept from the whole map every
/// `SWEEP_INTERVAL` writes.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<Entries>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries.map.values().filter(|e| !e.is_expired(now)).count()
    }

    /// Number of entries held, expired or not
    pub async fn stored(&self) -> usize {
        self.entries.lock().await.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        entries.writes += 1;
        if entries.writes >= SWEEP_INTERVAL {
            entries.sweep(now);
        }

        let entry = Entry {
            value: value.to_string(),
            expires_at: now + ttl,
        };
        entries.map.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.map.get(key) {
            Some(entry) if !entry.is_expired(now) => Ok(entry.value.clone()),
            Some(_) => {
                entries.map.remove(key);
                Err(CacheError::Miss)
            }
            None => Err(CacheError::Miss),
        }
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        match entries.map.get_mut(key) {
            Some(entry) if !entry.is_expired(now) => {
                entry.expires_at = now + ttl;
                Ok(())
            }
            Some(_) => {
                entries.map.remove(key);
                Err(CacheError::Miss)
            }
            None => Err(CacheError::Miss),
        }
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        self.entries.lock().await.map.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get() {
        let cache = MemoryCache::new();
        cache.set("playlists:user-1", "[]", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get("playlists:user-1").await.unwrap(), "[]");
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn expired_and_unknown_keys_both_miss() {
        let cache = MemoryCache::new();
        cache.set("short", "v", Duration::from_millis(20)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;

        assert!(matches!(cache.get("short").await, Err(CacheError::Miss)));
        assert!(matches!(cache.get("never-set").await, Err(CacheError::Miss)));
    }

    #[tokio::test]
    async fn expire_extends_lifetime_of_existing_key_only() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::from_millis(50)).await.unwrap();
        cache.expire("k", Duration::from_secs(60)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(cache.get("k").await.unwrap(), "v");

        assert!(matches!(
            cache.expire("missing", Duration::from_secs(60)).await,
            Err(CacheError::Miss)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_expired_entries_are_swept_on_write() {
        let cache = MemoryCache::new();
        for user in 0..1000 {
            let key = format!("playlists:user-{}", user);
            cache.set(&key, "[]", Duration::from_secs(1)).await.unwrap();
        }

        tokio::time::advance(Duration::from_secs(3600)).await;
        for user in 0..SWEEP_INTERVAL {
            let key = format!("songs:playlist-{}", user);
            cache.set(&key, "[]", Duration::from_secs(60)).await.unwrap();
        }

        assert_eq!(cache.len().await, SWEEP_INTERVAL);
        assert!(cache.stored().await <= SWEEP_INTERVAL);
    }

    #[tokio::test]
    async fn del_is_idempotent() {
        let cache = MemoryCache::new();
        cache.set("k", "v", Duration::from_secs(60)).await.unwrap();
        cache.del("k").await.unwrap();
        cache.del("k").await.unwrap();
        assert!(cache.is_empty().await);
    }
}
