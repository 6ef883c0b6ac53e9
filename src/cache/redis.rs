use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Connection, Pool};

use super::{CacheError, CacheStore};

/// Redis-backed cache store
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Build a pool for `url` and wrap it. No connection is opened until first use.
    pub fn connect(url: &str) -> Result<Self, CacheError> {
        let pool = deadpool_redis::Config::from_url(url)
            .create_pool(Some(deadpool_redis::Runtime::Tokio1))
            .map_err(|e| CacheError::Backend(e.to_string()))?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    async fn connection(&self) -> Result<Connection, CacheError> {
        self.pool.get().await.map_err(|e| CacheError::Backend(e.to_string()))
    }
}

fn backend(e: deadpool_redis::redis::RedisError) -> CacheError {
    CacheError::Backend(e.to_string())
}

/// Whole seconds for SET EX and EXPIRE. Redis rejects 0 and treats negative
/// values as an immediate delete, so the result stays within 1..=i64::MAX.
fn ttl_secs(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX).max(1)
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.set_ex::<_, _, ()>(key, value, ttl_secs(ttl).unsigned_abs())
            .await
            .map_err(backend)
    }

    async fn get(&self, key: &str) -> Result<String, CacheError> {
        let mut conn = self.connection().await?;
        let reply: Option<String> = conn.get(key).await.map_err(backend)?;
        reply.ok_or(CacheError::Miss)
    }

    async fn expire(&self, key: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let updated: i64 = conn.expire(key, ttl_secs(ttl)).await.map_err(backend)?;
        if updated == 0 {
            return Err(CacheError::Miss);
        }
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        conn.del::<_, i64>(key).await.map_err(backend)?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.connection().await?;
        let _pong: String = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(backend)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ttl_is_clamped_to_what_redis_accepts() {
        assert_eq!(ttl_secs(Duration::from_secs(1800)), 1800);
        assert_eq!(ttl_secs(Duration::from_millis(300)), 1);
        assert_eq!(ttl_secs(Duration::ZERO), 1);
        assert_eq!(ttl_secs(Duration::from_secs(u64::MAX)), i64::MAX);
    }
}
