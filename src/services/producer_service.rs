use async_trait::async_trait;
use deadpool_redis::redis::AsyncCommands;
use deadpool_redis::Pool;
use serde::Serialize;

use crate::services::error::ServiceError;

/// Body of an export request as consumers receive it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMessage {
    pub playlist_id: String,
    pub target_email: String,
}

/// Hands work off to background consumers
#[async_trait]
pub trait ExportProducer: Send + Sync {
    async fn send_message(&self, queue: &str, payload: &str) -> Result<(), ServiceError>;
}

/// Publishes onto a Redis list. Consumers pop from the other end.
pub struct RedisQueueProducer {
    pool: Pool,
}

impl RedisQueueProducer {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExportProducer for RedisQueueProducer {
    async fn send_message(&self, queue: &str, payload: &str) -> Result<(), ServiceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| ServiceError::Queue(e.to_string()))?;

        let depth: i64 = conn
            .lpush(queue, payload)
            .await
            .map_err(|e| ServiceError::Queue(e.to_string()))?;

        tracing::info!(queue = %queue, depth, "export request queued");
        Ok(())
    }
}

/// Serialize and publish an export request
pub async fn publish_export(
    producer: &dyn ExportProducer,
    queue: &str,
    message: &ExportMessage,
) -> Result<(), ServiceError> {
    let payload = serde_json::to_string(message).map_err(|e| ServiceError::Queue(e.to_string()))?;
    producer.send_message(queue, &payload).await
}
