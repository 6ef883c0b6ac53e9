// handlers/health.rs - GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::database::DatabaseManager;
use crate::state::AppState;

/// Report database and cache reachability. 503 when either is down.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let database = match DatabaseManager::health_check(&state.pool).await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!("database health check failed: {}", e);
            e.to_string()
        }
    };
    let cache = match state.cache.ping().await {
        Ok(()) => "ok".to_string(),
        Err(e) => {
            tracing::warn!("cache health check failed: {}", e);
            e.to_string()
        }
    };

    let healthy = database == "ok" && cache == "ok";
    let (status, body) = if healthy {
        (
            StatusCode::OK,
            json!({
                "status": "success",
                "data": { "status": "ok", "timestamp": now, "database": database, "cache": cache }
            }),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            json!({
                "status": "error",
                "message": "Service degraded",
                "data": { "status": "degraded", "timestamp": now, "database": database, "cache": cache }
            }),
        )
    };

    (status, Json(body))
}
