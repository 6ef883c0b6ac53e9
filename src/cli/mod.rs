use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use crate::cache::{CacheStore, MemoryCache, RedisCache};
use crate::config::{AppConfig, CacheBackendKind};
use crate::database::DatabaseManager;
use crate::services::{ExportProducer, RedisQueueProducer};
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "openmusic-api")]
#[command(about = "OpenMusic REST API server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    #[command(about = "Apply migrations and start the HTTP server (default)")]
    Serve,

    #[command(about = "Apply database migrations and exit")]
    Migrate,
}

pub async fn run(cli: Cli, config: &AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => {
            let pool = DatabaseManager::connect(&config.database).await?;
            DatabaseManager::migrate(&pool).await?;
            DatabaseManager::close(&pool).await;
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig) -> anyhow::Result<()> {
    info!("Starting OpenMusic API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to PostgreSQL")?;
    DatabaseManager::migrate(&pool).await?;

    // The export queue always lives in Redis, even when the cache does not
    let redis = RedisCache::connect(&config.cache.redis_url).context("failed to create Redis pool")?;
    let producer: Arc<dyn ExportProducer> = Arc::new(RedisQueueProducer::new(redis.pool().clone()));
    let cache: Arc<dyn CacheStore> = match config.cache.backend {
        CacheBackendKind::Redis => {
            info!("Using Redis cache at {}", config.cache.redis_url);
            Arc::new(redis)
        }
        CacheBackendKind::Memory => {
            info!("Using in-process cache");
            Arc::new(MemoryCache::new())
        }
    };

    let state = AppState::new(config, pool.clone(), cache, producer);
    state.storage.initialize().await?;

    let app = crate::build_router(state, config);

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("OpenMusic API listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    DatabaseManager::close(&pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
