//! HTTP server initialization and runtime setup.
//!
//! Handles store selection, service wiring, and the Axum server lifecycle.

use crate::application::services::ShortenerService;
use crate::config::Config;
use crate::domain::repositories::StoreConnector;
use crate::infrastructure::store::{MemoryStore, RedisConnector};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Redis store (or in-memory fallback)
/// - Shortener service with the configured quota and denylist
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - `listen_addr` is not a socket address
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let connector = connect_store(&config).await;

    let shortener = Arc::new(ShortenerService::new(
        connector,
        config.shortener_settings(),
    ));
    let state = AppState::new(shortener, config.behind_proxy);

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Server stopped");

    Ok(())
}

/// Connects to Redis when configured, otherwise falls back to process memory.
///
/// A failed Redis connection is not fatal: the service keeps running on the
/// in-memory store, which loses links and quotas on restart.
async fn connect_store(config: &Config) -> Arc<dyn StoreConnector> {
    if let Some(redis_url) = &config.redis_url {
        match RedisConnector::connect(redis_url).await {
            Ok(redis) => {
                tracing::info!("Store enabled (Redis)");
                return Arc::new(redis);
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using in-memory store.", e);
            }
        }
    } else {
        tracing::info!("Redis not configured, using in-memory store");
    }

    Arc::new(MemoryStore::new())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
