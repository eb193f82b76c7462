//! Memebot - a chat-triggered meme dispenser
//!
//! Caches validated memes from trending categories in a shared pool
//! store and serves one previously-unseen item per request.

mod api;
mod bot;
mod config;
mod error;
mod models;
mod pool;
mod source;
mod store;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::{create_router, AppState};
use bot::{ChatClient, SlackWebClient};
use config::Config;
use pool::{HttpProbe, ItemValidator, PoolManager};
use source::RedditSource;
use store::{MemoryStore, PoolStore, RedisStore};
use tasks::spawn_refresh_task;

/// Main entry point for the meme bot.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the shared HTTP client with a bounded timeout
/// 4. Wire the pool store (Redis, or in-memory in local mode)
/// 5. Populate the pool if the store key is absent (cold start)
/// 6. Start the background pool refresh task
/// 7. Create Axum router with all endpoints
/// 8. Start HTTP server on configured port
/// 9. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "memebot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting memebot");

    // Load configuration from environment variables
    let config = Config::from_env();
    info!(
        "Configuration loaded: categories={:?}, fetch_limit={}, max_image_bytes={}, port={}",
        config.categories, config.fetch_limit, config.max_image_bytes, config.server_port
    );

    // Shared HTTP client; every outbound call carries the same bounded
    // timeout so a dead host cannot stall a populate pass.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout))
        .build()
        .expect("failed to build HTTP client");

    // Wire the pool store
    let store: Arc<dyn PoolStore> = match &config.redis_url {
        Some(url) => match RedisStore::new(url) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %e, "invalid REDIS_URL, exiting");
                return;
            }
        },
        None => {
            warn!("REDIS_URL not set, using in-memory store (local mode)");
            Arc::new(MemoryStore::new())
        }
    };

    let validator = ItemValidator::new(
        Arc::new(HttpProbe::new(http.clone())),
        config.max_image_bytes,
    );
    let manager = Arc::new(PoolManager::new(
        Arc::new(RedditSource::new(http.clone())),
        validator,
        store.clone(),
        &config,
    ));

    // Cold start: populate only when the store key is absent, so restarts
    // against a warm store don't throw away the remaining pool.
    match store.get(&config.pool_key).await {
        Ok(None) => {
            info!("no cached pool found, running initial populate");
            if let Err(e) = manager.populate().await {
                warn!(error = %e, "initial populate failed, first dispense will retry");
            }
        }
        Ok(Some(_)) => info!("memes have previously been cached"),
        Err(e) => warn!(error = %e, "pool store unreachable at startup"),
    }

    // Start the background refresh task
    let refresh_handle = spawn_refresh_task(manager.clone(), config.refresh_interval);
    info!("Background refresh task started");

    // Create router with all endpoints
    let chat: Arc<dyn ChatClient> = Arc::new(SlackWebClient::new(http, config.bot_token.clone()));
    let state = AppState::new(manager, chat, config.bot_id.clone());
    let app = create_router(state);

    // Bind to configured port
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    info!("Server listening on http://{}", addr);

    // Start server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(refresh_handle))
        .await
        .unwrap();

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the refresh task and allows graceful shutdown.
async fn shutdown_signal(refresh_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    // Abort the refresh task
    refresh_handle.abort();
    warn!("Refresh task aborted");
}
