//! SkyBlock Auctions server binary
//!
//! Wires configuration, the shared cache, the upstream client and the HTTP
//! router together, and persists the cache on shutdown.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use skyblock_auctions::{
    create_router, spawn_persist_task, AppState, AuctionService, Config, HypixelClient,
    SharedCache,
};

/// Main entry point for the auction server.
///
/// # Startup Sequence
/// 1. Read `.env` and initialize the tracing subscriber
/// 2. Load configuration from environment variables
/// 3. Load the cache snapshot (a corrupted file aborts startup)
/// 4. Start the periodic persist task
/// 5. Serve the router until SIGINT/SIGTERM
/// 6. Drain connections and persist the cache one final time; a second signal
///    exits immediately
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skyblock_auctions=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SkyBlock auction server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, cache_file={}, persist_interval={}s, upstream={}",
        config.server_port,
        config.cache_file.display(),
        config.persist_interval,
        config.upstream_base_url
    );
    if config.api_key.is_empty() {
        warn!("API_KEY is not set, upstream requests are sent without a key");
    }

    let cache = SharedCache::new(&config.cache_file);
    let entries = cache
        .load()
        .await
        .with_context(|| format!("failed to load cache from {}", config.cache_file.display()))?;
    info!("Cache ready with {} entries", entries);

    let client = HypixelClient::new(&config.upstream_base_url, config.upstream_timeout())
        .context("failed to build upstream HTTP client")?;
    let service = AuctionService::new(Arc::new(client), cache.clone(), config.upstream_timeout());
    let state = AppState::new(service, config.api_key.as_str());

    let persist_handle = spawn_persist_task(cache.clone(), config.persist_interval);

    let app = create_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    let first_signal = Arc::new(Notify::new());
    let notify = first_signal.clone();
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        notify.notify_one();
    });

    let drain_and_persist = async {
        server.await.context("server error")?;
        persist_handle.abort();
        info!("Persisting cache before exit");
        cache.persist().await.context("final cache persist failed")
    };

    // A second signal abandons both the connection drain and the final persist
    let second_signal = async {
        first_signal.notified().await;
        shutdown_signal().await;
    };

    tokio::select! {
        result = drain_and_persist => {
            let bytes = result?;
            info!("Cache persisted ({} bytes)", bytes);
        }
        _ = second_signal => {
            warn!("Second shutdown signal received, exiting without persisting");
            std::process::exit(1);
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
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
}
