//! Image Cache - A read-through file cache for a remote image service

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use image_cache::api::{create_router, AppState};
use image_cache::config::{Cli, Config};

/// Main entry point for the image cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Parse and validate configuration
/// 3. Create the cache directory and origin client
/// 4. Start HTTP server on the configured host and port
/// 5. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "image_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_cli(Cli::parse())
        .context("Please specify necessary parameters: host, port, and cache path")?;
    info!(
        "Configuration loaded: host={}, port={}, cache_dir={:?}, origin={}, max_body_bytes={}, fetch_timeout={:?}",
        config.host,
        config.port,
        config.cache_dir,
        config.origin_url,
        config.max_body_bytes,
        config.fetch_timeout
    );

    let state = AppState::from_config(&config).context("Failed to build origin client")?;
    state
        .service
        .store()
        .init()
        .await
        .with_context(|| format!("Failed to create cache directory {:?}", config.cache_dir))?;
    info!("Cache store initialized");

    let app = create_router(state.clone(), config.max_body_bytes);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running at http://{}/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    let stats = state.service.stats().snapshot();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        hit_rate = stats.hit_rate(),
        origin_failures = stats.origin_failures,
        backfill_failures = stats.backfill_failures,
        writes = stats.writes,
        deletes = stats.deletes,
        "Server shutdown complete"
    );
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
