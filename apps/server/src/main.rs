//! Loom server binary.

use std::path::PathBuf;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{info, warn};

use loom_server::{router, AppState, ServerConfig, StoreState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();
    loom_server::init_tracing();

    info!("Starting Loom server...");

    let config_path = std::env::var("LOOM_CONFIG").ok().map(PathBuf::from);
    let config = ServerConfig::load(config_path).context("Failed to load configuration")?;
    let addr = config.bind_addr()?;
    info!(
        bind = %addr,
        backend = ?config.store.backend,
        shop = %config.shop.name,
        "Configuration loaded"
    );

    let store = StoreState::connect(&config.store).await;
    if !store.is_ready() {
        warn!("Serving without a data store; data endpoints will answer 503");
    }

    let state = AppState::new(config, store.clone()).context("Failed to initialise authentication")?;
    let app = router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
