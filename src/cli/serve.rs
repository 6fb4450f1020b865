use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::core::config::TextgenConfig;
use crate::core::dispatcher::Dispatcher;
use crate::server::{self, AppState};

pub async fn run(config: TextgenConfig, bind: Option<String>) -> Result<()> {
    let bind = bind.unwrap_or_else(|| config.server.bind.clone());
    let addr: SocketAddr = bind
        .parse()
        .with_context(|| format!("Invalid bind address '{}'", bind))?;

    let state = Arc::new(AppState {
        dispatcher: Dispatcher::from_config(&config)?,
        defaults: config.generation.clone(),
    });
    let app = server::router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!(
        default_provider = %config.default_provider(),
        timeout_secs = config.server.timeout_secs,
        "textgen listening on {}",
        addr
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("textgen shut down");
    Ok(())
}

/// Wait for ctrl-c for graceful shutdown.
async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // No signal handler available; run until the process is killed.
        std::future::pending::<()>().await;
    }
    info!("received shutdown signal");
}
