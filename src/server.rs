//! Server Module
//!
//! Binds the listener and runs the accept loop. Each connection is served
//! on its own task, so a slow conversion never holds up other requests.

use std::future::Future;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

use crate::api::{create_router_with_limits, AppState, RouterLimits};
use crate::config::Config;

/// Binds the configured address.
///
/// Failure here is fatal to the process.
pub async fn bind(config: &Config) -> anyhow::Result<TcpListener> {
    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    Ok(listener)
}

/// Serves requests on `listener` until `shutdown` resolves.
///
/// Only a listener-level failure ends the loop with an error; per-request
/// failures are answered and logged by the handler.
pub async fn serve<F>(
    listener: TcpListener,
    state: AppState,
    limits: RouterLimits,
    shutdown: F,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router_with_limits(state, limits);

    if let Ok(addr) = listener.local_addr() {
        info!("Server listening on http://{}", addr);
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server terminated")?;

    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
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
                tracing::error!("Failed to install SIGTERM handler: {}", err);
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
