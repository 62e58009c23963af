//! Grayscale Server - converts images on disk to grayscale JPEG over HTTP
//!
//! Converted images are cached in memory for a fixed TTL.

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grayscale_server::api::RouterLimits;
use grayscale_server::{server, spawn_purge_task, AppState, Config};

/// Main entry point for the grayscale image server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache and application state
/// 4. Start the expired-entry purge task, if enabled
/// 5. Bind and serve until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grayscale_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting grayscale image server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: image_root={}, cache_ttl={}s, jpeg_quality={}, purge_interval={}s",
        config.image_root.display(),
        config.cache_ttl,
        config.jpeg_quality,
        config.purge_interval
    );

    let state = AppState::from_config(&config);
    if !state.root.is_dir() {
        warn!("Image root {} is not a directory; every request will be 404", state.root.display());
    }

    let purge_handle = config
        .purge_interval()
        .map(|interval| spawn_purge_task(state.cache.clone(), interval));

    let listener = server::bind(&config).await?;
    let result = server::serve(
        listener,
        state.clone(),
        RouterLimits::from_config(&config),
        server::shutdown_signal(),
    )
    .await;

    if let Some(handle) = purge_handle {
        handle.abort();
    }

    let stats = state.cache.read().await.stats();
    info!(
        "Cache at shutdown: entries={}, hits={}, misses={}, expired={}, hit_rate={:.2}",
        stats.total_entries,
        stats.hits,
        stats.misses,
        stats.expired,
        stats.hit_rate()
    );

    result?;
    info!("Server shutdown complete");
    Ok(())
}
