//! API Routes
//!
//! Configures the Axum router. Every path is an image request, so the only
//! handler is the fallback.

use std::time::Duration;

use axum::Router;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use super::handlers::{image_handler, AppState};

/// Optional per-request hardening, all off by default.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouterLimits {
    /// Requests running longer are answered with 408
    pub request_timeout: Option<Duration>,
    /// Requests beyond this many in flight wait for a slot
    pub max_concurrent_requests: Option<usize>,
}

impl RouterLimits {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            max_concurrent_requests: config.max_concurrent_requests(),
        }
    }
}

/// Creates the router with no timeout and no concurrency cap.
pub fn create_router(state: AppState) -> Router {
    create_router_with_limits(state, RouterLimits::default())
}

/// Creates the main router.
///
/// # Middleware
/// - CORS: Allows any origin, so images can be embedded cross-site
/// - Catch panic: A panicking request becomes a 500 instead of a dropped connection
/// - Timeout / concurrency limit: Only when set in `limits`
/// - Tracing: Logs all requests for debugging
pub fn create_router_with_limits(state: AppState, limits: RouterLimits) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut router = Router::new()
        .fallback(image_handler)
        .with_state(state)
        .layer(CatchPanicLayer::new());

    if let Some(timeout) = limits.request_timeout {
        router = router.layer(TimeoutLayer::new(timeout));
    }
    if let Some(max) = limits.max_concurrent_requests {
        router = router.layer(ConcurrencyLimitLayer::new(max));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}
