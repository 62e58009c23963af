//! API Module
//!
//! HTTP handling for the image server.
//!
//! # Endpoints
//! - `GET /<file>` - The grayscale JPEG of `<file>` under the image root.
//!   Any method and any path shape is treated this way.

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::{create_router, create_router_with_limits, RouterLimits};
