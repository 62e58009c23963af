//! Grayscale Server - converts images on disk to grayscale JPEG over HTTP
//!
//! Converted images are cached in memory for a fixed TTL, keyed by the
//! resolved file path.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod imaging;
pub mod server;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_purge_task;
