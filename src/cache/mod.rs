//! Cache Module
//!
//! Provides the in-memory store of converted images with TTL expiration.

mod entry;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

/// The cache as shared between request handlers.
///
/// Every `lookup` and `insert` takes the lock on its own; no lock is held
/// across a conversion.
pub type SharedCache = Arc<RwLock<CacheStore>>;

// == Public Constants ==
/// How long a converted image is served before it is converted again
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);
