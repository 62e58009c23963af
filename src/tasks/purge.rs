//! Expired-Entry Purge Task
//!
//! Expiry is otherwise only noticed when an entry is looked up, so entries
//! for files nobody requests again stay in memory. This task sweeps them.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns a task that removes expired entries every `interval`.
///
/// The write lock is held only for the sweep itself.
///
/// # Returns
/// A JoinHandle for the spawned task, which should be aborted during
/// shutdown.
pub fn spawn_purge_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting expired-entry purge every {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.write().await.purge_expired();

            if removed > 0 {
                info!("Purge: removed {} expired images", removed);
            } else {
                debug!("Purge: no expired images found");
            }
        }
    })
}
