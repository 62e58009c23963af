//! Cache Store Module
//!
//! Maps a resolved file path to its converted image, with TTL freshness
//! checked lazily on read.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;

use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Converted-image storage keyed by source file path.
///
/// The store itself is not synchronized; callers share it behind a lock
/// (see [`SharedCache`](crate::cache::SharedCache)).
#[derive(Debug, Default)]
pub struct CacheStore {
    /// Path to converted image
    entries: HashMap<String, CacheEntry>,
    /// Performance statistics
    stats: CacheStats,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store. There is no capacity limit.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
        }
    }

    // == Lookup ==
    /// Returns the cached image for `key` if it is still fresh.
    ///
    /// An entry found past its expiry is removed and reported as absent, so
    /// it can never reappear on a later lookup.
    pub fn lookup(&mut self, key: &str) -> Option<Arc<RgbImage>> {
        let now = Instant::now();

        match self.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => {
                let image = Arc::clone(&entry.image);
                self.stats.record_hit();
                Some(image)
            }
            Some(_) => {
                self.entries.remove(key);
                self.stats.record_expired(1);
                self.stats.record_miss();
                self.stats.set_total_entries(self.entries.len());
                None
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Insert ==
    /// Stores `image` under `key`, fresh for `ttl` from now.
    ///
    /// Any existing entry for the key is replaced regardless of its
    /// remaining TTL.
    pub fn insert(&mut self, key: String, image: Arc<RgbImage>, ttl: Duration) {
        self.entries.insert(key, CacheEntry::new(image, ttl));
        self.stats.record_insertion();
        self.stats.set_total_entries(self.entries.len());
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Purge Expired ==
    /// Removes every entry that is past its TTL.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();

        self.entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - self.entries.len();
        self.stats.record_expired(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    /// Whether an entry exists for `key`, fresh or not.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Length ==
    /// Returns the number of entries held, including expired ones not yet
    /// looked up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::thread::sleep;

    const LONG_TTL: Duration = Duration::from_secs(60);

    fn solid(value: u8) -> Arc<RgbImage> {
        Arc::new(RgbImage::from_pixel(3, 2, Rgb([value, value, value])))
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = CacheStore::new();

        store.insert("/srv/a.jpg".to_string(), solid(7), LONG_TTL);
        let image = store.lookup("/srv/a.jpg").unwrap();

        assert_eq!(*image, *solid(7));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_lookup_returns_shared_image() {
        let mut store = CacheStore::new();
        let original = solid(1);

        store.insert("k".to_string(), Arc::clone(&original), LONG_TTL);
        let cached = store.lookup("k").unwrap();

        assert!(Arc::ptr_eq(&original, &cached));
    }

    #[test]
    fn test_store_lookup_nonexistent() {
        let mut store = CacheStore::new();
        assert!(store.lookup("missing").is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new();

        store.insert("k".to_string(), solid(1), LONG_TTL);
        store.insert("k".to_string(), solid(2), Duration::from_secs(5));

        assert_eq!(*store.lookup("k").unwrap(), *solid(2));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_refreshes_expired_entry() {
        let mut store = CacheStore::new();

        store.insert("k".to_string(), solid(1), Duration::from_millis(20));
        sleep(Duration::from_millis(40));
        store.insert("k".to_string(), solid(2), LONG_TTL);

        assert_eq!(*store.lookup("k").unwrap(), *solid(2));
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = CacheStore::new();

        store.insert("k".to_string(), solid(1), Duration::from_millis(50));
        assert!(store.lookup("k").is_some());

        sleep(Duration::from_millis(80));

        assert!(store.lookup("k").is_none());
        assert!(!store.contains_key("k"), "expired entry should be removed on lookup");
        assert!(store.lookup("k").is_none());
    }

    #[test]
    fn test_store_keys_are_not_normalized() {
        let mut store = CacheStore::new();

        store.insert("/srv/Photo.jpg".to_string(), solid(1), LONG_TTL);

        assert!(store.lookup("/srv/photo.jpg").is_none());
        assert!(store.lookup("/srv/./Photo.jpg").is_none());
        assert!(store.lookup("/srv/Photo.jpg").is_some());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new();

        store.insert("k".to_string(), solid(1), LONG_TTL);
        store.lookup("k"); // hit
        store.lookup("missing"); // miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.insertions, 1);
        assert_eq!(stats.total_entries, 1);
    }

    #[test]
    fn test_store_expired_lookup_counts_as_miss() {
        let mut store = CacheStore::new();

        store.insert("k".to_string(), solid(1), Duration::ZERO);
        assert!(store.lookup("k").is_none());

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = CacheStore::new();

        store.insert("short".to_string(), solid(1), Duration::from_millis(20));
        store.insert("long".to_string(), solid(2), LONG_TTL);

        sleep(Duration::from_millis(40));

        let removed = store.purge_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.lookup("long").is_some());
    }

    #[test]
    fn test_store_expired_entries_linger_until_touched() {
        let mut store = CacheStore::new();

        store.insert("stale".to_string(), solid(1), Duration::ZERO);

        assert_eq!(store.len(), 1);
        assert!(store.contains_key("stale"));
    }
}
