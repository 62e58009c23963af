//! Cache Entry Module
//!
//! Defines a single converted image held by the cache, with its expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use image::RgbImage;

// == Cache Entry ==
/// A converted image and the instant after which it is no longer served.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The converted image, shared read-only with every caller
    pub image: Arc<RgbImage>,
    /// When the entry was inserted
    pub created_at: Instant,
    /// When the entry stops being fresh
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry that stays fresh for `ttl` from now.
    ///
    /// # Arguments
    /// * `image` - The converted image
    /// * `ttl` - How long the entry is served before it expires
    pub fn new(image: Arc<RgbImage>, ttl: Duration) -> Self {
        let now = Instant::now();

        Self {
            image,
            created_at: now,
            // A TTL too large to represent never expires in practice.
            expires_at: now.checked_add(ttl).unwrap_or(now + Duration::from_secs(u32::MAX as u64)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its expiration instant, so an entry is never
    /// served at the exact moment its TTL runs out.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against an explicit clock reading.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
