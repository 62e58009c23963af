//! Configuration Module
//!
//! Handles loading server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::imaging::DEFAULT_JPEG_QUALITY;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory images are served from
    pub image_root: PathBuf,
    /// Host/interface to bind
    pub server_host: String,
    /// HTTP server port
    pub server_port: u16,
    /// Seconds a converted image stays cached
    pub cache_ttl: u64,
    /// JPEG quality for responses (1-100)
    pub jpeg_quality: u8,
    /// Seconds between sweeps of expired entries, 0 = lazy expiry only
    pub purge_interval: u64,
    /// Per-request timeout in seconds, 0 = none
    pub request_timeout: u64,
    /// Cap on in-flight requests, 0 = unbounded
    pub max_concurrent_requests: usize,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `IMAGE_ROOT` - Directory to serve (default: ./images)
    /// - `SERVER_HOST` - Bind host (default: 127.0.0.1)
    /// - `SERVER_PORT` - HTTP server port (default: 5050)
    /// - `CACHE_TTL` - Cache TTL in seconds (default: 60)
    /// - `JPEG_QUALITY` - Response JPEG quality, clamped to 1-100 (default: 75)
    /// - `PURGE_INTERVAL` - Expired-entry sweep in seconds (default: 0, off)
    /// - `REQUEST_TIMEOUT` - Per-request timeout in seconds (default: 0, off)
    /// - `MAX_CONCURRENT_REQUESTS` - In-flight request cap (default: 0, unbounded)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from any variable source; unset or unparseable
    /// values fall back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            image_root: lookup("IMAGE_ROOT")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.image_root),
            server_host: lookup("SERVER_HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.server_host),
            server_port: parsed_or(&lookup, "SERVER_PORT", defaults.server_port),
            cache_ttl: parsed_or(&lookup, "CACHE_TTL", defaults.cache_ttl),
            jpeg_quality: parsed_or::<u32, _>(&lookup, "JPEG_QUALITY", defaults.jpeg_quality.into())
                .clamp(1, 100) as u8,
            purge_interval: parsed_or(&lookup, "PURGE_INTERVAL", defaults.purge_interval),
            request_timeout: parsed_or(&lookup, "REQUEST_TIMEOUT", defaults.request_timeout),
            max_concurrent_requests: parsed_or(
                &lookup,
                "MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            ),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    /// Sweep interval, if the purge task is enabled.
    pub fn purge_interval(&self) -> Option<Duration> {
        (self.purge_interval > 0).then(|| Duration::from_secs(self.purge_interval))
    }

    /// Request timeout, if enabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout))
    }

    /// Concurrency cap, if enabled.
    pub fn max_concurrent_requests(&self) -> Option<usize> {
        (self.max_concurrent_requests > 0).then_some(self.max_concurrent_requests)
    }
}

fn parsed_or<T, F>(lookup: &F, name: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_root: PathBuf::from("./images"),
            server_host: "127.0.0.1".to_string(),
            server_port: 5050,
            cache_ttl: 60,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            purge_interval: 0,
            request_timeout: 0,
            max_concurrent_requests: 0,
        }
    }
}
