//! API Handlers
//!
//! Serves one image request: resolve the path under the root, answer from
//! the cache when fresh, otherwise convert and cache.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, Uri},
    response::{IntoResponse, Response},
};
use image::RgbImage;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::cache::{CacheStore, SharedCache, DEFAULT_TTL};
use crate::error::{Result, ServiceError};
use crate::imaging::{Grayscale, ImageCodec, JpegCodec, PixelTransform};

/// Application state shared across all handlers.
///
/// The cache is created once at startup and handed to every request.
#[derive(Clone)]
pub struct AppState {
    /// Thread-safe converted-image cache
    pub cache: SharedCache,
    /// Absolute directory requests are resolved against
    pub root: Arc<PathBuf>,
    /// Decoder/encoder for source and delivered images
    pub codec: Arc<dyn ImageCodec>,
    /// Conversion applied on a cache miss
    pub transform: Arc<dyn PixelTransform>,
    /// Freshness of each cache insert
    pub ttl: Duration,
}

impl AppState {
    /// Creates a new AppState serving `root` with the given cache store,
    /// a default JPEG codec, grayscale conversion and the default TTL.
    pub fn new(root: impl Into<PathBuf>, cache: CacheStore) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);

        Self {
            cache: Arc::new(RwLock::new(cache)),
            root: Arc::new(root),
            codec: Arc::new(JpegCodec::default()),
            transform: Arc::new(Grayscale),
            ttl: DEFAULT_TTL,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(config.image_root.clone(), CacheStore::new())
            .with_codec(JpegCodec::new(config.jpeg_quality))
            .with_ttl(config.cache_ttl())
    }

    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.codec = Arc::new(codec);
        self
    }

    pub fn with_transform(mut self, transform: impl PixelTransform + 'static) -> Self {
        self.transform = Arc::new(transform);
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Whether a request was answered from the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    Hit,
    Miss,
}

/// An encoded image ready to send.
#[derive(Debug, Clone)]
pub struct ServedImage {
    pub bytes: Vec<u8>,
    pub outcome: CacheOutcome,
}

// == Path Resolution ==
/// Maps a request path onto a file location under `root`.
///
/// The leading `/` is required and stripped, the remainder is
/// percent-decoded and must stay inside `root`: parent, root and prefix
/// components are rejected. No other normalization is applied.
pub fn resolve_request_path(root: &Path, request_path: &str) -> Result<PathBuf> {
    let Some(relative) = request_path.strip_prefix('/') else {
        return Err(ServiceError::BadRequest(format!(
            "path must start with '/': {request_path}"
        )));
    };

    let relative = urlencoding::decode(relative)
        .map_err(|_| ServiceError::BadRequest(format!("path is not valid UTF-8: {request_path}")))?;
    let relative = Path::new(relative.as_ref());

    let escapes_root = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes_root {
        return Err(ServiceError::BadRequest(format!(
            "path escapes the image root: {request_path}"
        )));
    }

    Ok(root.join(relative))
}

// == Request Handling ==
/// Produces the encoded grayscale image for `request_path`.
///
/// Exactly one cache insert happens on a successful miss and none on a hit
/// or on any failure before the insert. The lookup and the insert each take
/// the cache lock separately, so two concurrent misses for the same file
/// may both convert; the later insert wins.
pub async fn handle(state: &AppState, request_path: &str) -> Result<ServedImage> {
    let resolved = resolve_request_path(&state.root, request_path)?;

    let is_file = tokio::fs::metadata(&resolved)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(ServiceError::NotFound(request_path.to_string()));
    }

    let key = resolved.to_string_lossy().into_owned();

    let cached = state.cache.write().await.lookup(&key);
    if let Some(image) = cached {
        let bytes = encode(state, image).await?;
        return Ok(ServedImage {
            bytes,
            outcome: CacheOutcome::Hit,
        });
    }

    let source = tokio::fs::read(&resolved).await?;
    let converted = convert(state, source).await?;

    state
        .cache
        .write()
        .await
        .insert(key, Arc::clone(&converted), state.ttl);

    let bytes = encode(state, converted).await?;
    Ok(ServedImage {
        bytes,
        outcome: CacheOutcome::Miss,
    })
}

/// Decodes and transforms on the blocking pool.
async fn convert(state: &AppState, source: Vec<u8>) -> Result<Arc<RgbImage>> {
    let codec = Arc::clone(&state.codec);
    let transform = Arc::clone(&state.transform);

    let image = tokio::task::spawn_blocking(move || -> Result<RgbImage> {
        let decoded = codec.decode(&source)?;
        Ok(transform.apply(&decoded))
    })
    .await??;

    Ok(Arc::new(image))
}

async fn encode(state: &AppState, image: Arc<RgbImage>) -> Result<Vec<u8>> {
    let codec = Arc::clone(&state.codec);
    let bytes = tokio::task::spawn_blocking(move || codec.encode(&image)).await??;
    Ok(bytes)
}

/// Fallback handler: every method and path is an image request.
pub async fn image_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();

    match handle(&state, path).await {
        Ok(served) => {
            match served.outcome {
                CacheOutcome::Hit => info!(path = %path, "Cached image sent"),
                CacheOutcome::Miss => info!(path = %path, "Converted image sent"),
            }
            (
                [(header::CONTENT_TYPE, state.codec.content_type())],
                served.bytes,
            )
                .into_response()
        }
        Err(err) => {
            match &err {
                ServiceError::BadRequest(_) => warn!(path = %path, "Bad request: {}", err),
                ServiceError::NotFound(_) => info!(path = %path, "File not found"),
                _ => error!(path = %path, "Internal server error: {}", err),
            }
            err.into_response()
        }
    }
}
