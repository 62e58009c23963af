//! Imaging Module
//!
//! The two collaborators a request needs besides the cache: a codec that
//! turns file bytes into pixels and pixels into a JPEG, and a pure pixel
//! transform applied between the two.

mod codec;
mod grayscale;

use image::RgbImage;
use thiserror::Error;

pub use codec::{JpegCodec, DEFAULT_JPEG_QUALITY};
pub use grayscale::{gray_level, Grayscale};

// == Codec Error ==
/// Failure at the codec boundary.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The bytes are not an image in any supported format
    #[error("failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The converted image could not be written out
    #[error("failed to encode image: {0}")]
    Encode(#[source] image::ImageError),
}

/// Decodes source files and encodes converted images for delivery.
pub trait ImageCodec: Send + Sync {
    /// Decodes file contents into an RGB image.
    fn decode(&self, bytes: &[u8]) -> Result<RgbImage, CodecError>;

    /// Encodes an image into the delivery format.
    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, CodecError>;

    /// MIME type of what [`encode`](Self::encode) produces.
    fn content_type(&self) -> &'static str;
}

/// A pure per-pixel transform. Output has the input's dimensions.
pub trait PixelTransform: Send + Sync {
    fn apply(&self, image: &RgbImage) -> RgbImage;
}
