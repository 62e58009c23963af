//! JPEG Codec
//!
//! Decodes any format the `image` crate can sniff and encodes baseline JPEG.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::RgbImage;

use super::{CodecError, ImageCodec};

/// JPEG quality used when none is configured
pub const DEFAULT_JPEG_QUALITY: u8 = 75;

/// Codec backed by the `image` crate, delivering `image/jpeg`.
#[derive(Debug, Clone, Copy)]
pub struct JpegCodec {
    quality: u8,
}

impl JpegCodec {
    /// Creates a codec encoding at `quality`, clamped to 1..=100.
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.clamp(1, 100),
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }
}

impl Default for JpegCodec {
    fn default() -> Self {
        Self::new(DEFAULT_JPEG_QUALITY)
    }
}

impl ImageCodec for JpegCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RgbImage, CodecError> {
        let image = image::load_from_memory(bytes).map_err(CodecError::Decode)?;
        Ok(image.to_rgb8())
    }

    fn encode(&self, image: &RgbImage) -> Result<Vec<u8>, CodecError> {
        let mut buf = Cursor::new(Vec::new());
        JpegEncoder::new_with_quality(&mut buf, self.quality)
            .encode_image(image)
            .map_err(CodecError::Encode)?;
        Ok(buf.into_inner())
    }

    fn content_type(&self) -> &'static str {
        "image/jpeg"
    }
}
