//! Values that flow between pipeline steps.
//!
//! Both types are immutable once built. A step that "changes" an image
//! produces a new one; nothing upstream is mutated.

use crate::imaging::{BackendError, ImageBackend, Quality};
use image::{DynamicImage, GenericImageView};
use std::fmt;

/// Decoded pixels plus their dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    pixels: DynamicImage,
}

impl RasterImage {
    pub fn new(pixels: DynamicImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Zero pixels on either axis.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }

    pub fn into_pixels(self) -> DynamicImage {
        self.pixels
    }
}

impl From<DynamicImage> for RasterImage {
    fn from(pixels: DynamicImage) -> Self {
        Self::new(pixels)
    }
}

/// JPEG bytes together with what produced them.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    bytes: Vec<u8>,
    quality: Quality,
    width: u32,
    height: u32,
}

impl EncodedImage {
    pub fn new(bytes: Vec<u8>, quality: Quality, dimensions: (u32, u32)) -> Self {
        Self {
            bytes,
            quality,
            width: dimensions.0,
            height: dimensions.1,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn byte_len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Dimensions of the raster that was encoded.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Decode back to pixels, e.g. to show what the compression did.
    pub fn decode(&self, backend: &impl ImageBackend) -> Result<RasterImage, BackendError> {
        backend.decode(&self.bytes)
    }
}

/// Two dimensions rendered as `W × H`.
pub struct DisplayDimensions(pub (u32, u32));

impl fmt::Display for DisplayDimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} × {}", self.0.0, self.0.1)
    }
}
