//! Image processing backend trait and shared error type.
//!
//! The [`ImageBackend`] trait defines the three pixel operations the pipeline
//! needs: decode, resize and JPEG encode. Everything above this layer
//! (operations, pipeline, CLI) is backend-agnostic, which lets tests swap in
//! a recording mock.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image` crate.

use super::params::Quality;
use crate::types::RasterImage;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Encode failed: {0}")]
    Encode(String),
    #[error("Decode failed: {0}")]
    Decode(String),
}

/// Trait for image processing backends.
pub trait ImageBackend: Sync {
    /// Decode an encoded image (any supported format) into pixels.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError>;

    /// Resample to exactly `width` x `height`. Callers own the aspect math.
    fn resize(
        &self,
        raster: &RasterImage,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, BackendError>;

    /// Serialize to baseline JPEG at the given quality.
    fn encode_jpeg(&self, raster: &RasterImage, quality: Quality) -> Result<Vec<u8>, BackendError>;
}
