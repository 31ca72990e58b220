//! High-level image operations.
//!
//! These functions combine calculations with backend execution: validate
//! inputs, compute parameters, call the backend, and wrap the result.

use super::backend::{BackendError, ImageBackend};
use super::calculations::fit_dimensions;
use super::params::{Quality, TargetSize};
use crate::types::{EncodedImage, RasterImage};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Shrink `source` to fit inside `target`, preserving aspect ratio.
///
/// An image that already fits is returned unchanged; this never upscales.
/// Output dimensions are in pixels with no display scale applied, so the
/// same inputs always produce the same raster.
pub fn resize_to_fit(
    backend: &impl ImageBackend,
    source: &RasterImage,
    target: TargetSize,
) -> Result<RasterImage> {
    if source.is_empty() {
        return Err(BackendError::InvalidInput(format!(
            "source raster is empty ({}x{})",
            source.width(),
            source.height()
        )));
    }

    match fit_dimensions(source.dimensions(), target.as_tuple()) {
        None => {
            tracing::debug!(
                source = ?source.dimensions(),
                %target,
                "source fits, keeping original"
            );
            Ok(source.clone())
        }
        Some((width, height)) => {
            tracing::debug!(
                source = ?source.dimensions(),
                %target,
                width,
                height,
                "resizing"
            );
            backend.resize(source, width, height)
        }
    }
}

/// Encode a raster to JPEG at `quality`.
pub fn encode_jpeg(
    backend: &impl ImageBackend,
    raster: &RasterImage,
    quality: Quality,
) -> Result<EncodedImage> {
    if raster.is_empty() {
        return Err(BackendError::Encode(format!(
            "cannot encode empty raster ({}x{})",
            raster.width(),
            raster.height()
        )));
    }

    let bytes = backend.encode_jpeg(raster, quality)?;
    tracing::debug!(
        dimensions = ?raster.dimensions(),
        %quality,
        bytes = bytes.len(),
        "encoded JPEG"
    );
    Ok(EncodedImage::new(bytes, quality, raster.dimensions()))
}

/// Decode encoded bytes (any supported format) into a raster.
pub fn decode(backend: &impl ImageBackend, bytes: &[u8]) -> Result<RasterImage> {
    if bytes.is_empty() {
        return Err(BackendError::Decode("no image data".into()));
    }
    backend.decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp, blank_raster};

    #[test]
    fn resize_to_fit_shrinks_reference_scenario() {
        let backend = MockBackend::new();
        let out = resize_to_fit(&backend, &blank_raster(4000, 3000), TargetSize::default()).unwrap();

        assert_eq!(out.dimensions(), (1080, 810));
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Resize {
                from: (4000, 3000),
                width: 1080,
                height: 810
            }]
        );
    }

    #[test]
    fn resize_to_fit_never_upscales() {
        let backend = MockBackend::new();
        let source = blank_raster(640, 480);
        let out = resize_to_fit(&backend, &source, TargetSize::default()).unwrap();

        assert_eq!(out, source);
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn resize_to_fit_exact_fit_is_unchanged() {
        let backend = MockBackend::new();
        let source = blank_raster(1080, 1920);
        let out = resize_to_fit(&backend, &source, TargetSize::default()).unwrap();
        assert_eq!(out.dimensions(), (1080, 1920));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn resize_to_fit_rejects_empty_source() {
        let backend = MockBackend::new();
        let result = resize_to_fit(&backend, &blank_raster(0, 0), TargetSize::default());
        assert!(matches!(result, Err(BackendError::InvalidInput(_))));
    }

    #[test]
    fn encode_jpeg_wraps_bytes_with_metadata() {
        let backend = MockBackend::new();
        let quality = Quality::new(0.5).unwrap();
        let encoded = encode_jpeg(&backend, &blank_raster(100, 10), quality).unwrap();

        assert_eq!(encoded.byte_len(), 500);
        assert_eq!(encoded.quality(), quality);
        assert_eq!(encoded.dimensions(), (100, 10));
    }

    #[test]
    fn encode_jpeg_rejects_empty_raster() {
        let backend = MockBackend::new();
        let result = encode_jpeg(&backend, &blank_raster(10, 0), Quality::default());
        assert!(matches!(result, Err(BackendError::Encode(_))));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn decode_rejects_empty_bytes_before_backend() {
        let backend = MockBackend::new();
        assert!(matches!(
            decode(&backend, &[]),
            Err(BackendError::Decode(_))
        ));
        assert!(backend.get_operations().is_empty());
    }
}
