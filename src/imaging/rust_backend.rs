//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::load_from_memory` / `ImageReader` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` on 8-bit RGB |

use super::backend::{BackendError, ImageBackend};
use super::params::Quality;
use crate::types::RasterImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }

    /// Load and decode an image from disk, sniffing the format from content.
    ///
    /// When decoding fails and the extension is not one we can read, the
    /// error lists the supported extensions.
    pub fn decode_file(&self, path: &Path) -> Result<RasterImage, BackendError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map(RasterImage::new)
            .map_err(|e| {
                let mut message = format!("{}: {}", path.display(), e);
                if !has_supported_extension(path) {
                    message.push_str(&format!(
                        " (supported: {})",
                        supported_input_extensions().join(", ")
                    ));
                }
                BackendError::Decode(message)
            })
    }
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| supported_input_extensions().contains(&e.as_str()))
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageBackend for RustBackend {
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, BackendError> {
        image::load_from_memory(bytes)
            .map(RasterImage::new)
            .map_err(|e| BackendError::Decode(e.to_string()))
    }

    fn resize(
        &self,
        raster: &RasterImage,
        width: u32,
        height: u32,
    ) -> Result<RasterImage, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidInput(format!(
                "cannot resize to {width}x{height}"
            )));
        }
        if raster.is_empty() {
            return Err(BackendError::InvalidInput("source raster is empty".into()));
        }
        let resized = raster
            .pixels()
            .resize_exact(width, height, FilterType::Lanczos3);
        Ok(RasterImage::new(resized))
    }

    fn encode_jpeg(&self, raster: &RasterImage, quality: Quality) -> Result<Vec<u8>, BackendError> {
        if raster.is_empty() {
            return Err(BackendError::Encode(format!(
                "cannot encode empty raster ({}x{})",
                raster.width(),
                raster.height()
            )));
        }

        // JPEG carries no alpha and only 8-bit samples
        let rgb = raster.pixels().to_rgb8();
        let mut bytes = Vec::new();
        JpegEncoder::new_with_quality(&mut bytes, quality.to_codec_scale())
            .write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                ExtendedColorType::Rgb8,
            )
            .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
        Ok(bytes)
    }
}
