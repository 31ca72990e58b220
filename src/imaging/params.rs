//! Parameter types for image operations.
//!
//! These describe *what* to do, not *how*. [`Quality`] and [`TargetSize`]
//! validate on construction, so anything holding one can rely on its range.
//!
//! - [`Quality`] — JPEG fidelity in `[0, 1]`, default 0.85.
//! - [`TargetSize`] — bounding box in pixels, both axes non-zero, default 1080×1920.

use super::backend::BackendError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JPEG encoder fidelity, 0 = smallest file, 1 = best fidelity.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Quality(f32);

impl Quality {
    /// Full fidelity. Used for the reference encoding the ratio is measured against.
    pub const FULL: Quality = Quality(1.0);

    /// Rejects NaN and anything outside `[0, 1]`.
    pub fn new(value: f32) -> Result<Self, BackendError> {
        if !(0.0..=1.0).contains(&value) {
            return Err(BackendError::InvalidInput(format!(
                "quality must be within [0, 1], got {value}"
            )));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Map onto the codec's 1–100 scale.
    ///
    /// The encoder has no level 0, so the bottom of the range collapses onto 1.
    pub fn to_codec_scale(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.85)
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl<'de> Deserialize<'de> for Quality {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = f32::deserialize(deserializer)?;
        Quality::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Bounding box the resized image must fit inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TargetSize {
    width: u32,
    height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Result<Self, BackendError> {
        if width == 0 || height == 0 {
            return Err(BackendError::InvalidInput(format!(
                "target size must be positive on both axes, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(self) -> u32 {
        self.width
    }

    pub fn height(self) -> u32 {
        self.height
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Replace either axis, keeping the other. Overrides are validated too.
    pub fn with_overrides(
        self,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<Self, BackendError> {
        Self::new(width.unwrap_or(self.width), height.unwrap_or(self.height))
    }
}

impl Default for TargetSize {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
        }
    }
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
