//! Size comparison between a reference encoding and a compressed one.
//!
//! The reference ("input") side is always the *source* raster encoded at
//! [`Quality::FULL`](crate::imaging::Quality::FULL), not the bytes of the file
//! the user picked. Measuring against a re-encode keeps the comparison
//! JPEG-to-JPEG regardless of what format the photo arrived in.

use crate::types::EncodedImage;
use serde::Serialize;

/// Placeholder shown when the ratio is undefined (empty reference).
pub const RATIO_PLACEHOLDER: &str = "--%";

/// Byte counts for both sides of a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompressionMetrics {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

impl CompressionMetrics {
    pub fn new(input: &EncodedImage, output: &EncodedImage) -> Self {
        Self::from_byte_counts(input.byte_len(), output.byte_len())
    }

    pub fn from_byte_counts(input_bytes: u64, output_bytes: u64) -> Self {
        Self {
            input_bytes,
            output_bytes,
        }
    }

    /// `output / input`, or `None` when the reference is empty.
    pub fn ratio(&self) -> Option<f64> {
        (self.input_bytes != 0).then(|| self.output_bytes as f64 / self.input_bytes as f64)
    }

    /// Ratio as a whole percentage, truncated toward zero.
    pub fn ratio_percent(&self) -> Option<u64> {
        (self.input_bytes != 0).then(|| self.output_bytes * 100 / self.input_bytes)
    }

    /// `"25%"`, or [`RATIO_PLACEHOLDER`] when undefined.
    pub fn format_ratio(&self) -> String {
        match self.ratio_percent() {
            Some(pct) => format!("{pct}%"),
            None => RATIO_PLACEHOLDER.to_string(),
        }
    }

    /// Bytes saved relative to the reference; zero if the output grew.
    pub fn bytes_saved(&self) -> u64 {
        self.input_bytes.saturating_sub(self.output_bytes)
    }
}

/// Unit system for human-readable byte counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ByteUnits {
    /// Powers of 1000: KB, MB, GB.
    #[default]
    Decimal,
    /// Powers of 1024: KiB, MiB, GiB.
    Binary,
}

impl ByteUnits {
    fn base(self) -> f64 {
        match self {
            ByteUnits::Decimal => 1000.0,
            ByteUnits::Binary => 1024.0,
        }
    }

    fn labels(self) -> [&'static str; 4] {
        match self {
            ByteUnits::Decimal => ["KB", "MB", "GB", "TB"],
            ByteUnits::Binary => ["KiB", "MiB", "GiB", "TiB"],
        }
    }
}

/// Human-readable byte count.
///
/// Below one kilo-unit the exact count is shown (`"1 byte"`, `"999 bytes"`).
/// Kilo values have no decimals, larger units one (`"312 KB"`, `"1.4 MB"`).
pub fn format_byte_count(bytes: u64, units: ByteUnits) -> String {
    let base = units.base();
    if (bytes as f64) < base {
        return match bytes {
            1 => "1 byte".to_string(),
            n => format!("{n} bytes"),
        };
    }

    let mut value = bytes as f64 / base;
    let mut unit = 0;
    let labels = units.labels();
    // Promote when rounding would display a full unit (e.g. 999.96 KB → 1.0 MB)
    while unit + 1 < labels.len() && value.round() >= base {
        value /= base;
        unit += 1;
    }

    if unit == 0 {
        format!("{:.0} {}", value, labels[unit])
    } else {
        format!("{:.1} {}", value, labels[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::Quality;

    #[test]
    fn ratio_quarter() {
        let m = CompressionMetrics::from_byte_counts(1000, 250);
        assert_eq!(m.ratio(), Some(0.25));
        assert_eq!(m.ratio_percent(), Some(25));
        assert_eq!(m.format_ratio(), "25%");
    }

    #[test]
    fn ratio_undefined_for_empty_reference() {
        let m = CompressionMetrics::from_byte_counts(0, 250);
        assert_eq!(m.ratio(), None);
        assert_eq!(m.format_ratio(), "--%");
    }

    #[test]
    fn ratio_truncates() {
        // 2/3 = 66.67%
        assert_eq!(CompressionMetrics::from_byte_counts(3, 2).format_ratio(), "66%");
    }

    #[test]
    fn ratio_can_exceed_hundred() {
        // A tiny image re-encoded at low quality can still grow past the reference
        assert_eq!(
            CompressionMetrics::from_byte_counts(100, 150).format_ratio(),
            "150%"
        );
    }

    #[test]
    fn metrics_from_encoded_images() {
        let input = EncodedImage::new(vec![0; 1000], Quality::FULL, (10, 10));
        let output = EncodedImage::new(vec![0; 250], Quality::default(), (5, 5));
        let m = CompressionMetrics::new(&input, &output);
        assert_eq!(m.input_bytes, 1000);
        assert_eq!(m.output_bytes, 250);
        assert_eq!(m.bytes_saved(), 750);
    }

    #[test]
    fn bytes_saved_saturates() {
        assert_eq!(CompressionMetrics::from_byte_counts(10, 20).bytes_saved(), 0);
    }

    #[test]
    fn byte_count_small_values() {
        assert_eq!(format_byte_count(0, ByteUnits::Decimal), "0 bytes");
        assert_eq!(format_byte_count(1, ByteUnits::Decimal), "1 byte");
        assert_eq!(format_byte_count(999, ByteUnits::Decimal), "999 bytes");
        assert_eq!(format_byte_count(1000, ByteUnits::Binary), "1000 bytes");
    }

    #[test]
    fn byte_count_decimal() {
        assert_eq!(format_byte_count(1000, ByteUnits::Decimal), "1 KB");
        assert_eq!(format_byte_count(312_400, ByteUnits::Decimal), "312 KB");
        assert_eq!(format_byte_count(1_400_000, ByteUnits::Decimal), "1.4 MB");
        assert_eq!(format_byte_count(2_500_000_000, ByteUnits::Decimal), "2.5 GB");
    }

    #[test]
    fn byte_count_binary() {
        assert_eq!(format_byte_count(1024, ByteUnits::Binary), "1 KiB");
        assert_eq!(format_byte_count(1536 * 1024, ByteUnits::Binary), "1.5 MiB");
    }

    #[test]
    fn byte_count_promotes_on_rounding() {
        assert_eq!(format_byte_count(999_960, ByteUnits::Decimal), "1.0 MB");
    }
}
