//! CLI output formatting.
//!
//! The display surface needs three captions per side: dimensions, byte
//! count, and the ratio between them. [`Captions`] derives all of them from
//! a [`PipelineOutput`] so any front-end renders the same strings.
//!
//! # Output Format
//!
//! ## Squeeze
//!
//! ```text
//! Input   4000 × 3000   3.1 MB   (quality 1.00)
//! Output  1080 × 810    184 KB   (quality 0.85)
//! Ratio   5%
//! Saved   2.9 MB
//! Wrote   photo-squeezed.jpg
//! ```
//!
//! ## Inspect
//!
//! ```text
//! Source     4000 × 3000
//! Reference  3.1 MB   (quality 1.00)
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::metrics::{ByteUnits, RATIO_PLACEHOLDER, format_byte_count};
use crate::pipeline::PipelineOutput;
use crate::types::{DisplayDimensions, EncodedImage, RasterImage};
use serde::Serialize;
use std::path::Path;

/// Caption shown in place of the output when the pipeline produced nothing.
pub const NO_OUTPUT: &str = "no output available";

/// Human-readable strings for both sides of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Captions {
    pub input_dimensions: String,
    pub input_size: String,
    pub output_dimensions: String,
    pub output_size: String,
    pub ratio: String,
    pub saved: String,
}

impl Captions {
    pub fn new(output: &PipelineOutput, units: ByteUnits) -> Self {
        Self {
            input_dimensions: DisplayDimensions(output.reference.dimensions()).to_string(),
            input_size: format_byte_count(output.metrics.input_bytes, units),
            output_dimensions: DisplayDimensions(output.output.dimensions()).to_string(),
            output_size: format_byte_count(output.metrics.output_bytes, units),
            ratio: output.metrics.format_ratio(),
            saved: format_byte_count(output.metrics.bytes_saved(), units),
        }
    }

    /// Captions for the "nothing to show" state.
    pub fn placeholder() -> Self {
        Self {
            input_dimensions: String::new(),
            input_size: String::new(),
            output_dimensions: String::new(),
            output_size: String::new(),
            ratio: RATIO_PLACEHOLDER.to_string(),
            saved: String::new(),
        }
    }
}

/// Machine-readable report, emitted with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: [u32; 2],
    pub resized: [u32; 2],
    pub quality: f32,
    pub input_bytes: u64,
    pub output_bytes: u64,
    /// `None` when the reference encoding is empty.
    pub ratio_percent: Option<u64>,
    pub captions: Captions,
}

impl Report {
    pub fn new(output: &PipelineOutput, units: ByteUnits) -> Self {
        let (sw, sh) = output.reference.dimensions();
        let (rw, rh) = output.resized.dimensions();
        Self {
            source: [sw, sh],
            resized: [rw, rh],
            quality: output.output.quality().value(),
            input_bytes: output.metrics.input_bytes,
            output_bytes: output.metrics.output_bytes,
            ratio_percent: output.metrics.ratio_percent(),
            captions: Captions::new(output, units),
        }
    }
}

/// Two-column row with a fixed-width label.
fn row(label: &str, value: &str) -> String {
    format!("{:<7} {}", label, value)
}

/// Format the result of a squeeze run.
///
/// `written` is the path the output JPEG was saved to, if any.
pub fn format_squeeze_output(
    output: &PipelineOutput,
    units: ByteUnits,
    written: Option<&Path>,
) -> Vec<String> {
    let captions = Captions::new(output, units);
    let dims_width = captions
        .input_dimensions
        .chars()
        .count()
        .max(captions.output_dimensions.chars().count());
    let size_width = captions.input_size.len().max(captions.output_size.len());

    let side = |dims: &str, size: &str, encoded: &EncodedImage| {
        let pad = dims_width - dims.chars().count();
        format!(
            "{}{}   {:<size_width$}   (quality {})",
            dims,
            " ".repeat(pad),
            size,
            encoded.quality()
        )
    };

    let mut lines = vec![
        row(
            "Input",
            &side(
                &captions.input_dimensions,
                &captions.input_size,
                &output.reference,
            ),
        ),
        row(
            "Output",
            &side(
                &captions.output_dimensions,
                &captions.output_size,
                &output.output,
            ),
        ),
        row("Ratio", &captions.ratio),
        row("Saved", &captions.saved),
    ];

    if let Some(path) = written {
        lines.push(row("Wrote", &path.display().to_string()));
    }
    lines
}

/// Format the "nothing to show" state with its cause.
pub fn format_no_output(cause: &str) -> Vec<String> {
    let captions = Captions::placeholder();
    vec![
        row("Output", NO_OUTPUT),
        row("Ratio", &captions.ratio),
        row("Cause", cause),
    ]
}

/// Format source details for the `inspect` command.
pub fn format_inspect_output(
    source: &RasterImage,
    reference: &EncodedImage,
    units: ByteUnits,
) -> Vec<String> {
    vec![
        format!(
            "{:<10} {}",
            "Source",
            DisplayDimensions(source.dimensions())
        ),
        format!(
            "{:<10} {}   (quality {})",
            "Reference",
            format_byte_count(reference.byte_len(), units),
            reference.quality()
        ),
    ]
}

pub fn print_squeeze_output(output: &PipelineOutput, units: ByteUnits, written: Option<&Path>) {
    for line in format_squeeze_output(output, units, written) {
        println!("{}", line);
    }
}

pub fn print_no_output(cause: &str) {
    for line in format_no_output(cause) {
        println!("{}", line);
    }
}

pub fn print_inspect_output(source: &RasterImage, reference: &EncodedImage, units: ByteUnits) {
    for line in format_inspect_output(source, reference, units) {
        println!("{}", line);
    }
}
