//! # photo-squeeze
//!
//! Shrink a photo to fit a pixel envelope, re-encode it as JPEG at an
//! adjustable quality, and see how much smaller it got.
//!
//! # Architecture: Three-Step Pipeline
//!
//! ```text
//! 1. Resize   source   →  resized   (fit-scale into the target box, never upscale)
//! 2. Encode   resized  →  JPEG      (quality in [0, 1])
//! 3. Measure  JPEG vs. full-quality reference  →  bytes + ratio
//! ```
//!
//! The steps run in strict order whenever the source, quality, or target
//! changes. Each step is a plain function over immutable values, so the whole
//! pipeline is a pure function from inputs to outputs ([`pipeline::recompute`]).
//! Failures surface as "no output available", never as a panic.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Fit-scale math, `Quality`/`TargetSize`, the `ImageBackend` trait and its `image`-crate implementation |
//! | [`types`] | `RasterImage` and `EncodedImage`, the values passed between steps |
//! | [`metrics`] | Byte counts, compression ratio, human-readable sizes |
//! | [`pipeline`] | `recompute`, the synchronous `Session`, and the background `Recomputer` |
//! | [`config`] | `config.toml` loading, merging and validation |
//! | [`output`] | Captions and CLI report formatting |
//!
//! # Design Decisions
//!
//! ## Never Upscale
//!
//! A photo that already fits the box is passed through untouched. Enlarging
//! adds bytes without adding detail.
//!
//! ## Full-Quality Reference
//!
//! The ratio compares the output against the *source* re-encoded at quality
//! 1.0, not against the file on disk. The comparison stays JPEG-to-JPEG even
//! when the source arrived as PNG or WebP.
//!
//! ## Pixel-Exact Output
//!
//! Resizing works in pixels with no display scale factor, so the same inputs
//! produce the same byte count on every machine.

pub mod config;
pub mod imaging;
pub mod metrics;
pub mod output;
pub mod pipeline;
pub mod types;
