//! End-to-end pipeline runs against the real `image`-crate backend.
//!
//! Sources are synthetic rasters written to a temp dir, so these run
//! without fixtures.

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use photo_squeeze::imaging::{
    BackendError, Quality, RustBackend, TargetSize, decode, encode_jpeg,
};
use photo_squeeze::metrics::ByteUnits;
use photo_squeeze::output::{Captions, format_no_output, format_squeeze_output};
use photo_squeeze::pipeline::{
    PipelineInput, Recomputer, Session, recompute, recompute_file, try_recompute_file,
};
use photo_squeeze::types::RasterImage;
use std::path::Path;
use std::sync::Arc;

/// Smooth gradient with deterministic texture, photo-like enough that
/// quality changes move the byte count.
fn photo(width: u32, height: u32) -> RasterImage {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let texture = ((x.wrapping_mul(2_654_435_761) ^ y.wrapping_mul(40_503)) >> 27) as u8;
        Rgb([
            ((x * 255 / width.max(1)) as u8).saturating_add(texture),
            ((y * 255 / height.max(1)) as u8).saturating_sub(texture),
            (((x + y) / 4) % 256) as u8,
        ])
    });
    RasterImage::new(DynamicImage::ImageRgb8(img))
}

fn write_png(path: &Path, raster: &RasterImage) {
    raster
        .pixels()
        .save_with_format(path, ImageFormat::Png)
        .unwrap();
}

#[test]
fn landscape_source_fits_portrait_box() {
    let backend = RustBackend::new();
    let input = PipelineInput {
        source: photo(1600, 1200),
        quality: Quality::default(),
        target: TargetSize::new(432, 768).unwrap(),
    };

    let out = recompute(&backend, &input).unwrap();
    // min(768/1200, 432/1600) = 0.27
    assert_eq!(out.resized.dimensions(), (432, 324));

    let decoded = out.output.decode(&backend).unwrap();
    assert_eq!(decoded.dimensions(), (432, 324));
    assert!(out.metrics.output_bytes < out.metrics.input_bytes);
}

#[test]
fn small_source_is_not_upscaled() {
    let backend = RustBackend::new();
    let source = photo(300, 200);
    let out = recompute(&backend, &PipelineInput::new(source.clone())).unwrap();

    assert_eq!(out.resized, source);
    assert_eq!(out.output.dimensions(), (300, 200));
}

#[test]
fn full_quality_not_smaller_than_low_quality() {
    let backend = RustBackend::new();
    let source = photo(320, 240);
    let high = encode_jpeg(&backend, &source, Quality::FULL).unwrap();
    let low = encode_jpeg(&backend, &source, Quality::new(0.1).unwrap()).unwrap();
    assert!(high.byte_len() >= low.byte_len());
}

#[test]
fn decoded_png_source_runs_through_pipeline() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("source.png");
    write_png(&path, &photo(800, 600));

    let backend = RustBackend::new();
    let out = recompute_file(
        &backend,
        &path,
        Quality::new(0.5).unwrap(),
        TargetSize::new(400, 400).unwrap(),
    )
    .unwrap();
    assert_eq!(out.resized.dimensions(), (400, 300));

    let lines = format_squeeze_output(&out, ByteUnits::Decimal, None);
    assert!(lines[0].starts_with("Input   800 × 600"));
    assert!(lines[1].starts_with("Output  400 × 300"));
    assert!(lines[2].ends_with('%'));
}

#[test]
fn corrupt_file_gives_no_output() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("broken.jpg");
    std::fs::write(&path, b"\xFF\xD8 truncated").unwrap();

    let backend = RustBackend::new();
    let output = recompute_file(&backend, &path, Quality::default(), TargetSize::default());
    assert!(output.is_none());

    let cause = try_recompute_file(&backend, &path, Quality::default(), TargetSize::default())
        .unwrap_err();
    assert!(matches!(cause, BackendError::Decode(_)));
    let lines = format_no_output(&cause.to_string());
    assert_eq!(lines[0], "Output  no output available");
    assert_eq!(lines[1], "Ratio   --%");
}

#[test]
fn corrupt_bytes_fail_to_decode() {
    let backend = RustBackend::new();
    assert!(matches!(
        decode(&backend, b"\xFF\xD8 truncated"),
        Err(BackendError::Decode(_))
    ));
}

#[test]
fn session_tracks_control_changes() {
    let mut session = Session::new(RustBackend::new());
    assert!(session.output().is_none());

    session.set_source(photo(640, 480));
    let default_bytes = session.output().unwrap().metrics.output_bytes;
    assert_eq!(session.output().unwrap().resized.dimensions(), (640, 480));

    session.set_target(TargetSize::new(320, 320).unwrap());
    assert_eq!(session.output().unwrap().resized.dimensions(), (320, 240));
    let smaller_bytes = session.output().unwrap().metrics.output_bytes;
    assert!(smaller_bytes < default_bytes);

    let captions = Captions::new(session.output().unwrap(), ByteUnits::Decimal);
    assert_eq!(captions.input_dimensions, "640 × 480");
    assert_eq!(captions.output_dimensions, "320 × 240");
}

#[test]
fn recomputer_answers_newest_submission() {
    let recomputer = Recomputer::spawn(Arc::new(RustBackend::new()));
    recomputer.submit(PipelineInput::new(photo(400, 300)));
    let last = recomputer.submit(PipelineInput {
        source: photo(400, 300),
        quality: Quality::new(0.3).unwrap(),
        target: TargetSize::new(100, 100).unwrap(),
    });

    let done = recomputer.wait_for(last).unwrap();
    let out = done.output.unwrap();
    assert_eq!(out.resized.dimensions(), (100, 75));
    assert_eq!(out.output.quality().value(), 0.3);
}
