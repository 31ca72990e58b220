//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Scale factor that fits `source` inside `target`, preserving aspect ratio.
///
/// The smaller of the two per-axis ratios wins, so the binding axis lands
/// exactly on the box edge. Values `>= 1.0` mean the source already fits.
///
/// Both arguments must be non-zero on both axes.
///
/// # Examples
/// ```
/// # use photo_squeeze::imaging::fit_scale;
/// // 4000x3000 into 1080x1920: width binds at 0.27
/// assert_eq!(fit_scale((4000, 3000), (1080, 1920)), 0.27);
/// ```
pub fn fit_scale(source: (u32, u32), target: (u32, u32)) -> f64 {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let by_height = tgt_h as f64 / src_h as f64;
    let by_width = tgt_w as f64 / src_w as f64;
    by_height.min(by_width)
}

/// Output dimensions for a fit-scale, or `None` when no resize is needed.
///
/// Never upscales: a scale of 1 or more returns `None` and the caller keeps
/// the source as is. Dimensions are floored so floating-point error can never
/// push an axis past the box; each axis keeps at least one pixel.
pub fn fit_dimensions(source: (u32, u32), target: (u32, u32)) -> Option<(u32, u32)> {
    let scale = fit_scale(source, target);
    if scale >= 1.0 {
        return None;
    }

    let (src_w, src_h) = source;
    Some((
        scaled_axis(src_w, scale, target.0),
        scaled_axis(src_h, scale, target.1),
    ))
}

/// Floor `len * scale` into `1..=edge`.
///
/// The epsilon absorbs representation error on the binding axis
/// (`0.27 * 4000` must give 1080, not 1079).
fn scaled_axis(len: u32, scale: f64, edge: u32) -> u32 {
    ((len as f64 * scale + 1e-9).floor() as u32).clamp(1, edge)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // fit_scale tests
    // =========================================================================

    #[test]
    fn scale_landscape_into_portrait_box() {
        // min(1920/3000, 1080/4000) = min(0.64, 0.27)
        assert_eq!(fit_scale((4000, 3000), (1080, 1920)), 0.27);
    }

    #[test]
    fn scale_height_binds() {
        // min(100/400, 400/200) = 0.25
        assert_eq!(fit_scale((200, 400), (400, 100)), 0.25);
    }

    #[test]
    fn scale_already_fits_is_at_least_one() {
        assert!(fit_scale((800, 600), (1080, 1920)) >= 1.0);
    }

    // =========================================================================
    // fit_dimensions tests
    // =========================================================================

    #[test]
    fn dimensions_reference_scenario() {
        assert_eq!(fit_dimensions((4000, 3000), (1080, 1920)), Some((1080, 810)));
    }

    #[test]
    fn dimensions_portrait_source() {
        // 3000x4000 into 1080x1920: min(0.48, 0.36) = 0.36 → 1080x1440
        assert_eq!(fit_dimensions((3000, 4000), (1080, 1920)), Some((1080, 1440)));
    }

    #[test]
    fn dimensions_none_when_fits() {
        assert_eq!(fit_dimensions((1080, 1920), (1080, 1920)), None);
        assert_eq!(fit_dimensions((10, 10), (1080, 1920)), None);
    }

    #[test]
    fn dimensions_one_axis_too_large() {
        // Height fits, width does not: still shrinks
        assert_eq!(fit_dimensions((2160, 100), (1080, 1920)), Some((1080, 50)));
    }

    #[test]
    fn dimensions_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_dimensions((10_000, 1), (100, 100)), Some((100, 1)));
    }

    #[test]
    fn dimensions_never_exceed_target_and_preserve_aspect() {
        let sources = [
            (4000, 3000),
            (3000, 4000),
            (1921, 1081),
            (7, 9000),
            (12_345, 678),
            (1081, 1921),
            (5000, 5000),
        ];
        let targets = [(1080, 1920), (1, 1), (333, 777), (640, 480), (1000, 1)];

        for &src in &sources {
            for &tgt in &targets {
                let (w, h) = fit_dimensions(src, tgt).unwrap_or(src);
                assert!(w <= tgt.0 && h <= tgt.1, "{src:?} into {tgt:?} gave {w}x{h}");

                // Within one pixel of the exact aspect on the non-binding axis
                let scale = fit_scale(src, tgt).min(1.0);
                let exact_w = src.0 as f64 * scale;
                let exact_h = src.1 as f64 * scale;
                assert!((w as f64 - exact_w).abs() <= 1.0, "{src:?} → {tgt:?}: w {w}");
                assert!((h as f64 - exact_h).abs() <= 1.0, "{src:?} → {tgt:?}: h {h}");
            }
        }
    }
}
