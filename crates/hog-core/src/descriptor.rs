//! Descriptor entry points tying the three phases together.
use crate::geometry::HistGeometry;
use crate::gradient::GradientField;
use crate::histogram::HistogramGrid;
use crate::normalize::normalize_blocks;
use crate::{HogParams, PixelView};
use std::time::Instant;
#[cfg(feature = "tracing")]
use tracing::{debug_span, instrument};

/// Descriptor together with per-phase timings.
pub struct HogTrace {
    pub features: Vec<f64>,
    /// Time spent estimating gradients (milliseconds).
    pub gradient_ms: f64,
    /// Time spent on trilinear accumulation (milliseconds).
    pub histogram_ms: f64,
    /// Time spent on block normalization (milliseconds).
    pub normalize_ms: f64,
}

/// Compute the HOG descriptor of `img` into a caller-sized buffer.
///
/// `out` must hold exactly [`crate::feature_count`]`(img.height(), img.width(),
/// params)` values. Every entry is overwritten.
///
/// # Panics
///
/// If `out` has the wrong length.
#[cfg_attr(
    feature = "tracing",
    instrument(
        level = "info",
        skip(img, params, out),
        fields(w = img.width(), h = img.height(), color = img.is_color(), len = out.len())
    )
)]
pub fn compute_hog_into(img: &PixelView<'_>, params: &HogParams, out: &mut [f64]) {
    #[cfg(feature = "tracing")]
    let span = debug_span!("gradients").entered();
    let field = GradientField::compute(img, params);
    #[cfg(feature = "tracing")]
    drop(span);

    #[cfg(feature = "tracing")]
    let span = debug_span!("histogram").entered();
    let hist = HistogramGrid::accumulate(&field, params);
    #[cfg(feature = "tracing")]
    drop(span);

    normalize_blocks(&hist, params.clip_val, out);
}

/// Compute the HOG descriptor of `img` into a freshly allocated vector.
pub fn compute_hog(img: &PixelView<'_>, params: &HogParams) -> Vec<f64> {
    let len = HistGeometry::new(img.height(), img.width(), params).feature_count();
    let mut out = vec![0.0; len];
    compute_hog_into(img, params, &mut out);
    out
}

/// Same as [`compute_hog`], additionally reporting how long each phase took.
pub fn compute_hog_with_trace(img: &PixelView<'_>, params: &HogParams) -> HogTrace {
    let grad_started = Instant::now();
    let field = GradientField::compute(img, params);
    let gradient_ms = grad_started.elapsed().as_secs_f64() * 1000.0;

    let hist_started = Instant::now();
    let hist = HistogramGrid::accumulate(&field, params);
    let histogram_ms = hist_started.elapsed().as_secs_f64() * 1000.0;

    let norm_started = Instant::now();
    let mut features = vec![0.0; hist.geometry.feature_count()];
    normalize_blocks(&hist, params.clip_val, &mut features);
    let normalize_ms = norm_started.elapsed().as_secs_f64() * 1000.0;

    HogTrace {
        features,
        gradient_ms,
        histogram_ms,
        normalize_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{feature_count, Channels};
    use approx::assert_relative_eq;

    fn column_major(h: usize, w: usize, planes: usize, f: impl Fn(usize, usize, usize) -> f64) -> Vec<f64> {
        let mut data = vec![0.0; h * w * planes];
        for c in 0..planes {
            for x in 0..w {
                for y in 0..h {
                    data[y + x * h + c * h * w] = f(x, y, c);
                }
            }
        }
        data
    }

    fn block_norms(features: &[f64], block_len: usize) -> Vec<f64> {
        features
            .chunks(block_len)
            .map(|b| b.iter().map(|v| v * v).sum::<f64>().sqrt())
            .collect()
    }

    #[test]
    fn zero_image_yields_zero_descriptor() {
        let params = HogParams::default();
        let data = vec![0.0; 40 * 56];
        let img = PixelView::from_column_major(&data, 40, 56, Channels::Gray).unwrap();
        let features = compute_hog(&img, &params);
        assert_eq!(features.len(), feature_count(40, 56, &params));
        assert!(features.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn constant_image_only_lights_up_border_blocks() {
        // Zero padding turns the image border into an edge; blocks away from
        // it see no gradient at all.
        let params = HogParams::default();
        let data = vec![0.5; 64 * 64];
        let img = PixelView::from_column_major(&data, 64, 64, Channels::Gray).unwrap();
        let features = compute_hog(&img, &params);
        let g = HistGeometry::new(64, 64, &params);
        assert_eq!((g.blocks_across(), g.blocks_down()), (7, 7));

        for (n, norm) in block_norms(&features, g.block_len()).into_iter().enumerate() {
            let (bx, by) = (n / 7, n % 7);
            let interior = (1..6).contains(&bx) && (1..6).contains(&by);
            if interior {
                assert_eq!(norm, 0.0, "block ({bx}, {by})");
            } else {
                assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn vertical_edge_concentrates_in_horizontal_gradient_bins() {
        let params = HogParams::default();
        let data = column_major(16, 16, 1, |x, _, _| if x < 8 { 0.0 } else { 1.0 });
        let img = PixelView::from_column_major(&data, 16, 16, Channels::Gray).unwrap();
        let features = compute_hog(&img, &params);
        assert_eq!(features.len(), 36);

        let mut energy = [0.0f64; 9];
        for (i, v) in features.iter().enumerate() {
            energy[i % 9] += v * v;
        }
        // orientation 0 (and π at the padded right border) sits between the
        // centers of bins 8 and 0
        assert_relative_eq!(energy[0], energy[8], epsilon = 1e-12);
        for k in 1..8 {
            assert!(energy[0] > energy[k], "bin {k} outweighs bin 0: {energy:?}");
        }
        assert_relative_eq!(energy.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn non_degenerate_blocks_have_unit_norm() {
        let params = HogParams::default().with_cell_width(4.0).with_block_size(3);
        let (h, w) = (29usize, 35usize);
        let data = column_major(h, w, 1, |x, y, _| ((x * 7 + y * 13) % 11) as f64 / 10.0);
        let img = PixelView::from_column_major(&data, h, w, Channels::Gray).unwrap();
        let features = compute_hog(&img, &params);
        let g = HistGeometry::new(h, w, &params);
        assert_eq!(features.len(), g.feature_count());
        for norm in block_norms(&features, g.block_len()) {
            assert_relative_eq!(norm, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn color_follows_dominant_channel() {
        let (h, w) = (12usize, 13usize);
        let pattern = |x: usize, y: usize| ((x * 7 + y * 13) % 11) as f64 / 10.0;
        let params = HogParams::default().with_cell_width(4.0);

        // channel 2 carries the full pattern, the others a faint copy
        let rgb = column_major(h, w, 3, |x, y, c| match c {
            0 => 0.1 * pattern(x, y),
            1 => 0.2 * pattern(x, y),
            _ => pattern(x, y),
        });
        let gray = column_major(h, w, 1, |x, y, _| pattern(x, y));

        let color_img = PixelView::from_column_major(&rgb, h, w, Channels::Rgb).unwrap();
        let gray_img = PixelView::from_column_major(&gray, h, w, Channels::Gray).unwrap();
        assert_eq!(compute_hog(&color_img, &params), compute_hog(&gray_img, &params));
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let params = HogParams::default().with_unsigned_dirs(false);
        let data = column_major(30, 22, 3, |x, y, c| ((x * 3 + y * 5 + c * 7) % 13) as f64);
        let img = PixelView::from_column_major(&data, 30, 22, Channels::Rgb).unwrap();
        let a = compute_hog(&img, &params);
        let b = compute_hog(&img, &params);
        let traced = compute_hog_with_trace(&img, &params);
        assert_eq!(a, b);
        assert_eq!(a, traced.features);
        assert!(traced.gradient_ms >= 0.0);
    }

    #[test]
    fn strided_view_matches_packed_copy() {
        let (h, w, stride) = (10usize, 9usize, 13usize);
        let mut padded = vec![-7.0; stride * w];
        let mut packed = vec![0.0; h * w];
        for x in 0..w {
            for y in 0..h {
                let v = ((x * x + 3 * y) % 17) as f64;
                padded[y + x * stride] = v;
                packed[y + x * h] = v;
            }
        }
        let params = HogParams::default().with_cell_width(3.0);
        let a = PixelView::gray(&padded, h, w, stride).unwrap();
        let b = PixelView::from_column_major(&packed, h, w, Channels::Gray).unwrap();
        assert_eq!(compute_hog(&a, &params), compute_hog(&b, &params));
    }

    #[test]
    fn tiny_images_produce_empty_descriptor() {
        let params = HogParams::default();
        let data = [3.0];
        let img = PixelView::gray(&data, 1, 1, 1).unwrap();
        assert!(compute_hog(&img, &params).is_empty());
        let empty = PixelView::gray(&[], 0, 0, 0).unwrap();
        assert!(compute_hog(&empty, &params).is_empty());
    }
}
