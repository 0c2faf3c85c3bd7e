//! Per-pixel gradient estimation.
//!
//! Gradients use central differences with zero padding, which reduces to a
//! one-sided difference on the border that keeps the sign of the interior
//! neighbor. The vertical component is `I(y-1) - I(y+1)`, i.e. it points
//! towards decreasing row index.
use crate::{HogParams, PixelView};
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Image gradient at a single pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Gradient {
    pub dx: f64,
    pub dy: f64,
}

impl Gradient {
    #[inline]
    pub fn magnitude(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }

    /// Raw orientation `atan2(dy, dx)` in `(-π, π]`.
    #[inline]
    pub fn orientation(&self) -> f64 {
        self.dy.atan2(self.dx)
    }
}

/// Difference between the `after` and `before` neighbors along one axis.
///
/// A missing neighbor counts as zero, so a pixel with no neighbor on either
/// side yields zero.
#[inline]
fn padded_difference(before: Option<f64>, after: Option<f64>) -> f64 {
    match (before, after) {
        (Some(b), Some(a)) => a - b,
        (None, Some(a)) => a,
        (Some(b), None) => -b,
        (None, None) => 0.0,
    }
}

/// Gradient of channel `c` at `(x, y)`.
#[inline]
pub fn channel_gradient(img: &PixelView<'_>, x: usize, y: usize, c: usize) -> Gradient {
    let left = (x > 0).then(|| img.at(y, x - 1, c));
    let right = (x + 1 < img.width()).then(|| img.at(y, x + 1, c));
    let up = (y > 0).then(|| img.at(y - 1, x, c));
    let down = (y + 1 < img.height()).then(|| img.at(y + 1, x, c));

    Gradient {
        dx: padded_difference(left, right),
        // rows grow downwards, the vertical component points up
        dy: padded_difference(down, up),
    }
}

/// Gradient used for the descriptor at `(x, y)`.
///
/// Color views pick the channel with the largest magnitude; a later channel
/// only wins on a strictly greater magnitude.
#[inline]
pub fn pixel_gradient(img: &PixelView<'_>, x: usize, y: usize) -> Gradient {
    strongest_channel(img, x, y).0
}

#[inline]
fn strongest_channel(img: &PixelView<'_>, x: usize, y: usize) -> (Gradient, f64) {
    let first = channel_gradient(img, x, y, 0);
    let mut best = (first, first.magnitude());
    for c in 1..img.channels().count() {
        let g = channel_gradient(img, x, y, c);
        let mag = g.magnitude();
        if mag > best.1 {
            best = (g, mag);
        }
    }
    best
}

/// Shift a negative orientation into `[0, range)`.
#[inline]
pub fn fold_orientation(angle: f64, range: f64) -> f64 {
    if angle < 0.0 {
        angle + range
    } else {
        angle
    }
}

/// Dense gradient magnitudes and folded orientations in row-major layout.
#[derive(Clone, Debug)]
pub struct GradientField {
    pub width: usize,
    pub height: usize,
    pub magnitude: Vec<f64>,
    /// Orientation folded into `[0, orient · π)`.
    pub orientation: Vec<f64>,
}

impl GradientField {
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(img, params), fields(w = img.width(), h = img.height()))
    )]
    pub fn compute(img: &PixelView<'_>, params: &HogParams) -> Self {
        let w = img.width();
        let h = img.height();
        let range = params.angular_range();

        let mut magnitude = vec![0.0f64; w * h];
        let mut orientation = vec![0.0f64; w * h];

        let fill_row = |y: usize, row_mag: &mut [f64], row_or: &mut [f64]| {
            for x in 0..w {
                let (g, mag) = strongest_channel(img, x, y);
                row_mag[x] = mag;
                row_or[x] = fold_orientation(g.orientation(), range);
            }
        };

        if w > 0 {
            #[cfg(feature = "rayon")]
            magnitude
                .par_chunks_mut(w)
                .zip(orientation.par_chunks_mut(w))
                .enumerate()
                .for_each(|(y, (row_mag, row_or))| fill_row(y, row_mag, row_or));

            #[cfg(not(feature = "rayon"))]
            magnitude
                .chunks_mut(w)
                .zip(orientation.chunks_mut(w))
                .enumerate()
                .for_each(|(y, (row_mag, row_or))| fill_row(y, row_mag, row_or));
        }

        Self {
            width: w,
            height: h,
            magnitude,
            orientation,
        }
    }

    #[inline]
    pub fn magnitude_at(&self, x: usize, y: usize) -> f64 {
        self.magnitude[y * self.width + x]
    }

    #[inline]
    pub fn orientation_at(&self, x: usize, y: usize) -> f64 {
        self.orientation[y * self.width + x]
    }
}
