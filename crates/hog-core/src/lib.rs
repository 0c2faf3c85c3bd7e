//! Core primitives for computing Histogram of Oriented Gradients (HOG) descriptors.
//!
//! # Overview
//!
//! A descriptor is produced in three strictly sequential phases:
//!
//! - [`gradient`] – per-pixel central differences (one-sided at the borders),
//!   with the strongest channel selected for color images.
//! - [`histogram`] – trilinear interpolation of every gradient sample into a
//!   padded `rows × cols × nb_bins` grid of cell histograms.
//! - [`normalize`] – overlapping `block_size × block_size` windows of cells,
//!   L2-normalized, clipped and renormalized into the flat feature vector.
//!
//! The output length is a pure function of the image size and parameters, see
//! [`geometry::feature_count`]. Callers size the output buffer up front and
//! hand it to [`descriptor::compute_hog_into`].
//!
//! Pixels are read through a [`PixelView`]: a column-major, explicitly strided
//! view over `f64` samples with either one (grayscale) or three (color)
//! channel planes.
//!
//! # Features
//!
//! - `rayon` – computes the gradient field row-parallel and normalizes blocks
//!   in parallel. Histogram accumulation stays sequential, so the output is
//!   bit-identical to the single-threaded path.
//! - `tracing` – emits spans for the descriptor entry points and each phase.

pub mod descriptor;
pub mod geometry;
pub mod gradient;
pub mod histogram;
pub mod normalize;
pub mod view;

pub use crate::descriptor::{compute_hog, compute_hog_into, compute_hog_with_trace, HogTrace};
pub use crate::geometry::{feature_count, HistGeometry};
pub use crate::histogram::HistogramGrid;
pub use crate::view::{Channels, PixelView};

/// Tunable parameters for the HOG descriptor.
#[derive(Clone, Debug, PartialEq)]
pub struct HogParams {
    /// Number of orientation bins.
    pub nb_bins: usize,
    /// Cell side in pixels. Fractional widths are allowed.
    pub cell_width: f64,
    /// Number of cells per block side.
    pub block_size: usize,
    /// Fold orientations into `[0, π)` instead of `[0, 2π)`.
    pub unsigned_dirs: bool,
    /// Ceiling applied to each normalized block entry before renormalizing.
    pub clip_val: f64,
}

impl Default for HogParams {
    fn default() -> Self {
        Self {
            nb_bins: 9,
            cell_width: 8.0,
            block_size: 2,
            unsigned_dirs: true,
            clip_val: 0.2,
        }
    }
}

impl HogParams {
    /// Create a new parameter set with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bins(mut self, nb_bins: usize) -> Self {
        self.nb_bins = nb_bins;
        self
    }

    pub fn with_cell_width(mut self, cell_width: f64) -> Self {
        self.cell_width = cell_width;
        self
    }

    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = block_size;
        self
    }

    /// Select unsigned (`[0, π)`) or signed (`[0, 2π)`) orientations.
    pub fn with_unsigned_dirs(mut self, unsigned_dirs: bool) -> Self {
        self.unsigned_dirs = unsigned_dirs;
        self
    }

    pub fn with_clip(mut self, clip_val: f64) -> Self {
        self.clip_val = clip_val;
        self
    }

    /// Multiplier of π spanned by the orientation axis: 1 for unsigned, 2 for signed.
    #[inline]
    pub fn orient(&self) -> u32 {
        if self.unsigned_dirs {
            1
        } else {
            2
        }
    }

    /// Angular range covered by the bins, `orient · π`.
    #[inline]
    pub fn angular_range(&self) -> f64 {
        const PI: f64 = core::f64::consts::PI;
        self.orient() as f64 * PI
    }

    /// Angular width of a single orientation bin.
    #[inline]
    pub fn bin_size(&self) -> f64 {
        self.angular_range() / self.nb_bins as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::PI;

    #[test]
    fn signed_orientations_double_range_and_bin_width() {
        let unsigned = HogParams::default();
        let signed = HogParams::default().with_unsigned_dirs(false);

        assert_eq!(unsigned.orient(), 1);
        assert_eq!(signed.orient(), 2);
        assert_relative_eq!(unsigned.angular_range(), PI);
        assert_relative_eq!(signed.angular_range(), 2.0 * PI);
        assert_relative_eq!(signed.bin_size(), 2.0 * unsigned.bin_size());
        assert_relative_eq!(unsigned.bin_size(), PI / 9.0);
    }

    #[test]
    fn builder_overrides_fields() {
        let p = HogParams::new()
            .with_bins(12)
            .with_cell_width(6.5)
            .with_block_size(3)
            .with_unsigned_dirs(false)
            .with_clip(0.3);
        assert_eq!(
            p,
            HogParams {
                nb_bins: 12,
                cell_width: 6.5,
                block_size: 3,
                unsigned_dirs: false,
                clip_val: 0.3,
            }
        );
    }
}
