//! Histogram grid geometry and the descriptor length it implies.
//!
//! The histogram carries one padding cell on every side so trilinear
//! interpolation never needs bounds checks. Blocks are only placed at interior
//! positions, which fixes the descriptor length as a pure function of image
//! size and parameters.
use crate::HogParams;

/// Dimensions of the padded cell-histogram grid for a given image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistGeometry {
    /// Cell rows including padding (`hist1`).
    pub rows: usize,
    /// Cell columns including padding (`hist2`).
    pub cols: usize,
    pub nb_bins: usize,
    pub block_size: usize,
}

/// `2 + ceil(extent / cell_width - 0.5)`, never below 2.
#[inline]
fn padded_cells(extent: usize, cell_width: f64) -> usize {
    let inner = (extent as f64 / cell_width - 0.5).ceil();
    (inner.max(0.0) as usize).saturating_add(2)
}

/// Same as [`padded_cells`], `None` when the count does not fit in `usize`.
fn checked_padded_cells(extent: usize, cell_width: f64) -> Option<usize> {
    let inner = (extent as f64 / cell_width - 0.5).ceil().max(0.0);
    // `usize::MAX as f64` rounds up to 2^64, anything below casts exactly
    if inner.is_nan() || inner >= usize::MAX as f64 {
        return None;
    }
    (inner as usize).checked_add(2)
}

/// Largest number of `f64` values a single allocation can hold.
const MAX_VALUES: usize = isize::MAX as usize / std::mem::size_of::<f64>();

impl HistGeometry {
    pub fn new(height: usize, width: usize, params: &HogParams) -> Self {
        Self {
            rows: padded_cells(height, params.cell_width),
            cols: padded_cells(width, params.cell_width),
            nb_bins: params.nb_bins,
            block_size: params.block_size,
        }
    }

    /// Like [`HistGeometry::new`], but `None` when the grid or the descriptor
    /// would not fit in memory: cell counts, histogram length and feature
    /// count are all computed without overflow and bounded by the largest
    /// possible `f64` allocation.
    pub fn checked(height: usize, width: usize, params: &HogParams) -> Option<Self> {
        let geometry = Self {
            rows: checked_padded_cells(height, params.cell_width)?,
            cols: checked_padded_cells(width, params.cell_width)?,
            nb_bins: params.nb_bins,
            block_size: params.block_size,
        };
        if geometry.checked_len()? > MAX_VALUES || geometry.checked_feature_count()? > MAX_VALUES {
            return None;
        }
        Some(geometry)
    }

    /// [`HistGeometry::len`] without overflow.
    pub fn checked_len(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)?.checked_mul(self.nb_bins)
    }

    /// [`HistGeometry::feature_count`] without overflow.
    pub fn checked_feature_count(&self) -> Option<usize> {
        let block_len = self
            .block_size
            .checked_mul(self.block_size)?
            .checked_mul(self.nb_bins)?;
        self.blocks_across()
            .checked_mul(self.blocks_down())?
            .checked_mul(block_len)
    }

    /// Number of vertical block positions, `y ∈ [1, rows - block_size)`.
    #[inline]
    pub fn blocks_down(&self) -> usize {
        self.rows.saturating_sub(self.block_size + 1)
    }

    /// Number of horizontal block positions, `x ∈ [1, cols - block_size)`.
    #[inline]
    pub fn blocks_across(&self) -> usize {
        self.cols.saturating_sub(self.block_size + 1)
    }

    /// Values written per block: `block_size² · nb_bins`.
    #[inline]
    pub fn block_len(&self) -> usize {
        self.block_size * self.block_size * self.nb_bins
    }

    #[inline]
    pub fn feature_count(&self) -> usize {
        self.blocks_across() * self.blocks_down() * self.block_len()
    }

    /// Number of histogram entries, `rows · cols · nb_bins`.
    #[inline]
    pub fn len(&self) -> usize {
        self.rows * self.cols * self.nb_bins
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flat index of bin `k` in cell `(y, x)`.
    #[inline]
    pub fn index(&self, y: usize, x: usize, k: usize) -> usize {
        (y * self.cols + x) * self.nb_bins + k
    }
}

/// Exact length of the descriptor for an image of `height × width` pixels.
///
/// Shares its grid formula with the accumulator, so a buffer of this length is
/// always exactly filled by [`crate::compute_hog_into`]. Returns 0 when no
/// block fits.
pub fn feature_count(height: usize, width: usize, params: &HogParams) -> usize {
    HistGeometry::new(height, width, params).feature_count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry_for_pedestrian_window() {
        let params = HogParams::default();
        let g = HistGeometry::new(128, 64, &params);
        // 2 + ceil(16 - 0.5) and 2 + ceil(8 - 0.5)
        assert_eq!((g.rows, g.cols), (18, 10));
        assert_eq!((g.blocks_down(), g.blocks_across()), (15, 7));
        assert_eq!(g.block_len(), 36);
        assert_eq!(feature_count(128, 64, &params), 15 * 7 * 36);
    }

    #[test]
    fn matches_closed_form() {
        for &(h, w, cw, bs, nb) in &[
            (16usize, 16usize, 8.0, 2usize, 9usize),
            (20, 27, 6.0, 3, 12),
            (24, 18, 5.5, 2, 9),
            (33, 47, 4.0, 1, 4),
            (100, 3, 2.5, 2, 6),
        ] {
            let params = HogParams::default()
                .with_cell_width(cw)
                .with_block_size(bs)
                .with_bins(nb);
            let hist1 = 2 + (h as f64 / cw - 0.5).ceil() as usize;
            let hist2 = 2 + (w as f64 / cw - 0.5).ceil() as usize;
            let expected = (hist1 - 2 - (bs - 1)) * (hist2 - 2 - (bs - 1)) * nb * bs * bs;
            assert_eq!(feature_count(h, w, &params), expected, "{h}x{w} cw={cw}");
        }
    }

    #[test]
    fn oversized_blocks_yield_empty_descriptor() {
        let params = HogParams::default().with_block_size(4);
        // 16 / 8 → 2 inner cells, a 4-cell block cannot fit.
        assert_eq!(feature_count(16, 16, &params), 0);
        assert_eq!(feature_count(0, 0, &HogParams::default()), 0);
    }

    #[test]
    fn checked_geometry_agrees_with_plain_one() {
        let params = HogParams::default().with_cell_width(5.5).with_block_size(3);
        let g = HistGeometry::checked(120, 77, &params).unwrap();
        assert_eq!(g, HistGeometry::new(120, 77, &params));
        assert_eq!(g.checked_len(), Some(g.len()));
        assert_eq!(g.checked_feature_count(), Some(g.feature_count()));
    }

    #[test]
    fn checked_geometry_rejects_oversized_grids() {
        // cell count saturates usize
        let tiny = HogParams::default().with_cell_width(1e-300);
        assert_eq!(HistGeometry::checked(16, 16, &tiny), None);
        // cell counts fit, rows * cols * bins does not
        let small = HogParams::default().with_cell_width(1e-9);
        assert_eq!(HistGeometry::checked(16, 16, &small), None);
        // fits in usize but not in one allocation
        let fine = HogParams::default().with_cell_width(1e-6);
        assert_eq!(HistGeometry::checked(1000, 1000, &fine), None);
        // the unchecked size query saturates instead of overflowing
        assert!(HistGeometry::new(16, 16, &tiny).rows >= 2);
    }

    #[test]
    fn index_is_row_major_over_cells_then_bins() {
        let g = HistGeometry::new(16, 24, &HogParams::default());
        assert_eq!(g.cols, 5);
        assert_eq!(g.index(0, 0, 0), 0);
        assert_eq!(g.index(0, 0, 8), 8);
        assert_eq!(g.index(0, 1, 0), 9);
        assert_eq!(g.index(1, 0, 0), 5 * 9);
        assert_eq!(g.len(), g.rows * g.cols * 9);
    }
}
