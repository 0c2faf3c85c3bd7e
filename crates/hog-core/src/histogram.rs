//! Cell histograms filled by trilinear interpolation.
//!
//! Every gradient sample is split across the 2×2 neighborhood of cells around
//! its position and the two orientation bins around its angle. The grid is
//! padded by one cell on each side so all eight destinations are always valid.
use crate::geometry::HistGeometry;
use crate::gradient::GradientField;
use crate::HogParams;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// The two circularly adjacent bins an orientation falls between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrientationBins {
    pub lower: usize,
    pub upper: usize,
    /// Share of the magnitude that goes to `upper`; `lower` gets the rest.
    pub upper_weight: f64,
}

/// Bins around `angle` for bins of width `bin_size`, wrapping at both ends.
#[inline]
pub fn orientation_bins(angle: f64, bin_size: f64, nb_bins: usize) -> OrientationBins {
    let lower = (0.5 + angle / bin_size).floor() as isize - 1;
    // center of `lower` before wrapping
    let center = ((lower + 2) as f64 - 1.5) * bin_size;
    let upper_weight = (angle - center) / bin_size;

    let mut upper = lower + 1;
    if upper == nb_bins as isize {
        upper = 0;
    }
    let lower = if lower < 0 { nb_bins as isize - 1 } else { lower };

    OrientationBins {
        lower: lower as usize,
        upper: upper as usize,
        upper_weight,
    }
}

/// The two adjacent cells a pixel coordinate falls between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSpan {
    /// Padded cell index of the first cell; the second is `lower + 1`.
    pub lower: usize,
    /// Share of the magnitude that goes to `lower + 1`.
    pub upper_weight: f64,
}

#[inline]
pub fn cell_span(coord: usize, cell_width: f64) -> CellSpan {
    let lower = (0.5 + coord as f64 / cell_width).floor() as usize;
    let center = ((lower + 1) as f64 - 1.5) * cell_width + 0.5;
    CellSpan {
        lower,
        upper_weight: ((coord + 1) as f64 - center) / cell_width,
    }
}

/// Dense `rows × cols × nb_bins` grid of cell histograms.
#[derive(Clone, Debug)]
pub struct HistogramGrid {
    pub geometry: HistGeometry,
    pub data: Vec<f64>,
}

impl HistogramGrid {
    pub fn zeros(geometry: HistGeometry) -> Self {
        Self {
            geometry,
            data: vec![0.0; geometry.len()],
        }
    }

    /// Accumulate every sample of `field` in row-major pixel order.
    ///
    /// Accumulation order is fixed so repeated runs are bit-identical.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "debug", skip(field, params), fields(w = field.width, h = field.height))
    )]
    pub fn accumulate(field: &GradientField, params: &HogParams) -> Self {
        let geometry = HistGeometry::new(field.height, field.width, params);
        let mut hist = Self::zeros(geometry);
        if params.nb_bins == 0 {
            return hist;
        }
        let bin_size = params.bin_size();

        for y in 0..field.height {
            let sy = cell_span(y, params.cell_width);
            for x in 0..field.width {
                let sx = cell_span(x, params.cell_width);
                let bins = orientation_bins(field.orientation_at(x, y), bin_size, params.nb_bins);
                hist.deposit(field.magnitude_at(x, y), sx, sy, bins);
            }
        }

        hist
    }

    /// Split `magnitude` over the 2×2×2 neighborhood described by the spans.
    #[inline]
    pub fn deposit(&mut self, magnitude: f64, sx: CellSpan, sy: CellSpan, bins: OrientationBins) {
        let (x1, x2) = (sx.lower, sx.lower + 1);
        let (y1, y2) = (sy.lower, sy.lower + 1);
        let (wx, wy, wo) = (sx.upper_weight, sy.upper_weight, bins.upper_weight);
        let (b1, b2) = (bins.lower, bins.upper);
        let g = self.geometry;

        self.data[g.index(y1, x1, b1)] += magnitude * (1.0 - wx) * (1.0 - wy) * (1.0 - wo);
        self.data[g.index(y1, x1, b2)] += magnitude * (1.0 - wx) * (1.0 - wy) * wo;
        self.data[g.index(y2, x1, b1)] += magnitude * (1.0 - wx) * wy * (1.0 - wo);
        self.data[g.index(y2, x1, b2)] += magnitude * (1.0 - wx) * wy * wo;
        self.data[g.index(y1, x2, b1)] += magnitude * wx * (1.0 - wy) * (1.0 - wo);
        self.data[g.index(y1, x2, b2)] += magnitude * wx * (1.0 - wy) * wo;
        self.data[g.index(y2, x2, b1)] += magnitude * wx * wy * (1.0 - wo);
        self.data[g.index(y2, x2, b2)] += magnitude * wx * wy * wo;
    }

    #[inline]
    pub fn at(&self, y: usize, x: usize, k: usize) -> f64 {
        self.data[self.geometry.index(y, x, k)]
    }

    /// All orientation bins of cell `(y, x)`.
    #[inline]
    pub fn cell(&self, y: usize, x: usize) -> &[f64] {
        let start = self.geometry.index(y, x, 0);
        &self.data[start..start + self.geometry.nb_bins]
    }

    /// Sum of every entry; equals the summed gradient magnitude of the image.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}
