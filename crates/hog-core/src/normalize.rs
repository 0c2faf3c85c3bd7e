//! Overlapping block normalization (L2, clip, L2).
use crate::histogram::HistogramGrid;
#[cfg(feature = "rayon")]
use rayon::prelude::*;
#[cfg(feature = "tracing")]
use tracing::instrument;

/// Normalize every interior block of `hist` into `out`.
///
/// Blocks are emitted with the horizontal position in the outer loop and the
/// vertical one in the inner loop; each block is written as rows, then
/// columns, then bins. A block without energy is written as zeros.
///
/// # Panics
///
/// If `out.len()` differs from `hist.geometry.feature_count()`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(hist, out), fields(blocks = hist.geometry.blocks_across() * hist.geometry.blocks_down()))
)]
pub fn normalize_blocks(hist: &HistogramGrid, clip_val: f64, out: &mut [f64]) {
    let geometry = hist.geometry;
    assert_eq!(
        out.len(),
        geometry.feature_count(),
        "output buffer must hold exactly one descriptor"
    );

    let block_len = geometry.block_len();
    let blocks_down = geometry.blocks_down();
    if block_len == 0 || blocks_down == 0 {
        return;
    }

    let run = |(n, block): (usize, &mut [f64])| {
        let bx = 1 + n / blocks_down;
        let by = 1 + n % blocks_down;
        normalize_block(hist, bx, by, clip_val, block);
    };

    #[cfg(feature = "rayon")]
    out.par_chunks_mut(block_len).enumerate().for_each(run);

    #[cfg(not(feature = "rayon"))]
    out.chunks_mut(block_len).enumerate().for_each(run);
}

/// Normalize the block whose top-left cell is `(by, bx)` into `block`.
///
/// `block` doubles as the working buffer for the clipped values.
pub fn normalize_block(hist: &HistogramGrid, bx: usize, by: usize, clip_val: f64, block: &mut [f64]) {
    let bs = hist.geometry.block_size;
    let nb = hist.geometry.nb_bins;

    let mut norm = 0.0f64;
    for i in 0..bs {
        for j in 0..bs {
            for &v in hist.cell(by + i, bx + j) {
                norm += v * v;
            }
        }
    }
    let norm = norm.sqrt();

    // textureless (or non-finite) block
    if norm.is_nan() || norm <= 0.0 {
        block.fill(0.0);
        return;
    }

    let mut clipped_norm = 0.0f64;
    for i in 0..bs {
        for j in 0..bs {
            let dst = &mut block[(i * bs + j) * nb..(i * bs + j + 1) * nb];
            for (d, &v) in dst.iter_mut().zip(hist.cell(by + i, bx + j)) {
                *d = (v / norm).min(clip_val);
                clipped_norm += *d * *d;
            }
        }
    }
    let clipped_norm = clipped_norm.sqrt();

    for v in block.iter_mut() {
        *v /= clipped_norm;
    }
}
