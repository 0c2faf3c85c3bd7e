//! Boundary validation between host buffers and the descriptor core.
//!
//! Everything here runs before the core touches a pixel or an output value:
//! parameters are checked for positivity, shapes for dimensionality and
//! channel count, buffers for length, and the geometry for a grid that fits
//! in memory with at least one interior block. Once a call gets past validation the core cannot fail.

use crate::error::{HogError, Result};
use hog_core::{compute_hog_into, Channels, HistGeometry, HogParams, PixelView};
use tracing::debug;

/// Reject parameters outside the descriptor's domain.
pub fn validate_params(params: &HogParams) -> Result<()> {
    if params.nb_bins == 0 {
        return Err(HogError::ZeroBins);
    }
    if !(params.cell_width.is_finite() && params.cell_width > 0.0) {
        return Err(HogError::InvalidCellWidth(params.cell_width));
    }
    if params.block_size == 0 {
        return Err(HogError::ZeroBlockSize);
    }
    if !(params.clip_val.is_finite() && params.clip_val > 0.0) {
        return Err(HogError::InvalidClip(params.clip_val));
    }
    Ok(())
}

/// Height, width and channel layout described by a `[H, W]` or `[H, W, 3]` shape.
pub fn shape_layout(shape: &[usize]) -> Result<(usize, usize, Channels)> {
    match *shape {
        [h, w] => Ok((h, w, Channels::Gray)),
        [h, w, 3] => Ok((h, w, Channels::Rgb)),
        [_, _, c] => Err(HogError::ChannelCount(c)),
        _ => Err(HogError::Dimensionality(shape.len())),
    }
}

/// Densely packed column-major view over `data` with the given shape.
///
/// Element strides follow from the shape: `H` between columns and `H · W`
/// between color planes.
pub fn column_major_view<'a>(data: &'a [f64], shape: &[usize]) -> Result<PixelView<'a>> {
    let (h, w, channels) = shape_layout(shape)?;
    let expected = shape.iter().try_fold(1usize, |acc, &d| acc.checked_mul(d));
    let expected = expected.unwrap_or(usize::MAX);
    if data.len() != expected {
        return Err(HogError::BufferLength {
            expected,
            actual: data.len(),
        });
    }
    PixelView::from_column_major(data, h, w, channels).ok_or(HogError::BufferLength {
        expected,
        actual: data.len(),
    })
}

/// View over a column-major buffer with explicit element strides.
///
/// `channel_stride` is ignored for grayscale.
pub fn strided_view(
    data: &[f64],
    height: usize,
    width: usize,
    stride: usize,
    channel_stride: usize,
    channels: Channels,
) -> Result<PixelView<'_>> {
    if stride < height {
        return Err(HogError::StrideTooSmall { stride, height });
    }
    let view = match channels {
        Channels::Gray => PixelView::gray(data, height, width, stride),
        Channels::Rgb => PixelView::rgb(data, height, width, stride, channel_stride),
    };
    view.ok_or_else(|| {
        let channel_stride = if channels == Channels::Rgb { channel_stride } else { 0 };
        HogError::BufferLength {
            expected: PixelView::extent(height, width, stride, channel_stride, channels)
                .unwrap_or(usize::MAX),
            actual: data.len(),
        }
    })
}

/// Descriptor length, rejecting grids that do not fit in memory and
/// geometry without a single interior block.
fn checked_len(height: usize, width: usize, params: &HogParams) -> Result<usize> {
    let geometry = HistGeometry::checked(height, width, params)
        .ok_or(HogError::GridTooLarge { height, width })?;
    match geometry.feature_count() {
        0 => Err(HogError::NoBlocks { height, width }),
        n => Ok(n),
    }
}

/// Descriptor length for an array of the given shape.
pub fn descriptor_len(shape: &[usize], params: &HogParams) -> Result<usize> {
    validate_params(params)?;
    let (h, w, _) = shape_layout(shape)?;
    checked_len(h, w, params)
}

/// Validate a densely packed column-major buffer and compute its descriptor.
pub fn extract(data: &[f64], shape: &[usize], params: &HogParams) -> Result<Vec<f64>> {
    validate_params(params)?;
    let view = column_major_view(data, shape)?;
    let len = checked_len(view.height(), view.width(), params)?;
    debug!(height = view.height(), width = view.width(), len, "extracting descriptor");

    let mut out = vec![0.0; len];
    compute_hog_into(&view, params, &mut out);
    Ok(out)
}

/// Compute the descriptor of `view` into a caller-sized buffer.
///
/// `out` is left untouched when validation fails.
pub fn extract_into(view: &PixelView<'_>, params: &HogParams, out: &mut [f64]) -> Result<()> {
    validate_params(params)?;
    let expected = checked_len(view.height(), view.width(), params)?;
    if out.len() != expected {
        return Err(HogError::OutputLength {
            expected,
            actual: out.len(),
        });
    }
    compute_hog_into(view, params, out);
    Ok(())
}
