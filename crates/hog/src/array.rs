//! Descriptor extraction for `ndarray` views.
//!
//! Arrays are indexed `[y, x]` for grayscale or `[y, x, c]` for color and must
//! be contiguous in column-major (Fortran) order, which is how the core walks
//! memory. Element type and alignment are guaranteed by `ArrayView<f64, _>`.

use crate::error::{HogError, Result};
use crate::extract::{extract, shape_layout};
use hog_core::HogParams;
use ndarray::{Array1, ArrayView, Dimension};

/// True if `arr` occupies one contiguous column-major block of memory.
pub fn is_column_major<D: Dimension>(arr: &ArrayView<'_, f64, D>) -> bool {
    arr.view().reversed_axes().is_standard_layout()
}

/// Validate `arr` and compute its HOG descriptor.
pub fn extract_array<D: Dimension>(arr: ArrayView<'_, f64, D>, params: &HogParams) -> Result<Array1<f64>> {
    shape_layout(arr.shape())?;
    if !is_column_major(&arr) {
        return Err(HogError::NotColumnMajor);
    }
    let data = arr.as_slice_memory_order().ok_or(HogError::NotColumnMajor)?;
    let features = extract(data, arr.shape(), params)?;
    Ok(Array1::from_vec(features))
}
