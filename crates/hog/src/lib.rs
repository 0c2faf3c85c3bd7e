//! Validated HOG descriptor extraction.
//!
//! This crate wraps [`hog_core`] with the boundary checks the core relies on:
//! parameter positivity, array shape and layout, buffer and output lengths,
//! and a histogram grid that fits in memory.
//! Every check runs before the core is invoked, so a call either fails with a
//! [`HogError`] or produces a complete descriptor.
//!
//! Host adapters:
//! - [`extract`] – plain column-major `f64` buffers with an explicit shape.
//! - `array` (feature `ndarray`) – Fortran-ordered `ndarray` views.
//! - `image` (feature `image`) – `image::ImageBuffer` and `DynamicImage`.
//!
//! The `app` module (feature `image`) holds the JSON config and I/O helpers
//! behind the `hog-dump` binary.

pub use hog_core::*;

pub mod error;
pub mod extract;

#[cfg(feature = "ndarray")]
pub mod array;

#[cfg(feature = "image")]
pub mod app;
#[cfg(feature = "image")]
pub mod image;

pub use crate::error::HogError;
pub use crate::extract::{descriptor_len, extract, extract_into, validate_params};

#[cfg(feature = "ndarray")]
pub use crate::array::extract_array;
#[cfg(feature = "image")]
pub use crate::image::{hog_dynamic_image, hog_image, ColorMode};
