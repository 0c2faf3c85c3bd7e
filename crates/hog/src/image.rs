//! Descriptor helpers for `image` buffers.
//!
//! `image` stores pixels row-major with interleaved channels, so samples are
//! transposed into column-major channel planes before reaching the core.

use crate::error::{HogError, Result};
use crate::extract::extract;
use hog_core::HogParams;
use image::{DynamicImage, ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};
use std::{ops::Deref, str::FromStr};

/// How a decoded image is fed to the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Single luminance channel.
    #[default]
    Gray,
    /// Three color channels; the strongest gradient wins per pixel.
    Rgb,
}

impl FromStr for ColorMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gray" | "grey" | "luma" => Ok(ColorMode::Gray),
            "rgb" | "color" | "colour" => Ok(ColorMode::Rgb),
            other => Err(format!("invalid color mode '{other}', expected gray|rgb")),
        }
    }
}

/// Copy `img` into column-major channel planes without rescaling samples.
pub fn to_column_major<P, C>(img: &ImageBuffer<P, C>) -> Vec<f64>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
    C: Deref<Target = [P::Subpixel]>,
{
    let h = img.height() as usize;
    let w = img.width() as usize;
    let planes = P::CHANNEL_COUNT as usize;
    let mut out = vec![0.0; h * w * planes];
    for (x, y, p) in img.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        for (c, &s) in p.channels().iter().enumerate() {
            out[y + x * h + c * h * w] = s.into();
        }
    }
    out
}

/// HOG descriptor of a 1-channel (grayscale) or 3-channel (color) image.
pub fn hog_image<P, C>(img: &ImageBuffer<P, C>, params: &HogParams) -> Result<Vec<f64>>
where
    P: Pixel,
    P::Subpixel: Into<f64>,
    C: Deref<Target = [P::Subpixel]>,
{
    let h = img.height() as usize;
    let w = img.width() as usize;
    let shape = match P::CHANNEL_COUNT {
        1 => vec![h, w],
        3 => vec![h, w, 3],
        n => return Err(HogError::ChannelCount(n as usize)),
    };
    let data = to_column_major(img);
    extract(&data, &shape, params)
}

/// Column-major samples of a decoded image, scaled to `[0, 1]`, with their shape.
pub fn column_major_samples(img: &DynamicImage, mode: ColorMode) -> (Vec<f64>, Vec<usize>) {
    let h = img.height() as usize;
    let w = img.width() as usize;
    match mode {
        ColorMode::Gray => (to_column_major(&img.to_luma32f()), vec![h, w]),
        ColorMode::Rgb => (to_column_major(&img.to_rgb32f()), vec![h, w, 3]),
    }
}

/// HOG descriptor of a decoded image, using samples scaled to `[0, 1]`.
pub fn hog_dynamic_image(img: &DynamicImage, mode: ColorMode, params: &HogParams) -> Result<Vec<f64>> {
    match mode {
        ColorMode::Gray => hog_image(&img.to_luma32f(), params),
        ColorMode::Rgb => hog_image(&img.to_rgb32f(), params),
    }
}
