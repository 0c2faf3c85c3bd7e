//! Validation errors raised before the descriptor core runs.

/// Reasons an input or parameter set is rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HogError {
    #[error("nb_bins must be > 0")]
    ZeroBins,

    #[error("cell width must be finite and > 0, got {0}")]
    InvalidCellWidth(f64),

    #[error("block size must be > 0")]
    ZeroBlockSize,

    #[error("clip value must be finite and > 0, got {0}")]
    InvalidClip(f64),

    #[error("expected a 2-D (grayscale) or 3-D (color) array, got {0} dimensions")]
    Dimensionality(usize),

    #[error("color images must have exactly 3 channels, got {0}")]
    ChannelCount(usize),

    #[error("array must be contiguous in column-major (Fortran) order")]
    NotColumnMajor,

    #[error("buffer holds {actual} samples, shape requires {expected}")]
    BufferLength { expected: usize, actual: usize },

    #[error("column stride {stride} is smaller than the image height {height}")]
    StrideTooSmall { stride: usize, height: usize },

    #[error("no block fits a {height}x{width} image with these parameters")]
    NoBlocks { height: usize, width: usize },

    #[error("histogram grid for a {height}x{width} image does not fit in memory")]
    GridTooLarge { height: usize, width: usize },

    #[error("output buffer holds {actual} values, descriptor needs {expected}")]
    OutputLength { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, HogError>;
