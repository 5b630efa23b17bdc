//! Error types for engine operations.

use thiserror::Error;

/// Errors reported by engine operations.
///
/// Every operation validates its inputs before touching any pixel, so an
/// error always means no output was produced.
#[derive(Debug, Error)]
pub enum EngineError {
    /// No image is held under the requested name.
    #[error("No image named '{0}'")]
    MissingImage(String),

    /// A scalar parameter is outside its documented bound.
    #[error("{name} must be between {min} and {max}, got {value}")]
    InvalidRange {
        name: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Levels anchors are not in black <= mid <= white order.
    #[error("Level points must satisfy black <= mid <= white, got {black}/{mid}/{white}")]
    InvalidLevelOrder { black: i32, mid: i32, white: i32 },

    /// Two images that must be combined have different sizes.
    #[error("Image dimensions differ: {expected:?} vs {actual:?}")]
    DimensionMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    /// A raw pixel buffer does not match its declared dimensions.
    #[error("Pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    /// A convolution kernel is not an odd-sized square.
    #[error("Invalid kernel: {0}")]
    InvalidKernel(String),

    /// A Haar transform was asked to work on a length that is not a power of two.
    #[error("Sequence length {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// The codec layer failed to decode or encode an image.
    #[error("Codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// I/O error while reading or writing an image file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Build an [`EngineError::InvalidRange`] for an integer parameter.
    pub(crate) fn out_of_range(name: &'static str, value: i64, min: i64, max: i64) -> Self {
        EngineError::InvalidRange {
            name,
            value,
            min,
            max,
        }
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Check that `value` lies in `min..=max`.
pub(crate) fn ensure_range(name: &'static str, value: i64, min: i64, max: i64) -> Result<()> {
    if value < min || value > max {
        return Err(EngineError::out_of_range(name, value, min, max));
    }
    Ok(())
}
