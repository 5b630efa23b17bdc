//! Imagelab Core - Image transformation engine
//!
//! This crate provides pure functions that derive new RGB images from old
//! ones: flips, tonal and colour adjustments, convolution filters, histogram
//! analysis, levels, split views, resampling and Haar wavelet compression.
//! Every operation takes an immutable [`PixelGrid`] and returns a new one.
//!
//! On top of the engine sit a serializable [`Operation`]/[`Recipe`] layer, a
//! named [`ImageStore`] for controllers, and a small [`codec`] adapter for
//! reading and writing PNG, JPEG and PPM files.

pub mod codec;
pub mod color_matrix;
pub mod compose;
pub mod convolution;
pub mod error;
pub mod grid;
pub mod histogram;
pub mod levels;
pub mod luminance;
pub mod operation;
pub mod pointwise;
pub mod store;
pub mod transform;
pub mod wavelet;

pub use color_matrix::{apply_color_matrix, sepia, ColorMatrix};
pub use compose::{combine_channels, split_channels, split_view};
pub use convolution::{blur, filter_by_kernel, sharpen, Kernel};
pub use error::{EngineError, Result};
pub use grid::{Channel, PixelGrid};
pub use histogram::{compute_histogram, correct_color, find_peak, render_histogram};
pub use levels::{adjust_levels, Levels, LevelsLut};
pub use operation::{Operation, Recipe};
pub use pointwise::{
    blue_component, brighten, green_component, intensity, luma, red_component, to_greyscale,
    value,
};
pub use store::ImageStore;
pub use transform::{downscale, flip_horizontal, flip_vertical};
pub use wavelet::{compress, WaveletCoefficients};

/// Histogram data for an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// Red channel histogram (256 bins)
    pub red: [u32; 256],
    /// Green channel histogram (256 bins)
    pub green: [u32; 256],
    /// Blue channel histogram (256 bins)
    pub blue: [u32; 256],
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
        }
    }
}

impl Histogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Bins of a single channel.
    pub fn channel(&self, channel: Channel) -> &[u32; 256] {
        match channel {
            Channel::Red => &self.red,
            Channel::Green => &self.green,
            Channel::Blue => &self.blue,
        }
    }

    /// Find the maximum value across all channels for normalization
    pub fn max_value(&self) -> u32 {
        let max_r = *self.red.iter().max().unwrap_or(&0);
        let max_g = *self.green.iter().max().unwrap_or(&0);
        let max_b = *self.blue.iter().max().unwrap_or(&0);
        max_r.max(max_g).max(max_b)
    }
}
