//! Lossy compression with the 2D Haar wavelet transform.
//!
//! # Pipeline
//!
//! 1. Split the grid into three real-valued channel planes, zero-padded to
//!    the next power of two on each axis independently.
//! 2. Forward 2D Haar transform of each plane.
//! 3. Zero every coefficient whose magnitude is below the cutoff.
//! 4. Inverse 2D Haar transform.
//! 5. Crop to the original size, clamp and truncate back to bytes.
//!
//! The transform is orthonormal, so all loss comes from step 3.

mod haar;

pub use haar::{haar_forward, haar_forward_2d, haar_inverse, haar_inverse_2d};

use tracing::{debug, instrument};

use crate::error::{ensure_range, Result};
use crate::grid::{clamp_channel_f64, Channel, PixelGrid};

/// A row-major matrix of real values holding one channel.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl Plane {
    /// Create a zero-filled plane.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            values: vec![0.0; width * height],
        }
    }

    pub(crate) fn from_values(width: usize, height: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// The values of row `y`.
    pub fn row(&self, y: usize) -> &[f64] {
        &self.values[y * self.width..(y + 1) * self.width]
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: f64) {
        self.values[y * self.width + x] = value;
    }
}

/// Smallest power of two that is `>= n`, with `n <= 1` giving 1.
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Haar coefficients for the three channels of a grid.
///
/// Remembers the original grid size so that [`reconstruct`](Self::reconstruct)
/// can crop the padding away.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletCoefficients {
    width: u32,
    height: u32,
    channels: [Plane; 3],
}

impl WaveletCoefficients {
    /// Pad and transform every channel of `grid`.
    pub fn forward(grid: &PixelGrid) -> Result<Self> {
        let padded_width = next_power_of_two(grid.width() as usize);
        let padded_height = next_power_of_two(grid.height() as usize);
        debug!(padded_width, padded_height, "Padding channels");

        let mut planes = [
            Plane::new(padded_width, padded_height),
            Plane::new(padded_width, padded_height),
            Plane::new(padded_width, padded_height),
        ];
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let pixel = grid.pixel(x, y);
                for (plane, value) in planes.iter_mut().zip(pixel) {
                    plane.set(x as usize, y as usize, value as f64);
                }
            }
        }

        let [red, green, blue] = planes;
        Ok(Self {
            width: grid.width(),
            height: grid.height(),
            channels: [
                haar_forward_2d(&red)?,
                haar_forward_2d(&green)?,
                haar_forward_2d(&blue)?,
            ],
        })
    }

    /// Zero every coefficient with `|c| < cutoff`.
    pub fn threshold(&mut self, cutoff: f64) {
        for plane in &mut self.channels {
            for value in &mut plane.values {
                if value.abs() < cutoff {
                    *value = 0.0;
                }
            }
        }
    }

    /// Number of coefficients that are not zero, across all channels.
    pub fn nonzero_count(&self) -> usize {
        self.channels
            .iter()
            .flat_map(|plane| plane.values())
            .filter(|value| **value != 0.0)
            .count()
    }

    /// Coefficients of one channel.
    pub fn plane(&self, channel: Channel) -> &Plane {
        &self.channels[channel.index()]
    }

    /// Invert the transform and crop back to the original size.
    pub fn reconstruct(&self) -> Result<PixelGrid> {
        let [red, green, blue] = [
            haar_inverse_2d(&self.channels[0])?,
            haar_inverse_2d(&self.channels[1])?,
            haar_inverse_2d(&self.channels[2])?,
        ];
        Ok(PixelGrid::from_fn(self.width, self.height, |x, y| {
            let (x, y) = (x as usize, y as usize);
            [
                clamp_channel_f64(red.get(x, y)),
                clamp_channel_f64(green.get(x, y)),
                clamp_channel_f64(blue.get(x, y)),
            ]
        }))
    }
}

/// Compress `grid` by discarding Haar coefficients smaller than `percentage`.
///
/// The percentage is used directly as an absolute magnitude cutoff in the
/// transform domain. It is not a fraction of coefficients removed.
///
/// # Errors
///
/// Returns `EngineError::InvalidRange` if `percentage` is outside [0, 100].
#[instrument(skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn compress(grid: &PixelGrid, percentage: i32) -> Result<PixelGrid> {
    ensure_range("percentage", percentage as i64, 0, 100)?;
    if grid.is_empty() {
        return Ok(grid.clone());
    }

    let mut coefficients = WaveletCoefficients::forward(grid)?;
    let before = coefficients.nonzero_count();
    coefficients.threshold(percentage as f64);
    debug!(
        before,
        after = coefficients.nonzero_count(),
        "Thresholded coefficients"
    );
    coefficients.reconstruct()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use proptest::prelude::*;

    fn create_test_image(width: u32, height: u32) -> PixelGrid {
        PixelGrid::from_fn(width, height, |x, y| {
            [
                ((x * 37 + y * 11) % 256) as u8,
                ((x * 5 + y * 53) % 256) as u8,
                ((x * y * 7) % 256) as u8,
            ]
        })
    }

    fn max_channel_diff(a: &PixelGrid, b: &PixelGrid) -> i32 {
        a.pixels()
            .iter()
            .zip(b.pixels())
            .map(|(x, y)| (*x as i32 - *y as i32).abs())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_next_power_of_two() {
        assert_eq!(next_power_of_two(0), 1);
        assert_eq!(next_power_of_two(1), 1);
        assert_eq!(next_power_of_two(2), 2);
        assert_eq!(next_power_of_two(3), 4);
        assert_eq!(next_power_of_two(100), 128);
        assert_eq!(next_power_of_two(256), 256);
    }

    #[test]
    fn test_forward_pads_each_axis() {
        let coefficients = WaveletCoefficients::forward(&create_test_image(5, 3)).unwrap();
        let plane = coefficients.plane(Channel::Red);
        assert_eq!((plane.width(), plane.height()), (8, 4));
    }

    #[test]
    fn test_constant_image_single_coefficient() {
        let coefficients =
            WaveletCoefficients::forward(&PixelGrid::filled(4, 4, [10, 20, 30])).unwrap();
        assert_eq!(coefficients.nonzero_count(), 3);
        // Sum of 16 values of 10, scaled by 1/sqrt(16)
        assert!((coefficients.plane(Channel::Red).get(0, 0) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_compress_zero_round_trip() {
        let img = create_test_image(13, 7);
        let out = compress(&img, 0).unwrap();
        assert_eq!(out.dimensions(), img.dimensions());
        assert!(max_channel_diff(&img, &out) <= 1);
    }

    #[test]
    fn test_compress_invalid_percentage() {
        let img = create_test_image(4, 4);
        assert!(matches!(
            compress(&img, -1),
            Err(EngineError::InvalidRange {
                name: "percentage",
                ..
            })
        ));
        assert!(compress(&img, 101).is_err());
    }

    #[test]
    fn test_compress_full_strength_flattens_detail() {
        // Alternating columns only produce small detail coefficients
        let img = PixelGrid::from_fn(8, 8, |x, _| if x % 2 == 0 { [120; 3] } else { [124; 3] });
        let out = compress(&img, 100).unwrap();
        let first = out.pixel(0, 0);
        assert!(out.iter_pixels().all(|p| p == first));
    }

    #[test]
    fn test_compress_empty_grid() {
        let img = PixelGrid::new(0, 0);
        assert_eq!(compress(&img, 50).unwrap(), img);
    }

    #[test]
    fn test_threshold_cutoff() {
        let mut coefficients =
            WaveletCoefficients::forward(&PixelGrid::filled(4, 4, [10, 10, 10])).unwrap();
        // The only nonzero coefficient per channel is 40
        coefficients.threshold(39.5);
        assert_eq!(coefficients.nonzero_count(), 3);
        coefficients.threshold(40.5);
        assert_eq!(coefficients.nonzero_count(), 0);
    }

    proptest! {
        /// Property: without thresholding the round trip is within one level.
        #[test]
        fn prop_zero_percentage_round_trip((w, h) in (1u32..=20, 1u32..=20)) {
            let img = create_test_image(w, h);
            let out = compress(&img, 0).unwrap();
            prop_assert!(max_channel_diff(&img, &out) <= 1);
        }

        /// Property: a higher cutoff never leaves more nonzero coefficients.
        #[test]
        fn prop_threshold_monotonic(
            (w, h) in (1u32..=16, 1u32..=16),
            low in 0i32..=100,
            extra in 0i32..=100,
        ) {
            let high = (low + extra).min(100);
            let base = WaveletCoefficients::forward(&create_test_image(w, h)).unwrap();

            let mut weak = base.clone();
            weak.threshold(low as f64);
            let mut strong = base;
            strong.threshold(high as f64);

            prop_assert!(strong.nonzero_count() <= weak.nonzero_count());
        }
    }
}
