//! The in-memory RGB pixel grid shared by every engine operation.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// One of the three colour channels of a pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    /// All channels in storage order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Byte offset of this channel inside a pixel.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A rectangular RGB image.
///
/// Pixels are stored row-major, 3 bytes per pixel, so every channel value is
/// in [0, 255] by construction. Engine operations never mutate a grid they
/// are handed; each returns a freshly allocated one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl PixelGrid {
    /// Create a black grid of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; buffer_len(width, height)],
        }
    }

    /// Wrap an existing RGB buffer.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::BufferSize` if `pixels.len() != width * height * 3`.
    pub fn from_raw(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height);
        if pixels.len() != expected {
            return Err(EngineError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Wrap a buffer produced by an engine operation.
    pub(crate) fn from_buffer(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            buffer_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a grid filled with a single colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        Self::from_fn(width, height, |_, _| rgb)
    }

    /// Build a grid by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(buffer_len(width, height));
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a PixelGrid from an image::RgbImage.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img.into_raw();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert to an image::RgbImage for encoding or drawing.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| image::Rgb(self.pixel(x, y)))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGB bytes in row-major order.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Consume the grid and return its RGB bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.pixels
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Check if this grid has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Read the pixel at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let idx = self.offset(x, y);
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Overwrite the pixel at column `x`, row `y`.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Iterate over pixels in row-major order.
    pub fn iter_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.pixels.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }

    /// Produce a new grid of the same size by mapping every pixel.
    pub fn map_pixels(&self, mut f: impl FnMut([u8; 3]) -> [u8; 3]) -> Self {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for p in self.iter_pixels() {
            pixels.extend_from_slice(&f(p));
        }
        Self {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Fail with `DimensionMismatch` unless `other` has the same size.
    pub fn ensure_same_dimensions(&self, other: &PixelGrid) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(EngineError::DimensionMismatch {
                expected: self.dimensions(),
                actual: other.dimensions(),
            });
        }
        Ok(())
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} grid",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 3
    }
}

/// Saturate an integer into a channel value.
#[inline]
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Saturate a real value into a channel value, truncating toward zero.
#[inline]
pub fn clamp_channel_f64(value: f64) -> u8 {
    // `as` truncates toward zero and maps NaN to 0
    value.clamp(0.0, 255.0) as u8
}

fn buffer_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * 3
}
