//! Linear 3x3 colour transforms (sepia, luma).

use serde::{Deserialize, Serialize};

use crate::grid::{clamp_channel_f64, PixelGrid};
use crate::luminance::{LUMINANCE_B, LUMINANCE_G, LUMINANCE_R};

/// A 3x3 matrix mapping input (R, G, B) to output (R, G, B).
///
/// Row `i` holds the weights that produce output channel `i`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorMatrix(pub [[f64; 3]; 3]);

impl ColorMatrix {
    /// Classic sepia tone.
    pub const SEPIA: ColorMatrix = ColorMatrix([
        [0.393, 0.769, 0.189],
        [0.349, 0.686, 0.168],
        [0.272, 0.534, 0.131],
    ]);

    /// BT.601 luma on every output channel.
    pub const LUMA: ColorMatrix = ColorMatrix([
        [LUMINANCE_R, LUMINANCE_G, LUMINANCE_B],
        [LUMINANCE_R, LUMINANCE_G, LUMINANCE_B],
        [LUMINANCE_R, LUMINANCE_G, LUMINANCE_B],
    ]);

    pub const IDENTITY: ColorMatrix = ColorMatrix([
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
    ]);

    /// Transform one pixel, clamping and truncating each output channel.
    #[inline]
    pub fn transform(&self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        let (r, g, b) = (r as f64, g as f64, b as f64);
        let m = &self.0;
        [
            clamp_channel_f64(m[0][0] * r + m[0][1] * g + m[0][2] * b),
            clamp_channel_f64(m[1][0] * r + m[1][1] * g + m[1][2] * b),
            clamp_channel_f64(m[2][0] * r + m[2][1] * g + m[2][2] * b),
        ]
    }
}

/// Apply `matrix` to every pixel of `grid`.
pub fn apply_color_matrix(grid: &PixelGrid, matrix: &ColorMatrix) -> PixelGrid {
    grid.map_pixels(|p| matrix.transform(p))
}

/// Sepia-tone the image.
pub fn sepia(grid: &PixelGrid) -> PixelGrid {
    apply_color_matrix(grid, &ColorMatrix::SEPIA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix() {
        let grid = PixelGrid::from_fn(8, 8, |x, y| [(x * 30) as u8, (y * 30) as u8, 200]);
        assert_eq!(apply_color_matrix(&grid, &ColorMatrix::IDENTITY), grid);
    }

    #[test]
    fn test_sepia_white_saturates() {
        let grid = PixelGrid::filled(1, 1, [255, 255, 255]);
        // Rows sum to 1.351, 1.203 and 0.937
        assert_eq!(sepia(&grid).pixel(0, 0), [255, 255, 238]);
    }

    #[test]
    fn test_sepia_mid_grey() {
        let grid = PixelGrid::filled(1, 1, [100, 100, 100]);
        // 135.1, 120.3, 93.7 truncated
        assert_eq!(sepia(&grid).pixel(0, 0), [135, 120, 93]);
    }

    #[test]
    fn test_negative_weights_clamp_to_zero() {
        let invert = ColorMatrix([[-1.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, -1.0]]);
        let grid = PixelGrid::filled(2, 2, [10, 20, 30]);
        assert_eq!(
            apply_color_matrix(&grid, &invert),
            PixelGrid::filled(2, 2, [0, 0, 0])
        );
    }

    #[test]
    fn test_luma_red() {
        assert_eq!(ColorMatrix::LUMA.transform([255, 0, 0]), [76, 76, 76]);
    }
}
