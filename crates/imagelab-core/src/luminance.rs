//! Luminance calculation using ITU-R BT.601 coefficients.
//!
//! Shared by the greyscale conversion, the luma component view and the luma
//! colour matrix so that all three produce identical values.

/// ITU-R BT.601 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f64 = 0.299;

/// ITU-R BT.601 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f64 = 0.587;

/// ITU-R BT.601 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f64 = 0.114;

/// Weighted luminance of an RGB triple, before truncation.
#[inline]
pub fn calculate_luminance(r: u8, g: u8, b: u8) -> f64 {
    r as f64 * LUMINANCE_R + g as f64 * LUMINANCE_G + b as f64 * LUMINANCE_B
}

/// Calculate luminance from u8 RGB values, truncated toward zero.
///
/// # Arguments
/// * `r` - Red channel value (0-255)
/// * `g` - Green channel value (0-255)
/// * `b` - Blue channel value (0-255)
///
/// # Returns
/// Luminance value (0-255)
#[inline]
pub fn calculate_luminance_u8(r: u8, g: u8, b: u8) -> u8 {
    calculate_luminance(r, g, b).clamp(0.0, 255.0) as u8
}
