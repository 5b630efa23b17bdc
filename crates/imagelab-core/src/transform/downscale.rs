//! Bilinear resampling to an exact size.
//!
//! # Algorithm
//!
//! Each destination pixel is mapped back into the source through the
//! width/height ratios. The four surrounding source pixels are blended along
//! the vertical axis first, then along the horizontal axis:
//!
//! ```text
//! c1  = p(x1, y1) + (p(x1, y2) - p(x1, y1)) * dy
//! c2  = p(x2, y1) + (p(x2, y2) - p(x2, y1)) * dy
//! out = c1 + (c2 - c1) * dx
//! ```
//!
//! Written this way, equal neighbours blend to exactly their own value, so
//! truncation never drops a uniform region by one level.
//!
//! `x2`/`y2` are clamped to the last column/row so edge pixels sample
//! themselves. The result is truncated toward zero.

use tracing::{debug, instrument};

use crate::error::{EngineError, Result};
use crate::grid::{clamp_channel_f64, PixelGrid};

/// Resample `grid` to `new_width` x `new_height` with bilinear interpolation.
///
/// # Errors
///
/// Returns `EngineError::InvalidRange` if either target dimension is zero.
#[instrument(skip(grid), fields(width = grid.width(), height = grid.height()))]
pub fn downscale(grid: &PixelGrid, new_width: u32, new_height: u32) -> Result<PixelGrid> {
    if new_width == 0 {
        return Err(EngineError::out_of_range("width", 0, 1, u32::MAX as i64));
    }
    if new_height == 0 {
        return Err(EngineError::out_of_range("height", 0, 1, u32::MAX as i64));
    }
    if grid.is_empty() {
        return Err(EngineError::out_of_range(
            "source width/height",
            0,
            1,
            u32::MAX as i64,
        ));
    }

    // Fast path: if dimensions match, just clone
    if grid.dimensions() == (new_width, new_height) {
        return Ok(grid.clone());
    }

    let (src_w, src_h) = (grid.width(), grid.height());
    let x_ratio = src_w as f64 / new_width as f64;
    let y_ratio = src_h as f64 / new_height as f64;

    let mut output = Vec::with_capacity(new_width as usize * new_height as usize * 3);
    for row in 0..new_height {
        let src_y = row as f64 * y_ratio;
        let y1 = (src_y.floor() as u32).min(src_h - 1);
        let y2 = (y1 + 1).min(src_h - 1);
        let dy = src_y - y1 as f64;

        for col in 0..new_width {
            let src_x = col as f64 * x_ratio;
            let x1 = (src_x.floor() as u32).min(src_w - 1);
            let x2 = (x1 + 1).min(src_w - 1);
            let dx = src_x - x1 as f64;

            let c11 = grid.pixel(x1, y1);
            let c12 = grid.pixel(x1, y2);
            let c21 = grid.pixel(x2, y1);
            let c22 = grid.pixel(x2, y2);

            for c in 0..3 {
                let c1 = lerp(c11[c], c12[c], dy);
                let c2 = lerp(c21[c], c22[c], dy);
                output.push(clamp_channel_f64(c1 + (c2 - c1) * dx));
            }
        }
    }

    debug!(new_width, new_height, "Resample complete");
    Ok(PixelGrid::from_buffer(new_width, new_height, output))
}

#[inline]
fn lerp(a: u8, b: u8, t: f64) -> f64 {
    a as f64 + (b as f64 - a as f64) * t
}
