//! Per-pixel transforms.
//!
//! Every function here looks at one source pixel at a time and returns a new
//! grid of the same size. Greyscale variants replicate a single scalar into
//! all three output channels.

use crate::color_matrix::{apply_color_matrix, ColorMatrix};
use crate::grid::{clamp_channel, Channel, PixelGrid};
use crate::luminance::calculate_luminance_u8;

/// Add `delta` to every channel of every pixel, saturating at 0 and 255.
///
/// A negative `delta` darkens the image.
pub fn brighten(grid: &PixelGrid, delta: i32) -> PixelGrid {
    grid.map_pixels(|[r, g, b]| {
        [
            clamp_channel(r as i32 + delta),
            clamp_channel(g as i32 + delta),
            clamp_channel(b as i32 + delta),
        ]
    })
}

/// Convert to greyscale using BT.601 luminance, truncated.
pub fn to_greyscale(grid: &PixelGrid) -> PixelGrid {
    grid.map_pixels(|[r, g, b]| {
        let grey = calculate_luminance_u8(r, g, b);
        [grey, grey, grey]
    })
}

/// Greyscale view of `max(R, G, B)`.
pub fn value(grid: &PixelGrid) -> PixelGrid {
    grid.map_pixels(|[r, g, b]| {
        let v = r.max(g).max(b);
        [v, v, v]
    })
}

/// Greyscale view of the channel mean, `floor((R + G + B) / 3)`.
pub fn intensity(grid: &PixelGrid) -> PixelGrid {
    grid.map_pixels(|[r, g, b]| {
        let i = ((r as u16 + g as u16 + b as u16) / 3) as u8;
        [i, i, i]
    })
}

/// Greyscale view of BT.601 luma, computed through the luma colour matrix.
pub fn luma(grid: &PixelGrid) -> PixelGrid {
    apply_color_matrix(grid, &ColorMatrix::LUMA)
}

/// Greyscale view of a single channel: every output channel equals
/// `input[channel]`.
pub fn component(grid: &PixelGrid, channel: Channel) -> PixelGrid {
    let c = channel.index();
    grid.map_pixels(|p| [p[c], p[c], p[c]])
}

pub fn red_component(grid: &PixelGrid) -> PixelGrid {
    component(grid, Channel::Red)
}

pub fn green_component(grid: &PixelGrid) -> PixelGrid {
    component(grid, Channel::Green)
}

pub fn blue_component(grid: &PixelGrid) -> PixelGrid {
    component(grid, Channel::Blue)
}
