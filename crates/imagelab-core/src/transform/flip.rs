//! Horizontal and vertical mirroring.

use crate::grid::PixelGrid;

/// Mirror the image left-to-right.
pub fn flip_horizontal(grid: &PixelGrid) -> PixelGrid {
    let mut output = Vec::with_capacity(grid.pixels().len());
    let row_len = grid.width() as usize * 3;
    if row_len > 0 {
        for row in grid.pixels().chunks_exact(row_len) {
            for pixel in row.chunks_exact(3).rev() {
                output.extend_from_slice(pixel);
            }
        }
    }
    PixelGrid::from_buffer(grid.width(), grid.height(), output)
}

/// Mirror the image top-to-bottom.
pub fn flip_vertical(grid: &PixelGrid) -> PixelGrid {
    let mut output = Vec::with_capacity(grid.pixels().len());
    let row_len = grid.width() as usize * 3;
    if row_len > 0 {
        for row in grid.pixels().chunks_exact(row_len).rev() {
            output.extend_from_slice(row);
        }
    }
    PixelGrid::from_buffer(grid.width(), grid.height(), output)
}
