//! Combining several grids into one: split-view previews and channel
//! merging.

use tracing::{debug, instrument};

use crate::error::{ensure_range, Result};
use crate::grid::{Channel, PixelGrid};
use crate::pointwise::component;

/// Show `processed` left of a vertical split and `original` right of it.
///
/// The split column is `width * percent / 100`, so 0 returns the original
/// and 100 returns the processed image.
///
/// # Errors
///
/// Returns `EngineError::InvalidRange` if `percent` is outside [0, 100] and
/// `EngineError::DimensionMismatch` if the two grids differ in size.
#[instrument(skip(original, processed), fields(width = original.width(), height = original.height()))]
pub fn split_view(original: &PixelGrid, processed: &PixelGrid, percent: i32) -> Result<PixelGrid> {
    ensure_range("split percentage", percent as i64, 0, 100)?;
    original.ensure_same_dimensions(processed)?;

    let width = original.width() as usize;
    let split_column = width * percent as usize / 100;
    debug!(split_column, "Composing split view");

    let row_len = width * 3;
    let split = split_column * 3;
    let mut output = Vec::with_capacity(original.pixels().len());
    if row_len > 0 {
        for (orig_row, proc_row) in original
            .pixels()
            .chunks_exact(row_len)
            .zip(processed.pixels().chunks_exact(row_len))
        {
            output.extend_from_slice(&proc_row[..split]);
            output.extend_from_slice(&orig_row[split..]);
        }
    }

    Ok(PixelGrid::from_buffer(
        original.width(),
        original.height(),
        output,
    ))
}

/// Merge three grids into one, taking red from `red`, green from `green` and
/// blue from `blue`.
///
/// This is the inverse of [`split_channels`].
///
/// # Errors
///
/// Returns `EngineError::DimensionMismatch` unless all three grids have the
/// same size.
#[instrument(skip_all, fields(width = red.width(), height = red.height()))]
pub fn combine_channels(red: &PixelGrid, green: &PixelGrid, blue: &PixelGrid) -> Result<PixelGrid> {
    red.ensure_same_dimensions(green)?;
    red.ensure_same_dimensions(blue)?;

    let mut output = Vec::with_capacity(red.pixels().len());
    for ((r, g), b) in red
        .iter_pixels()
        .zip(green.iter_pixels())
        .zip(blue.iter_pixels())
    {
        output.extend_from_slice(&[r[0], g[1], b[2]]);
    }

    Ok(PixelGrid::from_buffer(red.width(), red.height(), output))
}

/// The red, green and blue component views of `grid`.
pub fn split_channels(grid: &PixelGrid) -> [PixelGrid; 3] {
    Channel::ALL.map(|channel| component(grid, channel))
}
