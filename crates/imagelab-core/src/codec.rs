//! Reading and writing image files.
//!
//! This is the only part of the crate that touches the file system. Decoding
//! uses the `image` crate with the PNG, JPEG and PNM (PPM) codecs enabled;
//! every decoded image is flattened to 8-bit RGB, so alpha is dropped.

use std::io::Cursor;
use std::path::Path;

use image::ImageFormat;
use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::grid::PixelGrid;

/// Decode an in-memory PNG, JPEG or PPM file.
///
/// The format is detected from the leading bytes.
///
/// # Errors
///
/// Returns `EngineError::Codec` if the bytes are not a supported image.
pub fn decode(bytes: &[u8]) -> Result<PixelGrid> {
    let img = image::load_from_memory(bytes)?;
    debug!(width = img.width(), height = img.height(), "Decoded image");
    Ok(PixelGrid::from_rgb_image(img.into_rgb8()))
}

/// Read and decode an image file.
///
/// # Errors
///
/// Returns `EngineError::Io` if the file cannot be read and
/// `EngineError::Codec` if it cannot be decoded.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<PixelGrid> {
    let bytes = std::fs::read(path.as_ref())?;
    let grid = decode(&bytes)?;
    info!(width = grid.width(), height = grid.height(), "Loaded image");
    Ok(grid)
}

/// Encode `grid` in the given format.
///
/// # Errors
///
/// Returns `EngineError::Codec` if the encoder rejects the image, for example
/// a zero-sized grid or a format whose codec is not enabled.
pub fn encode(grid: &PixelGrid, format: ImageFormat) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    grid.to_rgb_image().write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}

/// Encode `grid` and write it to `path`, picking the format from the file
/// extension.
///
/// # Errors
///
/// Returns `EngineError::Codec` for an unknown extension or encoder failure
/// and `EngineError::Io` if the file cannot be written.
#[instrument(skip_all, fields(path = %path.as_ref().display(), width = grid.width(), height = grid.height()))]
pub fn save(path: impl AsRef<Path>, grid: &PixelGrid) -> Result<()> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    let bytes = encode(grid, format)?;
    std::fs::write(path, &bytes)?;
    info!(bytes = bytes.len(), "Saved image");
    Ok(())
}
