//! Geometric transforms: mirroring and resampling.
//!
//! # Coordinate System
//!
//! - `x` is the column, `y` is the row
//! - Origin is top-left corner
//! - Every transform returns a new grid; the source is left untouched

mod downscale;
mod flip;

pub use downscale::downscale;
pub use flip::{flip_horizontal, flip_vertical};
