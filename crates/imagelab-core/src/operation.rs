//! Serializable edit operations and recipes.
//!
//! An [`Operation`] names one engine transform together with its typed
//! parameters. Operations serialize as tagged JSON objects, e.g.
//! `{"op":"levels","black":10,"mid":128,"white":245}`, so an edit pipeline can
//! be stored and replayed as a [`Recipe`].

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::color_matrix::sepia;
use crate::compose::split_view;
use crate::convolution::{blur, sharpen};
use crate::error::{ensure_range, EngineError, Result};
use crate::grid::PixelGrid;
use crate::histogram::{correct_color, render_histogram, HISTOGRAM_SIZE};
use crate::levels::adjust_levels;
use crate::pointwise::{
    blue_component, brighten, green_component, intensity, luma, red_component, to_greyscale,
    value,
};
use crate::transform::{downscale, flip_horizontal, flip_vertical};
use crate::wavelet::compress;

/// A single image transform with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case")]
pub enum Operation {
    FlipHorizontal,
    FlipVertical,
    Brighten {
        delta: i32,
    },
    Greyscale,
    Value,
    Intensity,
    Luma,
    RedComponent,
    GreenComponent,
    BlueComponent,
    Sepia,
    Blur,
    Sharpen,
    ColorCorrect,
    Levels {
        black: i32,
        mid: i32,
        white: i32,
    },
    /// Render the histogram as a 256x256 line graph.
    Histogram,
    Compress {
        percentage: i32,
    },
    Downscale {
        width: u32,
        height: u32,
    },
}

impl Operation {
    /// Command name, matching the serialized `op` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Operation::FlipHorizontal => "flip-horizontal",
            Operation::FlipVertical => "flip-vertical",
            Operation::Brighten { .. } => "brighten",
            Operation::Greyscale => "greyscale",
            Operation::Value => "value",
            Operation::Intensity => "intensity",
            Operation::Luma => "luma",
            Operation::RedComponent => "red-component",
            Operation::GreenComponent => "green-component",
            Operation::BlueComponent => "blue-component",
            Operation::Sepia => "sepia",
            Operation::Blur => "blur",
            Operation::Sharpen => "sharpen",
            Operation::ColorCorrect => "color-correct",
            Operation::Levels { .. } => "levels",
            Operation::Histogram => "histogram",
            Operation::Compress { .. } => "compress",
            Operation::Downscale { .. } => "downscale",
        }
    }

    /// Run the operation on `grid`.
    ///
    /// # Errors
    ///
    /// Propagates the validation errors of the underlying transform.
    #[instrument(skip(grid), fields(op = self.name(), width = grid.width(), height = grid.height()))]
    pub fn apply(&self, grid: &PixelGrid) -> Result<PixelGrid> {
        let output = match *self {
            Operation::FlipHorizontal => flip_horizontal(grid),
            Operation::FlipVertical => flip_vertical(grid),
            Operation::Brighten { delta } => brighten(grid, delta),
            Operation::Greyscale => to_greyscale(grid),
            Operation::Value => value(grid),
            Operation::Intensity => intensity(grid),
            Operation::Luma => luma(grid),
            Operation::RedComponent => red_component(grid),
            Operation::GreenComponent => green_component(grid),
            Operation::BlueComponent => blue_component(grid),
            Operation::Sepia => sepia(grid),
            Operation::Blur => blur(grid),
            Operation::Sharpen => sharpen(grid),
            Operation::ColorCorrect => correct_color(grid),
            Operation::Levels { black, mid, white } => adjust_levels(grid, black, mid, white)?,
            Operation::Histogram => render_histogram(grid),
            Operation::Compress { percentage } => compress(grid, percentage)?,
            Operation::Downscale { width, height } => downscale(grid, width, height)?,
        };
        Ok(output)
    }

    /// Output size of operations that do not preserve the input size.
    fn resized_output(&self) -> Option<(u32, u32)> {
        match *self {
            Operation::Histogram => Some((HISTOGRAM_SIZE, HISTOGRAM_SIZE)),
            Operation::Downscale { width, height } => Some((width, height)),
            _ => None,
        }
    }

    /// Run the operation and show the result left of `split_percent` of the
    /// width, with the untouched input on the right.
    ///
    /// Only operations that map an image onto one of the same size can be
    /// previewed. A histogram render or a downscale is rejected even when its
    /// output happens to match the input size.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidRange` for a bad percentage and
    /// `EngineError::DimensionMismatch` for `Histogram` and `Downscale`, in
    /// addition to the errors of [`apply`](Self::apply).
    pub fn preview(&self, grid: &PixelGrid, split_percent: i32) -> Result<PixelGrid> {
        ensure_range("split percentage", split_percent as i64, 0, 100)?;
        if let Some(actual) = self.resized_output() {
            return Err(EngineError::DimensionMismatch {
                expected: grid.dimensions(),
                actual,
            });
        }
        let processed = self.apply(grid)?;
        split_view(grid, &processed, split_percent)
    }
}

/// An ordered list of operations applied one after another.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub steps: Vec<Operation>,
}

impl Recipe {
    pub fn new(steps: Vec<Operation>) -> Self {
        Self { steps }
    }

    /// Check if the recipe does nothing.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step, feeding each output into the next step.
    ///
    /// # Errors
    ///
    /// Stops at the first failing step and returns its error.
    pub fn apply(&self, grid: &PixelGrid) -> Result<PixelGrid> {
        let mut current = grid.clone();
        for (index, step) in self.steps.iter().enumerate() {
            debug!(index, op = step.name(), "Applying recipe step");
            current = step.apply(&current)?;
        }
        Ok(current)
    }
}
