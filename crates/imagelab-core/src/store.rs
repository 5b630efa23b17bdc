//! Named image storage for a controller.
//!
//! Engine functions work on grids directly and never see names. A controller
//! that lets users refer to images by name keeps them in an [`ImageStore`]
//! and threads them through the engine with the methods below.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::compose;
use crate::error::{EngineError, Result};
use crate::grid::PixelGrid;
use crate::histogram::compute_histogram;
use crate::operation::Operation;
use crate::Histogram;

/// Images held under user-chosen names.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    images: HashMap<String, PixelGrid>,
}

impl ImageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `grid` under `name`, replacing any previous image.
    pub fn insert(&mut self, name: impl Into<String>, grid: PixelGrid) {
        let name = name.into();
        let (width, height) = grid.dimensions();
        if self.images.insert(name.clone(), grid).is_some() {
            warn!(%name, "Overwriting stored image");
        }
        info!(%name, width, height, "Stored image");
    }

    /// Look up an image.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::MissingImage` if nothing is stored under `name`.
    pub fn get(&self, name: &str) -> Result<&PixelGrid> {
        self.images
            .get(name)
            .ok_or_else(|| EngineError::MissingImage(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Option<PixelGrid> {
        self.images.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.images.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Stored names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.images.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Apply `op` to `source` and store the result as `destination`.
    #[instrument(skip(self))]
    pub fn apply(&mut self, op: &Operation, source: &str, destination: &str) -> Result<()> {
        let output = op.apply(self.get(source)?)?;
        self.insert(destination, output);
        Ok(())
    }

    /// Like [`apply`](Self::apply), but store a split-view preview.
    #[instrument(skip(self))]
    pub fn preview(
        &mut self,
        op: &Operation,
        source: &str,
        destination: &str,
        split_percent: i32,
    ) -> Result<()> {
        let output = op.preview(self.get(source)?, split_percent)?;
        self.insert(destination, output);
        Ok(())
    }

    /// Store the three component views of `source`.
    #[instrument(skip(self))]
    pub fn split_channels(&mut self, source: &str, red: &str, green: &str, blue: &str) -> Result<()> {
        let [r, g, b] = compose::split_channels(self.get(source)?);
        self.insert(red, r);
        self.insert(green, g);
        self.insert(blue, b);
        Ok(())
    }

    /// Merge three stored images channel-wise into `destination`.
    #[instrument(skip(self))]
    pub fn combine_channels(
        &mut self,
        red: &str,
        green: &str,
        blue: &str,
        destination: &str,
    ) -> Result<()> {
        let output = compose::combine_channels(self.get(red)?, self.get(green)?, self.get(blue)?)?;
        self.insert(destination, output);
        Ok(())
    }

    /// Store a split view of `processed` over `original`.
    #[instrument(skip(self))]
    pub fn split_view(
        &mut self,
        original: &str,
        processed: &str,
        percent: i32,
        destination: &str,
    ) -> Result<()> {
        let output = compose::split_view(self.get(original)?, self.get(processed)?, percent)?;
        self.insert(destination, output);
        Ok(())
    }

    /// Histogram counts of a stored image.
    pub fn histogram(&self, source: &str) -> Result<Histogram> {
        Ok(compute_histogram(self.get(source)?))
    }
}
