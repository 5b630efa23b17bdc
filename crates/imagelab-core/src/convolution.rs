//! Kernel-based spatial filters with edge-clamped sampling.
//!
//! # Algorithm
//!
//! For every output pixel and channel the kernel is centred on the source
//! pixel and the weighted sum of the footprint is taken. Source coordinates
//! that fall outside the image are clamped to the nearest valid row/column,
//! which replicates the edge pixels rather than padding with black. The sum
//! is truncated toward zero and then clamped to [0, 255].

use tracing::{debug, instrument};

use crate::error::{EngineError, Result};
use crate::grid::{clamp_channel_f64, PixelGrid};

/// Weights of the 3x3 blur kernel.
const BLUR_WEIGHTS: [f64; 9] = [
    0.0625, 0.125, 0.0625, //
    0.125, 0.25, 0.125, //
    0.0625, 0.125, 0.0625,
];

/// Weights of the 5x5 sharpen kernel.
const SHARPEN_WEIGHTS: [f64; 25] = [
    -0.125, -0.125, -0.125, -0.125, -0.125, //
    -0.125, 0.25, 0.25, 0.25, -0.125, //
    -0.125, 0.25, 1.0, 0.25, -0.125, //
    -0.125, 0.25, 0.25, 0.25, -0.125, //
    -0.125, -0.125, -0.125, -0.125, -0.125,
];

/// An odd-sized square matrix of filter weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    size: usize,
    weights: Vec<f64>,
}

impl Kernel {
    /// Build a kernel from row-major weights.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::InvalidKernel` if `size` is even or zero, or if
    /// `weights.len() != size * size`.
    pub fn new(size: usize, weights: Vec<f64>) -> Result<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(EngineError::InvalidKernel(format!(
                "size must be odd, got {size}"
            )));
        }
        if weights.len() != size * size {
            return Err(EngineError::InvalidKernel(format!(
                "expected {} weights for a {size}x{size} kernel, got {}",
                size * size,
                weights.len()
            )));
        }
        Ok(Self { size, weights })
    }

    /// 3x3 Gaussian-like blur. Weights sum to 1.
    pub fn blur() -> Self {
        Self {
            size: 3,
            weights: BLUR_WEIGHTS.to_vec(),
        }
    }

    /// 5x5 sharpen: centre 1, inner ring 0.25, outer ring -0.125.
    pub fn sharpen() -> Self {
        Self {
            size: 5,
            weights: SHARPEN_WEIGHTS.to_vec(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Weight at kernel row `ky`, column `kx`.
    #[inline]
    pub fn weight(&self, kx: usize, ky: usize) -> f64 {
        self.weights[ky * self.size + kx]
    }
}

/// Convolve `grid` with `kernel` using edge replication.
#[instrument(skip_all, fields(width = grid.width(), height = grid.height(), kernel = kernel.size()))]
pub fn filter_by_kernel(grid: &PixelGrid, kernel: &Kernel) -> PixelGrid {
    if grid.is_empty() {
        return grid.clone();
    }

    let (w, h) = (grid.width() as i64, grid.height() as i64);
    let half = (kernel.size() / 2) as i64;
    let src = grid.pixels();

    let mut output = Vec::with_capacity(src.len());
    for y in 0..h {
        for x in 0..w {
            let mut sums = [0.0f64; 3];
            for ky in 0..kernel.size() {
                let sy = (y + ky as i64 - half).clamp(0, h - 1);
                for kx in 0..kernel.size() {
                    let sx = (x + kx as i64 - half).clamp(0, w - 1);
                    let weight = kernel.weight(kx, ky);
                    let idx = ((sy * w + sx) * 3) as usize;
                    sums[0] += src[idx] as f64 * weight;
                    sums[1] += src[idx + 1] as f64 * weight;
                    sums[2] += src[idx + 2] as f64 * weight;
                }
            }
            output.extend(sums.iter().map(|&s| clamp_channel_f64(s.trunc())));
        }
    }

    debug!(bytes = output.len(), "Convolution complete");
    PixelGrid::from_buffer(grid.width(), grid.height(), output)
}

/// Blur with the 3x3 kernel.
pub fn blur(grid: &PixelGrid) -> PixelGrid {
    filter_by_kernel(grid, &Kernel::blur())
}

/// Sharpen with the 5x5 kernel.
pub fn sharpen(grid: &PixelGrid) -> PixelGrid {
    filter_by_kernel(grid, &Kernel::sharpen())
}
