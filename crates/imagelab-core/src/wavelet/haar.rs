//! Orthonormal Haar wavelet transforms.
//!
//! The 1D forward transform repeatedly halves the active length `n`. At each
//! level it replaces the pair `(x[2i], x[2i+1])` by the scaled average at `i`
//! and the scaled difference at `n/2 + i`:
//!
//! ```text
//! avg  = (x[2i] + x[2i+1]) / sqrt(2)
//! diff = (x[2i] - x[2i+1]) / sqrt(2)
//! ```
//!
//! The `1/sqrt(2)` normalization keeps the transform energy preserving, so the
//! inverse reproduces the input up to floating-point error.

use std::f64::consts::SQRT_2;

use super::Plane;
use crate::error::{EngineError, Result};

fn ensure_power_of_two(len: usize) -> Result<()> {
    if len == 0 || !len.is_power_of_two() {
        return Err(EngineError::NotPowerOfTwo(len));
    }
    Ok(())
}

/// Forward 1D Haar transform.
///
/// # Errors
///
/// Returns `EngineError::NotPowerOfTwo` unless `sequence.len()` is a
/// non-zero power of two.
pub fn haar_forward(sequence: &[f64]) -> Result<Vec<f64>> {
    ensure_power_of_two(sequence.len())?;

    let mut result = sequence.to_vec();
    let mut scratch = vec![0.0; sequence.len()];
    let mut n = sequence.len();
    while n > 1 {
        let half = n / 2;
        for i in 0..half {
            let (a, b) = (result[2 * i], result[2 * i + 1]);
            scratch[i] = (a + b) / SQRT_2;
            scratch[half + i] = (a - b) / SQRT_2;
        }
        result[..n].copy_from_slice(&scratch[..n]);
        n = half;
    }
    Ok(result)
}

/// Inverse 1D Haar transform.
///
/// Rebuilds the sequence level by level for `m = 2, 4, ..., len`.
///
/// # Errors
///
/// Returns `EngineError::NotPowerOfTwo` unless `coefficients.len()` is a
/// non-zero power of two.
pub fn haar_inverse(coefficients: &[f64]) -> Result<Vec<f64>> {
    ensure_power_of_two(coefficients.len())?;

    let mut result = coefficients.to_vec();
    let mut scratch = vec![0.0; coefficients.len()];
    let mut m = 2;
    while m <= coefficients.len() {
        let half = m / 2;
        for i in 0..half {
            let (avg, diff) = (result[i], result[half + i]);
            scratch[2 * i] = (avg + diff) / SQRT_2;
            scratch[2 * i + 1] = (avg - diff) / SQRT_2;
        }
        result[..m].copy_from_slice(&scratch[..m]);
        m *= 2;
    }
    Ok(result)
}

/// Forward 2D Haar transform: every row, then every column.
///
/// # Errors
///
/// Returns `EngineError::NotPowerOfTwo` if either plane dimension is not a
/// non-zero power of two.
pub fn haar_forward_2d(plane: &Plane) -> Result<Plane> {
    let rows = transform_rows(plane, haar_forward)?;
    transform_columns(&rows, haar_forward)
}

/// Inverse 2D Haar transform: every column, then every row.
///
/// # Errors
///
/// Returns `EngineError::NotPowerOfTwo` if either plane dimension is not a
/// non-zero power of two.
pub fn haar_inverse_2d(plane: &Plane) -> Result<Plane> {
    let columns = transform_columns(plane, haar_inverse)?;
    transform_rows(&columns, haar_inverse)
}

/// Apply `transform` to every row, each of length `width`.
fn transform_rows(plane: &Plane, transform: fn(&[f64]) -> Result<Vec<f64>>) -> Result<Plane> {
    ensure_power_of_two(plane.width())?;
    let mut data = Vec::with_capacity(plane.values().len());
    for y in 0..plane.height() {
        data.extend(transform(plane.row(y))?);
    }
    Ok(Plane::from_values(plane.width(), plane.height(), data))
}

/// Apply `transform` to every column, each of length `height`.
fn transform_columns(plane: &Plane, transform: fn(&[f64]) -> Result<Vec<f64>>) -> Result<Plane> {
    ensure_power_of_two(plane.height())?;
    let mut out = Plane::new(plane.width(), plane.height());
    let mut column = vec![0.0; plane.height()];
    for x in 0..plane.width() {
        for (y, value) in column.iter_mut().enumerate() {
            *value = plane.get(x, y);
        }
        for (y, value) in transform(&column)?.into_iter().enumerate() {
            out.set(x, y, value);
        }
    }
    Ok(out)
}
