use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Default ground distance per cell, in metres.
pub const DEFAULT_PIXEL_SIZE: f64 = 30.0;

fn default_pixel_size() -> f64 {
    DEFAULT_PIXEL_SIZE
}

/// A single-band elevation grid storing f32 samples in metres, row-major.
/// Distances and areas derived from it use f64.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElevationGrid {
    /// Row-major elevation values. NaN marks no-data.
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
    /// Linear ground distance covered by one cell.
    #[serde(default = "default_pixel_size")]
    pub pixel_size: f64,
}

impl ElevationGrid {
    /// Wrap row-major samples, checking the shape invariants.
    pub fn new(data: Vec<f32>, width: usize, height: usize, pixel_size: f64) -> Result<Self> {
        let grid = Self { data, width, height, pixel_size };
        grid.validate()?;
        Ok(grid)
    }

    /// Build a grid by evaluating `f(row, col)` at every cell.
    pub fn from_fn<F>(width: usize, height: usize, pixel_size: f64, mut f: F) -> Result<Self>
    where
        F: FnMut(usize, usize) -> f32,
    {
        let mut data = Vec::with_capacity(width * height);
        for r in 0..height {
            for c in 0..width {
                data.push(f(r, c));
            }
        }
        Self::new(data, width, height, pixel_size)
    }

    /// A constant-elevation grid.
    pub fn flat(width: usize, height: usize, fill: f32) -> Result<Self> {
        Self::new(vec![fill; width * height], width, height, DEFAULT_PIXEL_SIZE)
    }

    /// Check the invariants a deserialised grid may have skipped.
    pub fn validate(&self) -> Result<()> {
        if self.width < 2 || self.height < 2 {
            return Err(AnalysisError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.data.len() != self.width * self.height {
            return Err(AnalysisError::DataLengthMismatch {
                width: self.width,
                height: self.height,
                actual: self.data.len(),
            });
        }
        if !(self.pixel_size.is_finite() && self.pixel_size > 0.0) {
            return Err(AnalysisError::InvalidParameter {
                name: "pixel_size",
                value: self.pixel_size.to_string(),
                reason: "must be finite and > 0".into(),
            });
        }
        Ok(())
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, val: f32) {
        self.data[row * self.width + col] = val;
    }

    #[inline]
    pub fn in_bounds(&self, row: i64, col: i64) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    /// Minimum elevation; NaN cells are ignored.
    pub fn min_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::INFINITY, f32::min)
    }

    /// Maximum elevation; NaN cells are ignored.
    pub fn max_elevation(&self) -> f32 {
        self.data.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
    }

    /// Replace every cell equal to `sentinel` with NaN.
    ///
    /// Returns a new grid; the receiver is left untouched.
    pub fn mask_nodata(&self, sentinel: f32) -> Self {
        let data = self
            .data
            .iter()
            .map(|&v| if v == sentinel || !v.is_finite() { f32::NAN } else { v })
            .collect();
        Self { data, ..self.clone() }
    }

    /// Copy of the elevations widened to f64, the working precision of the
    /// finite-difference operators.
    pub(crate) fn to_f64(&self) -> Vec<f64> {
        self.data.iter().map(|&v| v as f64).collect()
    }
}
