//! Derivative Field Engine: finite-difference terrain descriptors computed
//! from an [`ElevationGrid`]. Every operator is a pure function of the grid
//! and its parameters.
pub mod aspect;
pub mod catalog;
pub mod curvature;
mod gradient;
pub mod hillshade;
pub mod relief;
pub mod roughness;
pub mod slope;
mod smoothing;

pub use aspect::compute_aspect;
pub use catalog::{FieldDescriptor, TerrainSuite, FIELD_CATALOG};
pub use curvature::{
    compute_curvature, compute_gaussian_curvature, compute_smoothed_curvature, GaussianCurvature,
    SmoothedCurvature,
};
pub use hillshade::compute_hillshade;
pub use relief::{compute_convexity, compute_shaded_relief, compute_sobel_magnitude};
pub use roughness::compute_roughness;
pub use slope::{compute_slope_scaled, compute_slope_unit};

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::grid::ElevationGrid;

/// What a [`DerivativeField`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    /// The source elevations, carried as a field for catalog display.
    Elevation,
    ShadedRelief,
    /// Illumination in 0–255.
    Hillshade,
    /// Slope in degrees with unit cell spacing.
    SlopeUnit,
    /// Slope in degrees with the grid's pixel size as spacing.
    SlopeScaled,
    Roughness,
    Convexity,
    /// Downslope direction in degrees, 0–360.
    Aspect,
    Curvature,
    SmoothedCurvature,
    SmoothedCurvatureNormalized,
    GaussianCurvatureLog,
    GaussianCurvatureNormalized,
    /// Sobel gradient magnitude, used to rank rim points by steepness.
    SobelMagnitude,
}

/// A grid-shaped array of one derived quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivativeField {
    pub kind: FieldKind,
    /// Row-major values, same shape as the source grid.
    pub data: Vec<f32>,
    pub width: usize,
    pub height: usize,
}

impl DerivativeField {
    pub(crate) fn from_f64(kind: FieldKind, values: Vec<f64>, width: usize, height: usize) -> Self {
        debug_assert_eq!(values.len(), width * height);
        Self {
            kind,
            data: values.into_iter().map(|v| v as f32).collect(),
            width,
            height,
        }
    }

    /// The elevations themselves, tagged as [`FieldKind::Elevation`].
    pub fn elevation(grid: &ElevationGrid) -> Self {
        Self {
            kind: FieldKind::Elevation,
            data: grid.data.clone(),
            width: grid.width,
            height: grid.height,
        }
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row * self.width + col]
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }
}

/// Min–max normalise `values` into [0, 1].
///
/// Fails with [`AnalysisError::DegenerateNormalization`] when the range is
/// zero or not finite, naming `field` as the culprit.
pub(crate) fn normalize_min_max(values: &[f64], field: FieldKind) -> Result<Vec<f64>> {
    let lo = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let hi = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let range = hi - lo;
    if !(range.is_finite() && range > 0.0) {
        return Err(AnalysisError::DegenerateNormalization { field });
    }
    Ok(values.iter().map(|&v| (v - lo) / range).collect())
}
