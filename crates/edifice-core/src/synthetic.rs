//! Analytic cone grids for demos and tests.
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::grid::ElevationGrid;

/// Which analytic edifice to build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntheticCone {
    /// `peak · exp(-(r / scale)²)`, `r` in cells from the grid centre.
    Gaussian { peak: f64, scale: f64 },
    /// Flat summit out to `rim_radius`, linear flank down to zero at
    /// `base_radius`, flat plain beyond. Radii in cells.
    FlatTopped { peak: f64, base_radius: f64, rim_radius: f64 },
}

impl Default for SyntheticCone {
    fn default() -> Self {
        SyntheticCone::Gaussian { peak: 1000.0, scale: 30.0 }
    }
}

impl SyntheticCone {
    /// Build a `size × size` grid centred on the cone.
    pub fn build(&self, size: usize, pixel_size: f64) -> Result<ElevationGrid> {
        let centre = (size as f64 - 1.0) / 2.0;
        let radius = move |r: usize, c: usize| (r as f64 - centre).hypot(c as f64 - centre);
        match *self {
            SyntheticCone::Gaussian { peak, scale } => {
                if !(scale > 0.0) {
                    return Err(AnalysisError::InvalidParameter {
                        name: "scale",
                        value: scale.to_string(),
                        reason: "must be > 0".into(),
                    });
                }
                ElevationGrid::from_fn(size, size, pixel_size, |r, c| {
                    (peak * (-(radius(r, c) / scale).powi(2)).exp()) as f32
                })
            }
            SyntheticCone::FlatTopped { peak, base_radius, rim_radius } => {
                if !(rim_radius >= 0.0 && base_radius > rim_radius) {
                    return Err(AnalysisError::InvalidParameter {
                        name: "base_radius",
                        value: base_radius.to_string(),
                        reason: format!("must exceed rim_radius {rim_radius}"),
                    });
                }
                ElevationGrid::from_fn(size, size, pixel_size, |r, c| {
                    let d = radius(r, c);
                    let t = ((base_radius - d) / (base_radius - rim_radius)).clamp(0.0, 1.0);
                    (peak * t) as f32
                })
            }
        }
    }

    /// Radius in cells at which the cone crosses `level`, where defined.
    pub fn level_radius(&self, level: f64) -> Option<f64> {
        match *self {
            SyntheticCone::Gaussian { peak, scale } => {
                (level > 0.0 && level < peak).then(|| scale * (peak / level).ln().sqrt())
            }
            SyntheticCone::FlatTopped { peak, base_radius, rim_radius } => (level > 0.0
                && level < peak)
                .then(|| base_radius - (level / peak) * (base_radius - rim_radius)),
        }
    }
}
