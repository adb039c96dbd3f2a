use serde::{Deserialize, Serialize};

use crate::contour::{DEFAULT_BASE_RATIO, DEFAULT_CALDERA_RATIO};
use crate::error::{AnalysisError, Result};
use crate::fields::curvature::{
    DEFAULT_CURVATURE_AMPLIFICATION, DEFAULT_GAUSSIAN_AMPLIFICATION, DEFAULT_SMOOTHING_SIGMA,
};
use crate::fields::hillshade::{DEFAULT_ALTITUDE_DEG, DEFAULT_AZIMUTH_DEG};
use crate::fields::relief::{DEFAULT_RELIEF_SCALE, TERRAIN_CONVEXITY_AMPLIFICATION};
use crate::fields::roughness::DEFAULT_ROUGHNESS_WINDOW;
use crate::volume::VolumeModel;

fn check_finite(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AnalysisError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: "must be finite".into(),
        })
    }
}

/// Parameters of one edifice-volume run.
/// Defaults reproduce the reference workflow (5 % base, 80 % rim).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeParams {
    /// Base contour level as a fraction of the `[min, max]` elevation range.
    pub base_ratio: f64,
    /// Caldera contour level as a fraction of the maximum elevation.
    pub caldera_ratio: f64,
    pub model: VolumeModel,
}

impl Default for VolumeParams {
    fn default() -> Self {
        Self {
            base_ratio: DEFAULT_BASE_RATIO,
            caldera_ratio: DEFAULT_CALDERA_RATIO,
            model: VolumeModel::default(),
        }
    }
}

impl VolumeParams {
    pub fn validate(&self) -> Result<()> {
        check_finite("base_ratio", self.base_ratio)?;
        check_finite("caldera_ratio", self.caldera_ratio)
    }
}

/// Parameters of the terrain-descriptor battery.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainParams {
    /// Hillshade sun azimuth, degrees.
    pub sun_azimuth_deg: f64,
    /// Hillshade sun altitude, degrees.
    pub sun_altitude_deg: f64,
    pub convexity_amplification: f64,
    pub relief_scale: f64,
    /// Roughness window edge, cells.
    pub roughness_window: usize,
    pub curvature_amplification: f64,
    pub gaussian_amplification: f64,
    /// Blur sigma for both curvature products, cells.
    pub smoothing_sigma: f64,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            sun_azimuth_deg: DEFAULT_AZIMUTH_DEG,
            sun_altitude_deg: DEFAULT_ALTITUDE_DEG,
            convexity_amplification: TERRAIN_CONVEXITY_AMPLIFICATION,
            relief_scale: DEFAULT_RELIEF_SCALE,
            roughness_window: DEFAULT_ROUGHNESS_WINDOW,
            curvature_amplification: DEFAULT_CURVATURE_AMPLIFICATION,
            gaussian_amplification: DEFAULT_GAUSSIAN_AMPLIFICATION,
            smoothing_sigma: DEFAULT_SMOOTHING_SIGMA,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> Result<()> {
        check_finite("sun_azimuth_deg", self.sun_azimuth_deg)?;
        check_finite("sun_altitude_deg", self.sun_altitude_deg)?;
        check_finite("convexity_amplification", self.convexity_amplification)?;
        check_finite("relief_scale", self.relief_scale)?;
        check_finite("curvature_amplification", self.curvature_amplification)?;
        check_finite("gaussian_amplification", self.gaussian_amplification)?;
        check_finite("smoothing_sigma", self.smoothing_sigma)?;
        if self.roughness_window == 0 {
            return Err(AnalysisError::InvalidParameter {
                name: "roughness_window",
                value: "0".into(),
                reason: "must be at least 1".into(),
            });
        }
        if self.smoothing_sigma < 0.0 {
            return Err(AnalysisError::InvalidParameter {
                name: "smoothing_sigma",
                value: self.smoothing_sigma.to_string(),
                reason: "must be >= 0".into(),
            });
        }
        Ok(())
    }
}
