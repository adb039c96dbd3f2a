//! Curvature family: plain Laplacian-style curvature, the amplified and
//! smoothed variant used for display, and log-compressed Gaussian curvature.
use tracing::debug;

use super::gradient::{diff_axis, Axis};
use super::smoothing::gaussian_blur;
use super::{normalize_min_max, DerivativeField, FieldKind};
use crate::error::Result;
use crate::grid::ElevationGrid;

/// Amplification applied to curvature before smoothing.
pub const DEFAULT_CURVATURE_AMPLIFICATION: f64 = 5.0;
/// Amplification applied to Gaussian curvature before the log transform.
pub const DEFAULT_GAUSSIAN_AMPLIFICATION: f64 = 10.0;
/// Gaussian blur sigma, in cells.
pub const DEFAULT_SMOOTHING_SIGMA: f64 = 1.0;

fn laplacian(z: &[f64], width: usize, height: usize) -> Vec<f64> {
    let dz_dc = diff_axis(z, width, height, Axis::Col, 1.0);
    let dz_dr = diff_axis(z, width, height, Axis::Row, 1.0);
    let d2_cc = diff_axis(&dz_dc, width, height, Axis::Col, 1.0);
    let d2_rr = diff_axis(&dz_dr, width, height, Axis::Row, 1.0);
    d2_cc.iter().zip(&d2_rr).map(|(a, b)| a + b).collect()
}

/// `∂²z/∂col² + ∂²z/∂row²`, each second derivative taken as a repeated
/// first difference with unit spacing.
pub fn compute_curvature(grid: &ElevationGrid) -> DerivativeField {
    let z = grid.to_f64();
    let curv = laplacian(&z, grid.width, grid.height);
    DerivativeField::from_f64(FieldKind::Curvature, curv, grid.width, grid.height)
}

/// Amplified, smoothed curvature and its [0, 1] normalisation.
#[derive(Debug, Clone)]
pub struct SmoothedCurvature {
    /// Feeds statistics.
    pub smoothed: DerivativeField,
    /// Feeds visualisation.
    pub normalized: DerivativeField,
}

/// Curvature × `amplification`, blurred with `sigma`, then min–max normalised.
///
/// Fails with `DegenerateNormalization` when the smoothed field is constant
/// (e.g. a plane).
pub fn compute_smoothed_curvature(
    grid: &ElevationGrid,
    amplification: f64,
    sigma: f64,
) -> Result<SmoothedCurvature> {
    let (w, h) = (grid.width, grid.height);
    let z = grid.to_f64();
    let amplified: Vec<f64> = laplacian(&z, w, h).into_iter().map(|v| v * amplification).collect();
    let smoothed = gaussian_blur(&amplified, w, h, sigma);
    let normalized = normalize_min_max(&smoothed, FieldKind::SmoothedCurvatureNormalized)?;
    Ok(SmoothedCurvature {
        smoothed: DerivativeField::from_f64(FieldKind::SmoothedCurvature, smoothed, w, h),
        normalized: DerivativeField::from_f64(FieldKind::SmoothedCurvatureNormalized, normalized, w, h),
    })
}

/// Log-compressed Gaussian curvature and its [0, 1] normalisation.
#[derive(Debug, Clone)]
pub struct GaussianCurvature {
    /// `ln(1 + max(0, amplification · K))`; feeds statistics.
    pub log: DerivativeField,
    /// `log` min–max normalised; feeds visualisation.
    pub normalized: DerivativeField,
}

/// Gaussian curvature on a blurred copy of the grid.
///
/// 1. blur elevations with `sigma`
/// 2. first differences with spacing `pixel_size`: `z_r`, `z_c`
/// 3. `z_rr = ∂z_r/∂row`, `z_cc = ∂z_c/∂col`, `z_rc = ∂z_c/∂row`
/// 4. `K = z_rr · z_cc − z_rc²`, × `amplification`, negatives set to 0
/// 5. `ln(1 + K)`, then min–max normalise
///
/// Fails with `DegenerateNormalization` when no cell has positive curvature.
pub fn compute_gaussian_curvature(
    grid: &ElevationGrid,
    amplification: f64,
    sigma: f64,
) -> Result<GaussianCurvature> {
    let (w, h) = (grid.width, grid.height);
    let res = grid.pixel_size;
    let smoothed = gaussian_blur(&grid.to_f64(), w, h, sigma);

    let z_r = diff_axis(&smoothed, w, h, Axis::Row, res);
    let z_c = diff_axis(&smoothed, w, h, Axis::Col, res);
    let z_rr = diff_axis(&z_r, w, h, Axis::Row, res);
    let z_cc = diff_axis(&z_c, w, h, Axis::Col, res);
    let z_rc = diff_axis(&z_c, w, h, Axis::Row, res);

    let log: Vec<f64> = (0..w * h)
        .map(|i| {
            let k = (z_rr[i] * z_cc[i] - z_rc[i] * z_rc[i]) * amplification;
            // NaN passes through untouched; only finite negatives are clamped.
            let k = if k < 0.0 { 0.0 } else { k };
            k.ln_1p()
        })
        .collect();

    let normalized = normalize_min_max(&log, FieldKind::GaussianCurvatureNormalized)?;
    debug!(width = w, height = h, "gaussian curvature computed");
    Ok(GaussianCurvature {
        log: DerivativeField::from_f64(FieldKind::GaussianCurvatureLog, log, w, h),
        normalized: DerivativeField::from_f64(FieldKind::GaussianCurvatureNormalized, normalized, w, h),
    })
}
