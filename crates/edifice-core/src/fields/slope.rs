//! Slope in degrees, in two variants that are reported side by side.
//!
//! Both use the shared first-difference operator from `super::gradient`;
//! they differ only in the cell spacing fed to it.
use super::gradient::gradient;
use super::{DerivativeField, FieldKind};
use crate::grid::ElevationGrid;

fn slope_with_spacing(grid: &ElevationGrid, spacing: f64, kind: FieldKind) -> DerivativeField {
    let z = grid.to_f64();
    let (d_row, d_col) = gradient(&z, grid.width, grid.height, spacing);
    let slope: Vec<f64> = d_row
        .iter()
        .zip(&d_col)
        .map(|(&gr, &gc)| gr.hypot(gc).atan().to_degrees())
        .collect();
    DerivativeField::from_f64(kind, slope, grid.width, grid.height)
}

/// Slope with unit spacing:
///   slope = atan(√(dz_drow² + dz_dcol²)) × 180/π
///
/// Elevation differences are taken per cell, so the result is only a true
/// angle when elevations are expressed in cell units.
pub fn compute_slope_unit(grid: &ElevationGrid) -> DerivativeField {
    slope_with_spacing(grid, 1.0, FieldKind::SlopeUnit)
}

/// Slope with `dx = dy = pixel_size`, the geometrically correct angle when
/// elevations and pixel size share a unit.
pub fn compute_slope_scaled(grid: &ElevationGrid) -> DerivativeField {
    slope_with_spacing(grid, grid.pixel_size, FieldKind::SlopeScaled)
}
