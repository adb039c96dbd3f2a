//! Aspect: compass direction of steepest descent.
//!
//! Uses the shared first-difference operator from `super::gradient` with
//! unit spacing (spacing cancels inside atan2).
use super::gradient::gradient;
use super::{DerivativeField, FieldKind};
use crate::grid::ElevationGrid;

/// Aspect in degrees, normalised to [0°, 360°):
///   aspect = atan2(−dz_drow, dz_dcol) × 180/π, +360 when negative
///
/// Flat cells yield 0°.
pub fn compute_aspect(grid: &ElevationGrid) -> DerivativeField {
    let z = grid.to_f64();
    let (d_row, d_col) = gradient(&z, grid.width, grid.height, 1.0);
    let aspect: Vec<f64> = d_row
        .iter()
        .zip(&d_col)
        .map(|(&gr, &gc)| {
            let deg = (-gr).atan2(gc).to_degrees();
            if deg < 0.0 { deg + 360.0 } else { deg }
        })
        .collect();
    DerivativeField::from_f64(FieldKind::Aspect, aspect, grid.width, grid.height)
}
