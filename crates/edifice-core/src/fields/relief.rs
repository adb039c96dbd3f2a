//! Gradient-magnitude style fields: shaded relief, convexity and the Sobel
//! magnitude used to rank caldera rim points.
use super::gradient::{diff_axis, gradient, sobel_gradient, Axis};
use super::{DerivativeField, FieldKind};
use crate::grid::ElevationGrid;

/// Convexity amplification used by the volume workflow.
pub const DEFAULT_CONVEXITY_AMPLIFICATION: f64 = 100.0;
/// Convexity amplification used by the terrain battery.
pub const TERRAIN_CONVEXITY_AMPLIFICATION: f64 = 200.0;
/// Shaded-relief scale factor.
pub const DEFAULT_RELIEF_SCALE: f64 = 10.0;

/// `|∇z| × scale` with unit spacing.
pub fn compute_shaded_relief(grid: &ElevationGrid, scale: f64) -> DerivativeField {
    let z = grid.to_f64();
    let (d_row, d_col) = gradient(&z, grid.width, grid.height, 1.0);
    let relief = d_row.iter().zip(&d_col).map(|(&a, &b)| a.hypot(b) * scale).collect();
    DerivativeField::from_f64(FieldKind::ShadedRelief, relief, grid.width, grid.height)
}

/// `(∂g_r/∂row + ∂g_c/∂col) × amplification`, where `(g_r, g_c)` is the
/// unit-spacing gradient. Positive where the surface is concave-up.
pub fn compute_convexity(grid: &ElevationGrid, amplification: f64) -> DerivativeField {
    let (w, h) = (grid.width, grid.height);
    let z = grid.to_f64();
    let (g_r, g_c) = gradient(&z, w, h, 1.0);
    let g_rr = diff_axis(&g_r, w, h, Axis::Row, 1.0);
    let g_cc = diff_axis(&g_c, w, h, Axis::Col, 1.0);
    let conv = g_rr.iter().zip(&g_cc).map(|(a, b)| (a + b) * amplification).collect();
    DerivativeField::from_f64(FieldKind::Convexity, conv, w, h)
}

/// `hypot(sobel_col, sobel_row)` at every cell, borders mirror-reflected.
///
/// Unnormalised: a unit ramp yields 8, not 1. Only the ordering of values
/// matters to the rim selector.
pub fn compute_sobel_magnitude(grid: &ElevationGrid) -> DerivativeField {
    let (w, h) = (grid.width, grid.height);
    let z = grid.to_f64();
    let mut out = Vec::with_capacity(w * h);
    for r in 0..h {
        for c in 0..w {
            let (gc, gr) = sobel_gradient(&z, w, h, r, c);
            out.push(gc.hypot(gr));
        }
    }
    DerivativeField::from_f64(FieldKind::SobelMagnitude, out, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn shaded_relief_scales_gradient_magnitude() {
        // z = 3r + 4c → |∇z| = 5 everywhere
        let grid = ElevationGrid::from_fn(6, 6, 30.0, |r, c| (3 * r + 4 * c) as f32).unwrap();
        let relief = compute_shaded_relief(&grid, DEFAULT_RELIEF_SCALE);
        for &v in &relief.data {
            assert_abs_diff_eq!(v, 50.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn convexity_of_bowl_is_positive_and_amplified() {
        let grid = ElevationGrid::from_fn(12, 12, 30.0, |r, c| {
            let (dr, dc) = (r as f32 - 6.0, c as f32 - 6.0);
            dr * dr + dc * dc
        })
        .unwrap();
        let conv = compute_convexity(&grid, DEFAULT_CONVEXITY_AMPLIFICATION);
        assert_abs_diff_eq!(conv.get(6, 6), 400.0, epsilon = 1e-3);
    }

    #[test]
    fn sobel_magnitude_of_ramp_is_eight_times_slope() {
        let grid = ElevationGrid::from_fn(7, 7, 30.0, |r, _| r as f32 * 2.0).unwrap();
        let mag = compute_sobel_magnitude(&grid);
        assert_abs_diff_eq!(mag.get(3, 3), 16.0, epsilon = 1e-5);
        // Reflected border row sees only half the rise.
        assert_abs_diff_eq!(mag.get(0, 3), 8.0, epsilon = 1e-5);
    }
}
