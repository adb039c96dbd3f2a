//! Lambertian hillshade for a single fixed sun position.
use super::gradient::gradient;
use super::{DerivativeField, FieldKind};
use crate::grid::ElevationGrid;

/// Default sun azimuth in degrees.
pub const DEFAULT_AZIMUTH_DEG: f64 = 45.0;
/// Default sun altitude in degrees above the horizon.
pub const DEFAULT_ALTITUDE_DEG: f64 = 45.0;

/// Illumination in 0–255 for a sun at `azimuth_deg` / `altitude_deg`.
///
/// With unit-spacing differences `g_r`, `g_c`:
///   slope  = π/2 − atan(√(g_r² + g_c²))
///   aspect = atan2(−g_r, g_c)
///   shade  = sin(alt)·sin(slope) + cos(alt)·cos(slope)·cos(az − aspect)
/// clipped to [0, 1] and scaled by 255.
pub fn compute_hillshade(grid: &ElevationGrid, azimuth_deg: f64, altitude_deg: f64) -> DerivativeField {
    let z = grid.to_f64();
    let (d_row, d_col) = gradient(&z, grid.width, grid.height, 1.0);
    let az = azimuth_deg.to_radians();
    let alt = altitude_deg.to_radians();
    let (sin_alt, cos_alt) = alt.sin_cos();

    let shade: Vec<f64> = d_row
        .iter()
        .zip(&d_col)
        .map(|(&gr, &gc)| {
            let slope = std::f64::consts::FRAC_PI_2 - gr.hypot(gc).atan();
            let aspect = (-gr).atan2(gc);
            let lum = sin_alt * slope.sin() + cos_alt * slope.cos() * (az - aspect).cos();
            lum.clamp(0.0, 1.0) * 255.0
        })
        .collect();
    DerivativeField::from_f64(FieldKind::Hillshade, shade, grid.width, grid.height)
}
