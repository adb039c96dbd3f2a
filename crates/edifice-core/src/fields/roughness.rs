//! Local roughness: standard deviation of elevations in a square window.
//!
//! Border windows are completed by mirror reflection, so every cell gets a
//! value and the output keeps the grid's shape.
use super::gradient::reflect_index;
use super::{DerivativeField, FieldKind};
use crate::error::{AnalysisError, Result};
use crate::grid::ElevationGrid;

/// Default window edge length, in cells.
pub const DEFAULT_ROUGHNESS_WINDOW: usize = 3;

/// Population standard deviation over a `window × window` neighbourhood.
///
/// For even windows the centre sits at offset `window / 2` from the
/// top-left, matching the usual filter-origin convention.
pub fn compute_roughness(grid: &ElevationGrid, window: usize) -> Result<DerivativeField> {
    if window == 0 {
        return Err(AnalysisError::InvalidParameter {
            name: "roughness_window",
            value: window.to_string(),
            reason: "must be at least 1".into(),
        });
    }

    let (w, h) = (grid.width, grid.height);
    let z = grid.to_f64();
    let lo = -((window / 2) as isize);
    let hi = lo + window as isize - 1;
    let n = (window * window) as f64;

    let mut out = Vec::with_capacity(w * h);
    let mut patch = Vec::with_capacity(window * window);
    for r in 0..h {
        for c in 0..w {
            patch.clear();
            for dr in lo..=hi {
                let rr = reflect_index(r as isize + dr, h);
                for dc in lo..=hi {
                    let cc = reflect_index(c as isize + dc, w);
                    patch.push(z[rr * w + cc]);
                }
            }
            let mean = patch.iter().sum::<f64>() / n;
            let var = patch.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
            out.push(var.sqrt());
        }
    }
    Ok(DerivativeField::from_f64(FieldKind::Roughness, out, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn uniform_field_has_zero_roughness() {
        let grid = ElevationGrid::flat(10, 10, 250.0).unwrap();
        let rough = compute_roughness(&grid, DEFAULT_ROUGHNESS_WINDOW).unwrap();
        assert!(rough.data.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn interior_matches_hand_computed_std() {
        // z = c on a 5×5 grid: every interior 3×3 patch holds {c−1, c, c+1}
        // three times → population std = √(2/3).
        let grid = ElevationGrid::from_fn(5, 5, 30.0, |_, c| c as f32).unwrap();
        let rough = compute_roughness(&grid, 3).unwrap();
        assert_abs_diff_eq!(rough.get(2, 2), (2.0f32 / 3.0).sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn border_cells_use_reflected_neighbours() {
        // At c = 0 the patch columns are {0, 0, 1} (reflection of 0).
        let grid = ElevationGrid::from_fn(5, 5, 30.0, |_, c| c as f32).unwrap();
        let rough = compute_roughness(&grid, 3).unwrap();
        // values {0,0,1} ×3: mean 1/3, var = (2·(1/9) + 4/9)/3 = 2/9
        assert_abs_diff_eq!(rough.get(2, 0), (2.0f32 / 9.0).sqrt(), epsilon = 1e-6);
    }

    #[test]
    fn zero_window_is_rejected() {
        let grid = ElevationGrid::flat(4, 4, 0.0).unwrap();
        assert!(compute_roughness(&grid, 0).is_err());
    }
}
