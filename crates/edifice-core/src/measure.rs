//! Geometric Measurer: shoelace area and point distance, pixel → metric.
use serde::{Deserialize, Serialize};

use crate::antipodal::{AntipodalPair, GridPoint};
use crate::contour::Contour;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Length {
    pub pixels: f64,
    pub metres: f64,
}

impl Length {
    pub fn km(&self) -> f64 {
        self.metres * 1e-3
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Area {
    pub pixels: f64,
    pub square_metres: f64,
}

impl Area {
    pub fn km2(&self) -> f64 {
        self.square_metres * 1e-6
    }
}

/// Euclidean distance between two cells.
pub fn distance(a: GridPoint, b: GridPoint, pixel_size: f64) -> Length {
    let dr = a.row as f64 - b.row as f64;
    let dc = a.col as f64 - b.col as f64;
    let pixels = dr.hypot(dc);
    Length { pixels, metres: pixels * pixel_size }
}

pub fn pair_width(pair: &AntipodalPair, pixel_size: f64) -> Length {
    distance(pair.first, pair.second, pixel_size)
}

/// Shoelace area with `x = col`, `y = row` and cyclic indexing.
///
/// A repeated closing vertex contributes nothing, so closed and open
/// renderings of the same ring measure the same.
pub fn polygon_area(contour: &Contour, pixel_size: f64) -> Area {
    let pts = &contour.points;
    let n = pts.len();
    let mut acc = 0.0;
    for i in 0..n {
        let prev = &pts[(i + n - 1) % n];
        let p = &pts[i];
        acc += p.col * prev.row - p.row * prev.col;
    }
    let pixels = 0.5 * acc.abs();
    Area { pixels, square_metres: pixels * pixel_size * pixel_size }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contour::ContourPoint;
    use approx::assert_abs_diff_eq;

    fn ring(pts: &[(f64, f64)]) -> Contour {
        Contour {
            level: 1.0,
            points: pts.iter().map(|&(row, col)| ContourPoint { row, col }).collect(),
            closed: true,
        }
    }

    #[test]
    fn unit_square_scales_by_pixel_area() {
        let sq = ring(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0), (0.0, 0.0)]);
        let a = polygon_area(&sq, 30.0);
        assert_abs_diff_eq!(a.pixels, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(a.square_metres, 900.0, epsilon = 1e-9);
        assert_abs_diff_eq!(a.km2(), 9e-4, epsilon = 1e-15);
    }

    #[test]
    fn area_is_invariant_under_reversal() {
        let poly = ring(&[(0.0, 0.0), (0.5, 4.0), (3.0, 5.5), (6.0, 2.0), (2.5, -1.0)]);
        let fwd = polygon_area(&poly, 30.0);
        let back = polygon_area(&poly.reversed(), 30.0);
        assert_abs_diff_eq!(fwd.pixels, back.pixels, epsilon = 1e-12);
        assert!(fwd.pixels > 0.0);
    }

    #[test]
    fn distance_is_symmetric_and_scaled() {
        let a = GridPoint { row: 1, col: 2 };
        let b = GridPoint { row: 4, col: 6 };
        let ab = distance(a, b, 30.0);
        assert_eq!(ab, distance(b, a, 30.0));
        assert_abs_diff_eq!(ab.pixels, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(ab.km(), 0.15, epsilon = 1e-12);
    }

    #[test]
    fn degenerate_contours_have_zero_area() {
        assert_eq!(polygon_area(&ring(&[]), 30.0).pixels, 0.0);
        assert_eq!(polygon_area(&ring(&[(2.0, 3.0)]), 30.0).pixels, 0.0);
    }
}
