//! Contour Extractor: marching-squares isolines at an elevation threshold.
//!
//! Crossing points are identified by the cell edge they lie on, so two cells
//! sharing an edge produce the exact same vertex and segments chain by key
//! equality rather than by float comparison.
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::grid::ElevationGrid;

/// Base contour level, as a fraction of the elevation range above the minimum.
pub const DEFAULT_BASE_RATIO: f64 = 0.05;
/// Caldera contour level, as a fraction of the maximum elevation.
pub const DEFAULT_CALDERA_RATIO: f64 = 0.8;

// ── Types ─────────────────────────────────────────────────────────────────────

/// Fractional grid coordinate. `row` grows downwards, `col` rightwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContourPoint {
    pub row: f64,
    pub col: f64,
}

/// One traced isoline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contour {
    pub level: f64,
    /// Vertices in traversal order. A closed contour repeats its first
    /// vertex at the end.
    pub points: Vec<ContourPoint>,
    pub closed: bool,
}

impl Contour {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The same isoline walked the other way round.
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { level: self.level, points, closed: self.closed }
    }
}

// ── Levels ────────────────────────────────────────────────────────────────────

/// `min + ratio·(max − min)`, NaN cells ignored.
pub fn base_level(grid: &ElevationGrid, ratio: f64) -> f64 {
    let min = grid.min_elevation() as f64;
    let max = grid.max_elevation() as f64;
    min + ratio * (max - min)
}

/// `ratio·max`, NaN cells ignored.
pub fn caldera_level(grid: &ElevationGrid, ratio: f64) -> f64 {
    ratio * grid.max_elevation() as f64
}

// ── Marching squares ──────────────────────────────────────────────────────────

/// A cell edge. `H(r, c)` joins `(r, c)`–`(r, c+1)`; `V(r, c)` joins
/// `(r, c)`–`(r+1, c)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum EdgeKey {
    H(usize, usize),
    V(usize, usize),
}

impl EdgeKey {
    fn endpoints(self) -> ((usize, usize), (usize, usize)) {
        match self {
            EdgeKey::H(r, c) => ((r, c), (r, c + 1)),
            EdgeKey::V(r, c) => ((r, c), (r + 1, c)),
        }
    }
}

/// Linear interpolation of the level crossing along `edge`.
fn crossing(z: &[f64], width: usize, edge: EdgeKey, level: f64) -> ContourPoint {
    let ((r0, c0), (r1, c1)) = edge.endpoints();
    let (a, b) = (z[r0 * width + c0], z[r1 * width + c1]);
    let t = (level - a) / (b - a);
    ContourPoint {
        row: r0 as f64 + t * (r1 as f64 - r0 as f64),
        col: c0 as f64 + t * (c1 as f64 - c0 as f64),
    }
}

/// Segments of one cell, as pairs of crossed edges.
///
/// Corners run clockwise from top-left. Each corner is cut off by the two
/// edges that touch it. A saddle always cuts off its two high corners, so
/// low regions stay connected across the cell.
fn cell_segments(
    corners: [f64; 4],
    r: usize,
    c: usize,
    level: f64,
    out: &mut Vec<[EdgeKey; 2]>,
) {
    let top = EdgeKey::H(r, c);
    let right = EdgeKey::V(r, c + 1);
    let bottom = EdgeKey::H(r + 1, c);
    let left = EdgeKey::V(r, c);
    // Edges cutting off tl, tr, br, bl.
    let cuts = [[left, top], [top, right], [right, bottom], [bottom, left]];

    let inside = corners.map(|v| v >= level);
    let n_inside = inside.iter().filter(|&&b| b).count();
    match n_inside {
        0 | 4 => {}
        1 | 3 => {
            // The odd one out is the isolated corner.
            let lone = n_inside == 1;
            if let Some(i) = inside.iter().position(|&b| b == lone) {
                out.push(cuts[i]);
            }
        }
        _ => {
            if inside[0] == inside[1] {
                // Top pair against bottom pair.
                out.push([left, right]);
            } else if inside[1] == inside[2] {
                out.push([top, bottom]);
            } else {
                // Saddle: diagonal corners agree.
                for (i, &high) in inside.iter().enumerate() {
                    if high {
                        out.push(cuts[i]);
                    }
                }
            }
        }
    }
}

/// Trace every isoline of `grid` at `level`.
///
/// Cells with a NaN corner are skipped, so no-data holes break contours
/// open. Traversal is row-major: open polylines are emitted first, in the
/// order of their first segment, then closed rings.
pub fn trace_isolines(grid: &ElevationGrid, level: f64) -> Vec<Contour> {
    let (w, h) = (grid.width, grid.height);
    let z = grid.to_f64();
    if !level.is_finite() {
        return Vec::new();
    }

    let mut segments: Vec<[EdgeKey; 2]> = Vec::new();
    for r in 0..h.saturating_sub(1) {
        for c in 0..w.saturating_sub(1) {
            let corners = [
                z[r * w + c],
                z[r * w + c + 1],
                z[(r + 1) * w + c + 1],
                z[(r + 1) * w + c],
            ];
            if corners.iter().any(|v| v.is_nan()) {
                continue;
            }
            cell_segments(corners, r, c, level, &mut segments);
        }
    }

    let mut adjacency: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
    for (i, seg) in segments.iter().enumerate() {
        for &key in seg {
            adjacency.entry(key).or_default().push(i);
        }
    }

    let mut used = vec![false; segments.len()];
    let mut chains: Vec<Vec<EdgeKey>> = Vec::new();

    // Open chains start at an edge touched by a single segment.
    for i in 0..segments.len() {
        if used[i] {
            continue;
        }
        let start = segments[i].iter().copied().find(|k| adjacency[k].len() == 1);
        if let Some(start) = start {
            chains.push(walk(&segments, &adjacency, &mut used, i, start));
        }
    }
    // Whatever is left forms rings.
    for i in 0..segments.len() {
        if !used[i] {
            chains.push(walk(&segments, &adjacency, &mut used, i, segments[i][0]));
        }
    }

    let contours: Vec<Contour> = chains
        .into_iter()
        .map(|keys| {
            let closed = keys.len() > 2 && keys.first() == keys.last();
            Contour {
                level,
                points: keys.into_iter().map(|k| crossing(&z, w, k, level)).collect(),
                closed,
            }
        })
        .collect();
    debug!(level, n_segments = segments.len(), n_contours = contours.len(), "traced isolines");
    contours
}

/// Follow segments from `start` (an edge of segment `first`) until the
/// chain runs out or returns to `start`.
fn walk(
    segments: &[[EdgeKey; 2]],
    adjacency: &HashMap<EdgeKey, Vec<usize>>,
    used: &mut [bool],
    first: usize,
    start: EdgeKey,
) -> Vec<EdgeKey> {
    let mut keys = vec![start];
    let (mut seg, mut at) = (first, start);
    loop {
        used[seg] = true;
        let [a, b] = segments[seg];
        let next = if a == at { b } else { a };
        keys.push(next);
        if next == start {
            break;
        }
        match adjacency[&next].iter().copied().find(|&s| !used[s]) {
            Some(s) => {
                seg = s;
                at = next;
            }
            None => break,
        }
    }
    keys
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// The isoline at `level` with the most vertices; the first traced wins ties.
pub fn longest_contour(grid: &ElevationGrid, level: f64) -> Result<Contour> {
    let mut best: Option<Contour> = None;
    for contour in trace_isolines(grid, level) {
        if best.as_ref().map_or(true, |b| contour.len() > b.len()) {
            best = Some(contour);
        }
    }
    best.ok_or(AnalysisError::NoContourFound { level })
}

/// Longest isoline at the base level for `ratio`.
pub fn find_base_contour(grid: &ElevationGrid, ratio: f64) -> Result<Contour> {
    longest_contour(grid, base_level(grid, ratio))
}

/// Longest isoline at the caldera level for `ratio`.
pub fn find_caldera_contour(grid: &ElevationGrid, ratio: f64) -> Result<Contour> {
    longest_contour(grid, caldera_level(grid, ratio))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn make_peak(n: usize) -> ElevationGrid {
        let c0 = (n as f64 - 1.0) / 2.0;
        ElevationGrid::from_fn(n, n, 30.0, |r, c| {
            let d2 = (r as f64 - c0).powi(2) + (c as f64 - c0).powi(2);
            (1000.0 * (-d2 / 50.0).exp()) as f32
        })
        .unwrap()
    }

    #[test]
    fn levels_follow_ratio_conventions() {
        let grid = ElevationGrid::from_fn(4, 4, 30.0, |r, c| (100 + 10 * r + c) as f32).unwrap();
        // min 100, max 133
        assert_abs_diff_eq!(base_level(&grid, 0.5), 116.5, epsilon = 1e-9);
        assert_abs_diff_eq!(caldera_level(&grid, 0.8), 106.4, epsilon = 1e-4);
    }

    #[test]
    fn flat_grid_has_no_contour() {
        let grid = ElevationGrid::flat(8, 8, 250.0).unwrap();
        for ratio in [0.05, 0.5, 0.95] {
            let err = find_base_contour(&grid, ratio).unwrap_err();
            assert!(matches!(err, AnalysisError::NoContourFound { .. }));
            assert!(find_caldera_contour(&grid, ratio).is_err());
        }
    }

    #[test]
    fn peak_yields_single_closed_ring() {
        let grid = make_peak(21);
        let rings = trace_isolines(&grid, 500.0);
        assert_eq!(rings.len(), 1);
        let ring = &rings[0];
        assert!(ring.closed);
        assert_eq!(ring.points.first(), ring.points.last());
        // Every vertex sits on the level set radius sqrt(50 ln 2) ≈ 5.89.
        let c0 = 10.0;
        for p in &ring.points {
            let d = ((p.row - c0).powi(2) + (p.col - c0).powi(2)).sqrt();
            assert!((d - 5.887).abs() < 0.3, "vertex at radius {d}");
        }
    }

    #[test]
    fn ramp_gives_open_contour_spanning_grid() {
        // z = col; level 2.5 crosses between columns 2 and 3 on every row.
        let grid = ElevationGrid::from_fn(6, 4, 30.0, |_, c| c as f32).unwrap();
        let contour = longest_contour(&grid, 2.5).unwrap();
        assert!(!contour.closed);
        assert_eq!(contour.len(), 4);
        for p in &contour.points {
            assert_abs_diff_eq!(p.col, 2.5, epsilon = 1e-12);
        }
        let rows: Vec<f64> = contour.points.iter().map(|p| p.row).collect();
        assert!(rows == vec![0.0, 1.0, 2.0, 3.0] || rows == vec![3.0, 2.0, 1.0, 0.0]);
    }

    fn endpoints(c: &Contour) -> Vec<(f64, f64)> {
        c.points.iter().map(|p| (p.row, p.col)).collect()
    }

    #[test]
    fn saddle_isolates_high_corners() {
        // Centre mean 0.5 sits above the level, yet the high corners are
        // still cut off individually.
        let grid = ElevationGrid::new(vec![1.0, 0.0, 0.0, 1.0], 2, 2, 30.0).unwrap();
        let lines = trace_isolines(&grid, 0.4);
        assert_eq!(lines.len(), 2);
        let tl = endpoints(&lines[0]);
        assert_abs_diff_eq!(tl[0].0, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(tl[0].1, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tl[1].0, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tl[1].1, 0.6, epsilon = 1e-12);
        let br = endpoints(&lines[1]);
        assert_abs_diff_eq!(br[0].0, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(br[0].1, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(br[1].0, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(br[1].1, 0.4, epsilon = 1e-12);
    }

    #[test]
    fn anti_diagonal_saddle_isolates_high_corners() {
        // Centre mean 0.5 below the level: the answer does not change.
        let grid = ElevationGrid::new(vec![0.0, 1.0, 1.0, 0.0], 2, 2, 30.0).unwrap();
        let lines = trace_isolines(&grid, 0.6);
        assert_eq!(lines.len(), 2);
        // Top-right corner cut by the top and right edges.
        let tr = endpoints(&lines[0]);
        assert_abs_diff_eq!(tr[0].0, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tr[0].1, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(tr[1].0, 0.4, epsilon = 1e-12);
        assert_abs_diff_eq!(tr[1].1, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn longest_of_two_peaks_is_the_wider_one() {
        let grid = ElevationGrid::from_fn(40, 20, 30.0, |r, c| {
            let small = (-((r as f64 - 10.0).powi(2) + (c as f64 - 8.0).powi(2)) / 6.0).exp();
            let big = (-((r as f64 - 10.0).powi(2) + (c as f64 - 28.0).powi(2)) / 30.0).exp();
            (100.0 * small.max(big)) as f32
        })
        .unwrap();
        assert_eq!(trace_isolines(&grid, 50.0).len(), 2);
        let c = longest_contour(&grid, 50.0).unwrap();
        assert!(c.points.iter().all(|p| p.col > 18.0));
    }

    #[test]
    fn nan_cells_break_contours_open() {
        let mut grid = make_peak(21);
        grid.set(10, 4, f32::NAN);
        let contour = longest_contour(&grid, 500.0).unwrap();
        assert!(!contour.closed);
    }

    #[test]
    fn tracing_is_deterministic() {
        let grid = make_peak(31);
        assert_eq!(trace_isolines(&grid, 300.0), trace_isolines(&grid, 300.0));
    }
}
