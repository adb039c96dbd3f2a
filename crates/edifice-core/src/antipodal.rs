//! Antipodal Point Selector: the two contour points that stand for a width.
use serde::{Deserialize, Serialize};

use crate::contour::Contour;
use crate::error::{AnalysisError, Result};
use crate::fields::DerivativeField;

/// Integer cell coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntipodalPair {
    pub first: GridPoint,
    pub second: GridPoint,
}

/// Round every vertex to the nearest cell (ties to even), dropping those outside a
/// `width × height` grid.
pub fn round_to_grid(contour: &Contour, width: usize, height: usize) -> Result<Vec<GridPoint>> {
    let points: Vec<GridPoint> = contour
        .points
        .iter()
        .filter_map(|p| {
            let (r, c) = (p.row.round_ties_even(), p.col.round_ties_even());
            let inside = r >= 0.0 && c >= 0.0 && (r as usize) < height && (c as usize) < width;
            inside.then(|| GridPoint { row: r as usize, col: c as usize })
        })
        .collect();
    if points.is_empty() {
        return Err(AnalysisError::EmptyContour);
    }
    Ok(points)
}

/// Points at indices `0` and `len/2` of the rounded contour.
pub fn fixed_offset_pair(contour: &Contour, width: usize, height: usize) -> Result<AntipodalPair> {
    let points = round_to_grid(contour, width, height)?;
    Ok(AntipodalPair { first: points[0], second: points[points.len() / 2] })
}

/// Steepest point of the rounded contour under `slope`, paired with the
/// point half the contour away.
///
/// The first maximum wins ties; NaN slope values never win.
pub fn slope_weighted_pair(contour: &Contour, slope: &DerivativeField) -> Result<AntipodalPair> {
    let points = round_to_grid(contour, slope.width, slope.height)?;
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in points.iter().enumerate() {
        let s = slope.get(p.row, p.col);
        if s.is_nan() {
            continue;
        }
        if best.map_or(true, |(_, b)| s > b) {
            best = Some((i, s));
        }
    }
    let argmax = best.map_or(0, |(i, _)| i);
    let opposite = (argmax + points.len() / 2) % points.len();
    Ok(AntipodalPair { first: points[argmax], second: points[opposite] })
}
