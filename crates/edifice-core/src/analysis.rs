//! Volume workflow: contours → antipodal points → measurements → volume.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::antipodal::{fixed_offset_pair, slope_weighted_pair, AntipodalPair};
use crate::contour::{find_base_contour, find_caldera_contour, Contour};
use crate::error::Result;
use crate::fields::compute_sobel_magnitude;
use crate::grid::ElevationGrid;
use crate::measure::{pair_width, polygon_area, Area, Length};
use crate::params::VolumeParams;
use crate::volume::{estimate, VolumeEstimate, VolumeInputs, VolumeModel};

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Everything measured from the grid before a volume model is applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdificeGeometry {
    pub base_contour: Contour,
    pub caldera_contour: Contour,
    /// Fixed-offset pair on the base contour.
    pub base_pair: AntipodalPair,
    /// Slope-weighted pair on the caldera contour.
    pub rim_pair: AntipodalPair,
    pub base_width: Length,
    pub rim_width: Length,
    pub base_area: Area,
    pub caldera_area: Area,
    /// Grid maximum, used as the frustum height.
    pub peak_height_m: f64,
}

impl EdificeGeometry {
    pub fn measure(grid: &ElevationGrid, base_ratio: f64, caldera_ratio: f64) -> Result<Self> {
        grid.validate()?;
        let (w, h, px) = (grid.width, grid.height, grid.pixel_size);

        let base_contour = find_base_contour(grid, base_ratio)?;
        let base_pair = fixed_offset_pair(&base_contour, w, h)?;
        debug!(level = base_contour.level, n_points = base_contour.len(), "base contour");

        let slope = compute_sobel_magnitude(grid);
        let caldera_contour = find_caldera_contour(grid, caldera_ratio)?;
        let rim_pair = slope_weighted_pair(&caldera_contour, &slope)?;
        debug!(level = caldera_contour.level, n_points = caldera_contour.len(), "caldera contour");

        Ok(Self {
            base_width: pair_width(&base_pair, px),
            rim_width: pair_width(&rim_pair, px),
            base_area: polygon_area(&base_contour, px),
            caldera_area: polygon_area(&caldera_contour, px),
            peak_height_m: grid.max_elevation() as f64,
            base_contour,
            caldera_contour,
            base_pair,
            rim_pair,
        })
    }

    pub fn volume_inputs(&self) -> VolumeInputs {
        VolumeInputs {
            base_width_m: self.base_width.metres,
            rim_width_m: self.rim_width.metres,
            peak_height_m: self.peak_height_m,
            caldera_area_km2: self.caldera_area.km2(),
        }
    }
}

// ── Analysis ──────────────────────────────────────────────────────────────────

/// Result of one volume run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeAnalysis {
    pub model: VolumeModel,
    pub geometry: EdificeGeometry,
    pub estimate: VolumeEstimate,
}

impl VolumeAnalysis {
    fn from_geometry(model: VolumeModel, geometry: EdificeGeometry) -> Self {
        let estimate = estimate(model, &geometry.volume_inputs());
        Self { model, geometry, estimate }
    }

    /// Labelled, formatted result lines in presentation order.
    pub fn report(&self) -> AnalysisReport {
        let g = &self.geometry;
        let e = &self.estimate;
        let km2 = |v: f64| format!("{v:.2} km²");
        let km = |v: f64| format!("{v:.2} km");
        let km3 = |v: f64| format!("{v:.2} km³");
        AnalysisReport {
            title: self.model.title(),
            entries: vec![
                ReportEntry::new("Base area of the volcano", km2(g.base_area.km2())),
                ReportEntry::new(
                    "Base width (Distance between opposite points of the base)",
                    km(g.base_width.km()),
                ),
                ReportEntry::new("Caldera area of the volcano", km2(g.caldera_area.km2())),
                ReportEntry::new(
                    "Caldera width (Distance between opposite points of the caldera)",
                    km(g.rim_width.km()),
                ),
                ReportEntry::new("Total volume of the volcanic edifice", km3(e.edifice_km3)),
                ReportEntry::new("Caldera volume", km3(e.caldera_km3)),
                ReportEntry::new("Effective volume of the volcanic edifice", km3(e.effective_km3)),
            ],
        }
    }
}

/// Run the volume workflow on `grid` with the model in `params`.
pub fn analyze_volume(grid: &ElevationGrid, params: &VolumeParams) -> Result<VolumeAnalysis> {
    params.validate()?;
    let _span = info_span!("volume_analysis", width = grid.width, height = grid.height).entered();
    let geometry = EdificeGeometry::measure(grid, params.base_ratio, params.caldera_ratio)?;
    let analysis = VolumeAnalysis::from_geometry(params.model, geometry);
    info!(
        model = %analysis.model.title(),
        effective_km3 = analysis.estimate.effective_km3,
        "volume analysis complete"
    );
    Ok(analysis)
}

/// Measure once and apply every volume model, in [`VolumeModel::ALL`] order.
/// The model in `params` is ignored.
pub fn analyze_all_models(grid: &ElevationGrid, params: &VolumeParams) -> Result<Vec<VolumeAnalysis>> {
    params.validate()?;
    let _span = info_span!("volume_comparison", width = grid.width, height = grid.height).entered();
    let geometry = EdificeGeometry::measure(grid, params.base_ratio, params.caldera_ratio)?;
    Ok(VolumeModel::ALL
        .iter()
        .map(|&model| VolumeAnalysis::from_geometry(model, geometry.clone()))
        .collect())
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportEntry {
    pub label: &'static str,
    pub value: String,
}

impl ReportEntry {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub title: String,
    pub entries: Vec<ReportEntry>,
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        for entry in &self.entries {
            writeln!(f, "{}: {}", entry.label, entry.value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::synthetic::SyntheticCone;
    use crate::volume::{BaseShape, CalderaModel};
    use std::f64::consts::PI;

    fn gaussian_cone() -> ElevationGrid {
        SyntheticCone::Gaussian { peak: 1000.0, scale: 30.0 }.build(100, 30.0).unwrap()
    }

    #[test]
    fn gaussian_cone_end_to_end() {
        let grid = gaussian_cone();
        let a = analyze_volume(&grid, &VolumeParams::default()).unwrap();
        assert!(a.geometry.base_width.metres > 0.0);
        assert!(a.geometry.rim_width.metres > 0.0);
        assert!(a.estimate.caldera_km3 > 0.0);
        assert!(a.estimate.effective_km3 < a.estimate.edifice_km3);
        assert_eq!(a.geometry.peak_height_m, grid.max_elevation() as f64);
        assert!(a.geometry.caldera_contour.closed);

        let again = analyze_volume(&grid, &VolumeParams::default()).unwrap();
        assert_eq!(a, again);
    }

    #[test]
    fn caldera_width_tracks_ring_diameter() {
        // 0.8 level of the cone sits at 30·sqrt(ln 1.25) ≈ 14.1 cells.
        let a = analyze_volume(&gaussian_cone(), &VolumeParams::default()).unwrap();
        let diameter = 2.0 * 30.0 * 1.25f64.ln().sqrt();
        assert!((a.geometry.rim_width.pixels - diameter).abs() < 2.0);
    }

    #[test]
    fn flat_topped_base_area_converges_to_disc() {
        let rel_error = |size: usize| {
            let s = size as f64 / 100.0;
            let cone = SyntheticCone::FlatTopped {
                peak: 800.0,
                base_radius: 40.0 * s,
                rim_radius: 10.0 * s,
            };
            let grid = cone.build(size, 30.0).unwrap();
            let geometry = EdificeGeometry::measure(&grid, 0.05, 0.8).unwrap();
            let r = cone.level_radius(0.05 * 800.0).unwrap();
            let expected = PI * r * r;
            (geometry.base_area.pixels - expected).abs() / expected
        };
        let coarse = rel_error(50);
        let fine = rel_error(200);
        assert!(coarse < 0.02, "coarse error {coarse}");
        assert!(fine < coarse, "fine {fine} vs coarse {coarse}");
    }

    #[test]
    fn flat_grid_reports_missing_contour() {
        let grid = ElevationGrid::flat(20, 20, 120.0).unwrap();
        let err = analyze_volume(&grid, &VolumeParams::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::NoContourFound { .. }));
    }

    #[test]
    fn all_models_share_geometry() {
        let runs = analyze_all_models(&gaussian_cone(), &VolumeParams::default()).unwrap();
        assert_eq!(runs.len(), 4);
        for run in &runs[1..] {
            assert_eq!(run.geometry, runs[0].geometry);
            assert_eq!(run.estimate.edifice_km3, runs[0].estimate.edifice_km3);
        }
        // Cylinder removes more than the hemispheroid.
        assert!(runs[1].estimate.caldera_km3 > runs[0].estimate.caldera_km3);
    }

    #[test]
    fn report_lists_seven_formatted_lines() {
        let model = VolumeModel {
            base_shape: BaseShape::Elliptical,
            caldera_model: CalderaModel::Cylinder,
        };
        let params = VolumeParams { model, ..VolumeParams::default() };
        let report = analyze_volume(&gaussian_cone(), &params).unwrap().report();
        assert_eq!(report.title, "Calculation Results - Elliptical Base, Approximation Type 2");
        assert_eq!(report.entries.len(), 7);
        assert_eq!(report.entries[0].label, "Base area of the volcano");
        assert!(report.entries[0].value.ends_with(" km²"));
        assert!(report.entries[3].value.ends_with(" km"));
        assert!(report.entries[6].value.ends_with(" km³"));
        let text = report.to_string();
        assert!(text.starts_with("Calculation Results"));
        assert!(text.contains("Caldera volume: "));
    }
}
