//! Terrain-analysis mode: the fixed twelve-slot field catalog and the suite
//! that fills it.
//!
//! The catalog is laid out as four panels of three. Titles, units, blurbs and
//! colour-map names are opaque metadata for whatever renders the panels.
use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, info_span};

use super::{
    compute_aspect, compute_convexity, compute_curvature, compute_gaussian_curvature,
    compute_hillshade, compute_roughness, compute_shaded_relief, compute_slope_scaled,
    compute_slope_unit, compute_smoothed_curvature, DerivativeField, FieldKind,
};
use crate::error::Result;
use crate::grid::ElevationGrid;
use crate::maybe_rayon::*;
use crate::params::TerrainParams;
use crate::stats::FieldStats;

/// Display metadata for one catalog slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub kind: FieldKind,
    pub title: &'static str,
    pub unit: &'static str,
    pub description: &'static str,
    /// Colour-map name hint for the renderer.
    pub colormap: &'static str,
}

const DEM_DESCRIPTOR: FieldDescriptor = FieldDescriptor {
    kind: FieldKind::Elevation,
    title: "DEM",
    unit: "m",
    description: "Represents terrain elevation in meters above sea level.",
    colormap: "terrain",
};

/// Slots in display order; panels are consecutive triples.
pub static FIELD_CATALOG: [FieldDescriptor; 12] = [
    DEM_DESCRIPTOR,
    FieldDescriptor {
        kind: FieldKind::ShadedRelief,
        title: "Shaded Relief",
        unit: "Adimensional",
        description: "Simulates light and shadow effects on the terrain.",
        colormap: "gray",
    },
    FieldDescriptor {
        kind: FieldKind::Hillshade,
        title: "Hillshade",
        unit: "Adimensional",
        description: "Relative terrain illumination (Sun Alt 45°, Az 45°).",
        colormap: "gray",
    },
    DEM_DESCRIPTOR,
    FieldDescriptor {
        kind: FieldKind::SlopeUnit,
        title: "Slope 1",
        unit: "Degrees",
        description: "Slope in degrees (method 1).",
        colormap: "plasma",
    },
    FieldDescriptor {
        kind: FieldKind::SlopeScaled,
        title: "Slope 2",
        unit: "Degrees",
        description: "Slope in degrees (method 2, uses DEM resolution).",
        colormap: "plasma",
    },
    DEM_DESCRIPTOR,
    FieldDescriptor {
        kind: FieldKind::Roughness,
        title: "Roughness",
        unit: "Adimensional",
        description: "Measures local variations in elevation.",
        colormap: "seismic",
    },
    FieldDescriptor {
        kind: FieldKind::Convexity,
        title: "Convexity",
        unit: "Adimensional",
        description: "Shows whether terrain areas are convex or concave.",
        colormap: "twilight",
    },
    FieldDescriptor {
        kind: FieldKind::Aspect,
        title: "Aspect",
        unit: "Degrees",
        description: "Direction of slope (°): 0°=N, clockwise to 360°.",
        colormap: "twilight",
    },
    FieldDescriptor {
        kind: FieldKind::SmoothedCurvatureNormalized,
        title: "Amplified and Smoothed Curvature",
        unit: "Adimensional",
        description: "Smoothed curvature for improved interpretation.",
        colormap: "plasma",
    },
    FieldDescriptor {
        kind: FieldKind::GaussianCurvatureNormalized,
        title: "Logarithmic Amplified Gaussian Curvature",
        unit: "Adimensional",
        description: "Gaussian curvature for detailed terrain analysis.",
        colormap: "plasma",
    },
];

/// Independent jobs of the suite. Each yields one or two fields.
#[derive(Debug, Clone, Copy)]
enum Job {
    ShadedRelief,
    Hillshade,
    SlopeUnit,
    SlopeScaled,
    Roughness,
    Convexity,
    Aspect,
    Curvature,
    SmoothedCurvature,
    GaussianCurvature,
}

const JOBS: [Job; 10] = [
    Job::ShadedRelief,
    Job::Hillshade,
    Job::SlopeUnit,
    Job::SlopeScaled,
    Job::Roughness,
    Job::Convexity,
    Job::Aspect,
    Job::Curvature,
    Job::SmoothedCurvature,
    Job::GaussianCurvature,
];

fn run_job(job: Job, grid: &ElevationGrid, p: &TerrainParams) -> Result<Vec<DerivativeField>> {
    debug!(?job, "computing field");
    Ok(match job {
        Job::ShadedRelief => vec![compute_shaded_relief(grid, p.relief_scale)],
        Job::Hillshade => vec![compute_hillshade(grid, p.sun_azimuth_deg, p.sun_altitude_deg)],
        Job::SlopeUnit => vec![compute_slope_unit(grid)],
        Job::SlopeScaled => vec![compute_slope_scaled(grid)],
        Job::Roughness => vec![compute_roughness(grid, p.roughness_window)?],
        Job::Convexity => vec![compute_convexity(grid, p.convexity_amplification)],
        Job::Aspect => vec![compute_aspect(grid)],
        Job::Curvature => vec![compute_curvature(grid)],
        Job::SmoothedCurvature => {
            let sc = compute_smoothed_curvature(grid, p.curvature_amplification, p.smoothing_sigma)?;
            vec![sc.smoothed, sc.normalized]
        }
        Job::GaussianCurvature => {
            let gc = compute_gaussian_curvature(grid, p.gaussian_amplification, p.smoothing_sigma)?;
            vec![gc.log, gc.normalized]
        }
    })
}

/// Every derived field of the terrain battery, keyed by kind.
#[derive(Debug, Clone)]
pub struct TerrainSuite {
    fields: HashMap<FieldKind, DerivativeField>,
}

impl TerrainSuite {
    /// Compute the whole battery. Fails if any field fails, e.g. with
    /// `DegenerateNormalization` on terrain with no curvature.
    pub fn compute(grid: &ElevationGrid, params: &TerrainParams) -> Result<Self> {
        grid.validate()?;
        params.validate()?;
        let _span = info_span!("terrain_suite", width = grid.width, height = grid.height).entered();

        let results: Vec<Result<Vec<DerivativeField>>> =
            JOBS.into_par_iter().map(|job| run_job(job, grid, params)).collect();

        let mut fields = HashMap::new();
        fields.insert(FieldKind::Elevation, DerivativeField::elevation(grid));
        for produced in results {
            for field in produced? {
                fields.insert(field.kind, field);
            }
        }
        info!(n_fields = fields.len(), "terrain suite complete");
        Ok(Self { fields })
    }

    pub fn field(&self, kind: FieldKind) -> Option<&DerivativeField> {
        self.fields.get(&kind)
    }

    /// Catalog slots paired with their computed fields, in display order.
    pub fn catalog(&self) -> Vec<(&'static FieldDescriptor, &DerivativeField)> {
        FIELD_CATALOG
            .iter()
            .filter_map(|d| self.fields.get(&d.kind).map(|f| (d, f)))
            .collect()
    }

    /// The catalog grouped into its four display panels.
    pub fn panels(&self) -> Vec<Vec<(&'static FieldDescriptor, &DerivativeField)>> {
        self.catalog().chunks(3).map(|c| c.to_vec()).collect()
    }

    /// Summary statistics of the un-normalised curvature products, keyed by
    /// display title.
    pub fn curvature_statistics(&self) -> BTreeMap<&'static str, FieldStats> {
        let mut out = BTreeMap::new();
        if let Some(f) = self.field(FieldKind::GaussianCurvatureLog) {
            out.insert("Logarithmic Amplified Gaussian Curvature", FieldStats::of(f));
        }
        if let Some(f) = self.field(FieldKind::SmoothedCurvature) {
            out.insert("Amplified and Smoothed Curvature", FieldStats::of(f));
        }
        out
    }

    /// Statistics for every catalog slot, keyed by display title.
    pub fn catalog_statistics(&self) -> BTreeMap<&'static str, FieldStats> {
        self.catalog().into_iter().map(|(d, f)| (d.title, FieldStats::of(f))).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;

    fn hill(n: usize) -> ElevationGrid {
        let c0 = (n / 2) as f64;
        ElevationGrid::from_fn(n, n, 30.0, |r, c| {
            let d2 = (r as f64 - c0).powi(2) + (c as f64 - c0).powi(2);
            (800.0 * (-d2 / 60.0).exp()) as f32
        })
        .unwrap()
    }

    #[test]
    fn catalog_has_four_panels_of_three() {
        assert_eq!(FIELD_CATALOG.len(), 12);
        let dem_slots: Vec<usize> = FIELD_CATALOG
            .iter()
            .enumerate()
            .filter(|(_, d)| d.kind == FieldKind::Elevation)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(dem_slots, vec![0, 3, 6]);
        assert_eq!(FIELD_CATALOG[9].title, "Aspect");
    }

    #[test]
    fn suite_fills_every_slot_with_grid_shaped_fields() {
        let grid = hill(24);
        let suite = TerrainSuite::compute(&grid, &TerrainParams::default()).unwrap();
        let panels = suite.panels();
        assert_eq!(panels.len(), 4);
        assert!(panels.iter().all(|p| p.len() == 3));
        for (_, field) in suite.catalog() {
            assert_eq!(field.shape(), (grid.height, grid.width));
        }
        assert!(suite.field(FieldKind::GaussianCurvatureLog).is_some());
        assert!(suite.field(FieldKind::SmoothedCurvature).is_some());
        assert!(suite.field(FieldKind::Curvature).is_some());
    }

    #[test]
    fn curvature_statistics_cover_both_products() {
        let suite = TerrainSuite::compute(&hill(24), &TerrainParams::default()).unwrap();
        let stats = suite.curvature_statistics();
        assert_eq!(stats.len(), 2);
        let g = stats["Logarithmic Amplified Gaussian Curvature"];
        assert!(g.min >= 0.0 && g.max > g.min);
        assert_eq!(suite.catalog_statistics().len(), 10);
    }

    #[test]
    fn flat_grid_surfaces_degenerate_normalisation() {
        let grid = ElevationGrid::flat(10, 10, 3.0).unwrap();
        let err = TerrainSuite::compute(&grid, &TerrainParams::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::DegenerateNormalization { .. }));
    }
}
