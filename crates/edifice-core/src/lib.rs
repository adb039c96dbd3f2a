//! Morphometry of cone-shaped landforms from a single-band elevation grid.
//!
//! Two workflows share the grid type:
//! - the volume workflow ([`analysis`]) traces base and caldera contours,
//!   picks antipodal points, measures widths and areas, and applies one of
//!   four frustum-minus-caldera volume models;
//! - the terrain workflow ([`fields::TerrainSuite`]) computes the battery of
//!   derivative fields and their summary statistics.

pub mod analysis;
pub mod antipodal;
pub mod contour;
pub mod error;
pub mod fields;
pub mod grid;
pub(crate) mod maybe_rayon;
pub mod measure;
pub mod params;
pub mod stats;
pub mod synthetic;
pub mod volume;

pub use analysis::{analyze_all_models, analyze_volume, AnalysisReport, VolumeAnalysis};
pub use error::{AnalysisError, Result};
pub use fields::{DerivativeField, FieldKind, TerrainSuite};
pub use grid::ElevationGrid;
pub use params::{TerrainParams, VolumeParams};
pub use stats::FieldStats;
pub use volume::{BaseShape, CalderaModel, VolumeModel};
