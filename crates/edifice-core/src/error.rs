//! Error type shared by every analysis stage.

use thiserror::Error;

use crate::fields::FieldKind;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid grid dimensions: {width}x{height} (need at least 2x2)")]
    InvalidDimensions { width: usize, height: usize },

    #[error("grid data length {actual} does not match {width}x{height}")]
    DataLengthMismatch {
        width: usize,
        height: usize,
        actual: usize,
    },

    #[error("no contour found at elevation level {level}")]
    NoContourFound { level: f64 },

    #[error("no contour point falls inside the grid after rounding")]
    EmptyContour,

    #[error("cannot normalise {field:?}: field has zero range")]
    DegenerateNormalization { field: FieldKind },

    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
