//! Statistics Aggregator: five-number summary of a derivative field.
//!
//! No masking happens here. A single NaN anywhere in the input makes every
//! statistic NaN; callers that want no-data excluded mask the grid first.
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::fields::DerivativeField;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation.
    pub std: f64,
}

impl FieldStats {
    const NAN: FieldStats = FieldStats {
        min: f64::NAN,
        max: f64::NAN,
        mean: f64::NAN,
        median: f64::NAN,
        std: f64::NAN,
    };

    /// Summarise every cell of `field`.
    pub fn of(field: &DerivativeField) -> Self {
        Self::of_values(field.data.iter().map(|&v| v as f64))
    }

    /// Summarise the rectangular window `rows × cols` (half-open ranges).
    pub fn of_window(
        field: &DerivativeField,
        rows: std::ops::Range<usize>,
        cols: std::ops::Range<usize>,
    ) -> Result<Self> {
        if rows.is_empty() || cols.is_empty() || rows.end > field.height || cols.end > field.width {
            return Err(AnalysisError::InvalidParameter {
                name: "window",
                value: format!("rows {rows:?}, cols {cols:?}"),
                reason: format!("must be non-empty and within {}x{}", field.width, field.height),
            });
        }
        let values = rows.flat_map(|r| cols.clone().map(move |c| (r, c)));
        Ok(Self::of_values(values.map(|(r, c)| field.get(r, c) as f64)))
    }

    fn of_values(values: impl Iterator<Item = f64>) -> Self {
        let mut v: Vec<f64> = values.collect();
        if v.is_empty() || v.iter().any(|x| x.is_nan()) {
            return Self::NAN;
        }
        let n = v.len() as f64;
        let mean = v.iter().sum::<f64>() / n;
        let var = v.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;

        v.sort_by(|a, b| a.total_cmp(b));
        let mid = v.len() / 2;
        let median = if v.len() % 2 == 0 { (v[mid - 1] + v[mid]) / 2.0 } else { v[mid] };

        FieldStats {
            min: v[0],
            max: v[v.len() - 1],
            mean,
            median,
            std: var.sqrt(),
        }
    }
}
