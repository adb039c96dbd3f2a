//! Volume Estimator: frustum edifice volume minus a caldera model.
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Footprint assumption for the caldera.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseShape {
    /// Caldera volume from the rim radius alone.
    #[default]
    Circular,
    /// Caldera volume from the traced caldera area and the rim width.
    Elliptical,
}

/// Shape of the removed caldera solid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalderaModel {
    /// Approximation type 1.
    #[default]
    Hemispheroid,
    /// Approximation type 2. Only the circular base distinguishes it from
    /// type 1.
    Cylinder,
}

/// One of the four volume models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VolumeModel {
    pub base_shape: BaseShape,
    pub caldera_model: CalderaModel,
}

impl VolumeModel {
    pub const ALL: [VolumeModel; 4] = [
        VolumeModel { base_shape: BaseShape::Circular, caldera_model: CalderaModel::Hemispheroid },
        VolumeModel { base_shape: BaseShape::Circular, caldera_model: CalderaModel::Cylinder },
        VolumeModel { base_shape: BaseShape::Elliptical, caldera_model: CalderaModel::Hemispheroid },
        VolumeModel { base_shape: BaseShape::Elliptical, caldera_model: CalderaModel::Cylinder },
    ];

    /// Report heading, e.g. "Calculation Results - Circular Base, Approximation Type 1".
    pub fn title(&self) -> String {
        let shape = match self.base_shape {
            BaseShape::Circular => "Circular",
            BaseShape::Elliptical => "Elliptical",
        };
        let approx = match self.caldera_model {
            CalderaModel::Hemispheroid => 1,
            CalderaModel::Cylinder => 2,
        };
        format!("Calculation Results - {shape} Base, Approximation Type {approx}")
    }
}

/// Measured quantities the estimator consumes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeInputs {
    /// Distance between the base antipodal points, metres.
    pub base_width_m: f64,
    /// Distance between the rim antipodal points, metres.
    pub rim_width_m: f64,
    /// Grid maximum elevation, metres.
    pub peak_height_m: f64,
    /// Area enclosed by the caldera contour, km².
    pub caldera_area_km2: f64,
}

/// Volumes in km³. `effective_km3` may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeEstimate {
    pub edifice_km3: f64,
    pub caldera_km3: f64,
    pub effective_km3: f64,
}

/// Frustum with radii `base_width/2`, `rim_width/2` and height `peak`, in km³.
pub fn edifice_volume_km3(inputs: &VolumeInputs) -> f64 {
    let r1 = inputs.base_width_m / 2.0;
    let r2 = inputs.rim_width_m / 2.0;
    (PI / 3.0) * inputs.peak_height_m * (r1 * r1 + r2 * r2 + r1 * r2) * 1e-9
}

/// Caldera volume in km³ under `model`.
pub fn caldera_volume_km3(model: VolumeModel, inputs: &VolumeInputs) -> f64 {
    let rim_km = inputs.rim_width_m * 1e-3;
    match model.base_shape {
        BaseShape::Circular => {
            let r2 = rim_km / 2.0;
            match model.caldera_model {
                CalderaModel::Hemispheroid => (2.0 / 3.0) * PI * r2.powi(3),
                CalderaModel::Cylinder => PI * r2 * r2 * r2,
            }
        }
        BaseShape::Elliptical => {
            // Equivalent radius² from the traced area, depth half the rim width.
            // Both approximation types share the 2/3·π coefficient.
            let r_sq = inputs.caldera_area_km2 / PI;
            let depth = rim_km / 2.0;
            (2.0 / 3.0) * PI * r_sq * depth
        }
    }
}

pub fn estimate(model: VolumeModel, inputs: &VolumeInputs) -> VolumeEstimate {
    let edifice_km3 = edifice_volume_km3(inputs);
    let caldera_km3 = caldera_volume_km3(model, inputs);
    VolumeEstimate { edifice_km3, caldera_km3, effective_km3: edifice_km3 - caldera_km3 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn inputs(base_m: f64, rim_m: f64, h: f64, area_km2: f64) -> VolumeInputs {
        VolumeInputs {
            base_width_m: base_m,
            rim_width_m: rim_m,
            peak_height_m: h,
            caldera_area_km2: area_km2,
        }
    }

    #[test]
    fn equal_radii_give_cylinder() {
        let i = inputs(4000.0, 4000.0, 500.0, 0.0);
        // π·(2000 m)²·500 m = 6.283e9 m³
        assert_relative_eq!(edifice_volume_km3(&i), PI * 4e6 * 500.0 * 1e-9, max_relative = 1e-12);
    }

    #[test]
    fn four_caldera_models() {
        // rim 2 km → r2 = 1 km; area π km² → equivalent r² = 1.
        let i = inputs(10_000.0, 2000.0, 1000.0, PI);
        let v = |m: usize| caldera_volume_km3(VolumeModel::ALL[m], &i);
        assert_relative_eq!(v(0), 2.0 / 3.0 * PI, max_relative = 1e-12);
        assert_relative_eq!(v(1), PI, max_relative = 1e-12);
        assert_relative_eq!(v(2), 2.0 / 3.0 * PI, max_relative = 1e-12);
        assert_relative_eq!(v(3), 2.0 / 3.0 * PI, max_relative = 1e-12);
    }

    #[test]
    fn elliptical_approximations_share_coefficient() {
        let i = inputs(8000.0, 3400.0, 900.0, 5.5);
        let hemi = caldera_volume_km3(VolumeModel::ALL[2], &i);
        let cyl = caldera_volume_km3(VolumeModel::ALL[3], &i);
        // (2/3)·π·(A/π)·(d/2) with d = 3.4 km
        assert_relative_eq!(cyl, 2.0 / 3.0 * 5.5 * 1.7, max_relative = 1e-12);
        assert_eq!(hemi, cyl);
    }

    #[test]
    fn elliptical_models_use_traced_area() {
        let a = inputs(10_000.0, 2000.0, 1000.0, 2.0);
        let b = inputs(10_000.0, 2000.0, 1000.0, 4.0);
        let m = VolumeModel { base_shape: BaseShape::Elliptical, caldera_model: CalderaModel::Cylinder };
        assert_relative_eq!(
            caldera_volume_km3(m, &b),
            2.0 * caldera_volume_km3(m, &a),
            max_relative = 1e-12
        );
    }

    #[test]
    fn effective_volume_may_go_negative() {
        // Wide rim on a low edifice.
        let i = inputs(3000.0, 3000.0, 10.0, 7.0);
        let e = estimate(VolumeModel::default(), &i);
        assert!(e.effective_km3 < 0.0);
        assert_relative_eq!(e.effective_km3, e.edifice_km3 - e.caldera_km3);
    }

    #[test]
    fn titles_name_shape_and_approximation() {
        let titles: Vec<String> = VolumeModel::ALL.iter().map(VolumeModel::title).collect();
        assert_eq!(titles[0], "Calculation Results - Circular Base, Approximation Type 1");
        assert_eq!(titles[3], "Calculation Results - Elliptical Base, Approximation Type 2");
    }

    #[test]
    fn model_deserialises_from_variant_names() {
        let m: VolumeModel =
            serde_json::from_str(r#"{"base_shape":"Elliptical","caldera_model":"Hemispheroid"}"#)
                .unwrap();
        assert_eq!(m, VolumeModel::ALL[2]);
    }
}
