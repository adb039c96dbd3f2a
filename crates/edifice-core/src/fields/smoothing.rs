//! Separable Gaussian blur with mirror-reflected borders.

use super::gradient::reflect_index;

/// Kernel half-width in multiples of sigma.
const TRUNCATE: f64 = 4.0;

/// Normalised 1-D Gaussian weights for offsets `-radius..=radius`.
fn kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let two_s2 = 2.0 * sigma * sigma;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-((x * x) as f64) / two_s2).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Blur `values` (row-major `width × height`) with an isotropic Gaussian of
/// standard deviation `sigma` cells. `sigma <= 0` returns a copy.
pub(crate) fn gaussian_blur(values: &[f64], width: usize, height: usize, sigma: f64) -> Vec<f64> {
    if sigma <= 0.0 {
        return values.to_vec();
    }
    let k = kernel(sigma);
    let radius = (k.len() / 2) as isize;

    // Pass 1: along rows (axis 0).
    let mut tmp = vec![0.0f64; values.len()];
    for r in 0..height {
        for c in 0..width {
            let mut acc = 0.0;
            for (i, w) in k.iter().enumerate() {
                let rr = reflect_index(r as isize + i as isize - radius, height);
                acc += w * values[rr * width + c];
            }
            tmp[r * width + c] = acc;
        }
    }

    // Pass 2: along columns (axis 1).
    let mut out = vec![0.0f64; values.len()];
    for r in 0..height {
        for c in 0..width {
            let mut acc = 0.0;
            for (i, w) in k.iter().enumerate() {
                let cc = reflect_index(c as isize + i as isize - radius, width);
                acc += w * tmp[r * width + cc];
            }
            out[r * width + c] = acc;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn kernel_sigma_one_has_radius_four_and_unit_mass() {
        let k = kernel(1.0);
        assert_eq!(k.len(), 9);
        assert_abs_diff_eq!(k.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert!(k[4] > k[3] && k[3] > k[2]);
    }

    #[test]
    fn blur_preserves_constant_field() {
        let v = vec![7.0; 5 * 4];
        let out = gaussian_blur(&v, 5, 4, 1.0);
        for x in out {
            assert_abs_diff_eq!(x, 7.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn blur_preserves_total_mass_of_interior_impulse() {
        let (w, h) = (21, 21);
        let mut v = vec![0.0; w * h];
        v[10 * w + 10] = 1.0;
        let out = gaussian_blur(&v, w, h, 1.0);
        assert_abs_diff_eq!(out.iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        assert!(out[10 * w + 10] < 1.0);
        assert!(out[10 * w + 11] > 0.0);
    }
}
