//! Finite-difference kernels shared by the field operators: NumPy-style
//! first differences, mirror reflection and the 3×3 Sobel stencil.

/// Array axis of a row-major grid: `Row` is axis 0, `Col` is axis 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    Row,
    Col,
}

/// First difference of `values` along `axis` with sample spacing `spacing`.
///
/// Interior cells use the central difference `(f[i+1] − f[i−1]) / 2h`;
/// the two border cells use one-sided differences `(f[1] − f[0]) / h` and
/// `(f[n−1] − f[n−2]) / h`. Requires at least two samples along `axis`.
pub(crate) fn diff_axis(
    values: &[f64],
    width: usize,
    height: usize,
    axis: Axis,
    spacing: f64,
) -> Vec<f64> {
    let mut out = vec![0.0f64; values.len()];
    let at = |r: usize, c: usize| values[r * width + c];

    match axis {
        Axis::Row => {
            for r in 0..height {
                for c in 0..width {
                    out[r * width + c] = if r == 0 {
                        (at(1, c) - at(0, c)) / spacing
                    } else if r == height - 1 {
                        (at(r, c) - at(r - 1, c)) / spacing
                    } else {
                        (at(r + 1, c) - at(r - 1, c)) / (2.0 * spacing)
                    };
                }
            }
        }
        Axis::Col => {
            for r in 0..height {
                for c in 0..width {
                    out[r * width + c] = if c == 0 {
                        (at(r, 1) - at(r, 0)) / spacing
                    } else if c == width - 1 {
                        (at(r, c) - at(r, c - 1)) / spacing
                    } else {
                        (at(r, c + 1) - at(r, c - 1)) / (2.0 * spacing)
                    };
                }
            }
        }
    }
    out
}

/// `(dz/drow, dz/dcol)` with the same spacing on both axes.
pub(crate) fn gradient(
    values: &[f64],
    width: usize,
    height: usize,
    spacing: f64,
) -> (Vec<f64>, Vec<f64>) {
    (
        diff_axis(values, width, height, Axis::Row, spacing),
        diff_axis(values, width, height, Axis::Col, spacing),
    )
}

/// Map a possibly out-of-range index onto `0..n` by mirror reflection about
/// the array edge (`d c b a | a b c d | d c b a`).
#[inline]
pub(crate) fn reflect_index(i: isize, n: usize) -> usize {
    let period = 2 * n as isize;
    let m = i.rem_euclid(period);
    if m < n as isize {
        m as usize
    } else {
        (period - 1 - m) as usize
    }
}

/// Sobel 3×3 gradient at `(r, c)` with mirror-reflected borders.
///
/// Returns `(g_col, g_row)`, unnormalised (no division by 8 or cellsize).
///
/// 3×3 neighbourhood layout:
/// ```text
///   NW(-1,-1)  N(-1, 0)  NE(-1,+1)
///   W ( 0,-1)  *         E ( 0,+1)
///   SW(+1,-1)  S(+1, 0)  SE(+1,+1)
/// ```
///
/// `g_col = (NE + 2E + SE) − (NW + 2W + SW)`
/// `g_row = (SW + 2S + SE) − (NW + 2N + NE)`
pub(crate) fn sobel_gradient(
    values: &[f64],
    width: usize,
    height: usize,
    r: usize,
    c: usize,
) -> (f64, f64) {
    let at = |dr: isize, dc: isize| {
        let rr = reflect_index(r as isize + dr, height);
        let cc = reflect_index(c as isize + dc, width);
        values[rr * width + cc]
    };
    let nw = at(-1, -1);
    let n  = at(-1,  0);
    let ne = at(-1,  1);
    let w  = at( 0, -1);
    let e  = at( 0,  1);
    let sw = at( 1, -1);
    let s  = at( 1,  0);
    let se = at( 1,  1);

    let g_col = (ne + 2.0 * e + se) - (nw + 2.0 * w + sw);
    let g_row = (sw + 2.0 * s + se) - (nw + 2.0 * n + ne);
    (g_col, g_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_matches_central_and_one_sided_rules() {
        // Single row: [1, 2, 4, 7]
        let v = [1.0, 2.0, 4.0, 7.0];
        let d = diff_axis(&v, 4, 1, Axis::Col, 1.0);
        assert_eq!(d, vec![1.0, 1.5, 2.5, 3.0]);
    }

    #[test]
    fn diff_honours_spacing_on_rows() {
        // 2 columns × 3 rows, value = 10 * row
        let v = [0.0, 0.0, 10.0, 10.0, 20.0, 20.0];
        let d = diff_axis(&v, 2, 3, Axis::Row, 5.0);
        assert!(d.iter().all(|&x| (x - 2.0).abs() < 1e-12));
    }

    #[test]
    fn reflect_index_mirrors_both_sides() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(2, 4), 2);
        // Wider than the array: repeated reflection.
        assert_eq!(reflect_index(-3, 2), 1);
        assert_eq!(reflect_index(4, 2), 0);
    }

    #[test]
    fn sobel_on_column_ramp() {
        // z = col, 4×4: g_col = 8 in the interior, g_row = 0.
        let v: Vec<f64> = (0..16).map(|i| (i % 4) as f64).collect();
        let (gc, gr) = sobel_gradient(&v, 4, 4, 1, 1);
        assert_eq!(gc, 8.0);
        assert_eq!(gr, 0.0);
    }
}
