//! Canonical representatives of polynomial phase under integer-cycle ambiguity.
//!
//! Two phase polynomials produce identical wrapped samples on the integer
//! time grid whenever they differ by an integer-valued polynomial. Those form
//! a lattice spanned by the binomial polynomials
//!
//! ```text
//! 1,  t,  t(t+1)/2,  t(t+1)(t+2)/6,  ...
//! ```
//!
//! [`alias_lattice`] stores their coefficient vectors as the columns of a
//! generator matrix `P`. [`unalias_poly`] subtracts the lattice point that
//! successive rounding (Babai's nearest plane) finds in the QR coordinates of
//! `P`, which picks one representative per equivalence class.

use nalgebra::{DMatrix, DVector};

/// Generator matrix of the aliasing lattice for polynomials of length `len`.
///
/// Column 0 is the constant polynomial 1; column `k` is column `k-1`
/// multiplied by `(t + k - 1)` and divided by `k`. Coefficients are highest
/// power first, so column `k` occupies the bottom `k + 1` rows.
pub fn alias_lattice(len: usize) -> DMatrix<f64> {
    let mut p = DMatrix::zeros(len, len);
    if len == 0 {
        return p;
    }
    p[(len - 1, 0)] = 1.0;
    for k in 1..len {
        let shift = (k - 1) as f64;
        for r in 0..len {
            let raised = if r + 1 < len { p[(r + 1, k - 1)] } else { 0.0 };
            p[(r, k)] = (raised + shift * p[(r, k - 1)]) / k as f64;
        }
    }
    p
}

/// Map `poly` to the canonical member of its aliasing class.
///
/// The result differs from `poly` by an integer combination of the columns of
/// [`alias_lattice`], so both wrap to the same phase on every integer sample
/// time. Adding any lattice vector to the input leaves the output unchanged,
/// and applying the map twice is the same as applying it once.
///
/// # Example
/// ```rust
/// use phasefit_core::unalias::unalias_poly;
///
/// // A linear phase is ambiguous in both slope and offset by whole cycles.
/// let canonical = unalias_poly(&[1.3, -0.8]);
/// assert!((canonical[0] - 0.3).abs() < 1e-12);
/// assert!((canonical[1] - 0.2).abs() < 1e-12);
/// ```
pub fn unalias_poly(poly: &[f64]) -> Vec<f64> {
    let len = poly.len();
    if len == 0 {
        return Vec::new();
    }
    let lattice = alias_lattice(len);
    let qr = lattice.clone().qr();
    let r = qr.r();
    let input = DVector::from_column_slice(poly);
    let ystar = qr.q().transpose() * &input;

    let mut u = DVector::<f64>::zeros(len);
    for k in (0..len).rev() {
        let mut acc = ystar[k];
        for j in k + 1..len {
            acc -= r[(k, j)] * u[j];
        }
        u[k] = (acc / r[(k, k)]).round_ties_even();
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(lattice_coords = ?u.as_slice(), "unalias_poly");

    (input - lattice * u).iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::{poly_to_phase, wrap};

    fn assert_close(a: &[f64], b: &[f64], tol: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < tol, "{a:?} != {b:?}");
        }
    }

    #[test]
    fn test_lattice_columns_are_binomial_polynomials() {
        let p = alias_lattice(4);
        // t(t+1)(t+2)/6 = t³/6 + t²/2 + t/3
        let expected = [
            [0.0, 0.0, 0.0, 1.0 / 6.0],
            [0.0, 0.0, 0.5, 0.5],
            [0.0, 1.0, 0.5, 1.0 / 3.0],
            [1.0, 0.0, 0.0, 0.0],
        ];
        for (i, row) in expected.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                assert!((p[(i, j)] - v).abs() < 1e-15, "entry ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_lattice_columns_integer_valued() {
        let p = alias_lattice(5);
        for k in 0..5 {
            let column: Vec<f64> = p.column(k).iter().copied().collect();
            for t in -20..20 {
                let value = crate::lstsq::polyval(&column, f64::from(t));
                assert!((value - value.round()).abs() < 1e-9, "column {k} at t={t}: {value}");
            }
        }
    }

    #[test]
    fn test_unalias_constant() {
        assert_close(&unalias_poly(&[0.7]), &[-0.3], 1e-12);
        assert_close(&unalias_poly(&[-2.2]), &[-0.2], 1e-12);
    }

    #[test]
    fn test_unalias_empty() {
        assert!(unalias_poly(&[]).is_empty());
    }

    #[test]
    fn test_unalias_preserves_wrapped_samples() {
        let poly = [0.37, -1.9, 4.2, 7.7];
        let canonical = unalias_poly(&poly);
        let before = poly_to_phase(&poly, 33, None, 1.0);
        let after = poly_to_phase(&canonical, 33, None, 1.0);
        for (a, b) in before.iter().zip(after.iter()) {
            assert!(wrap(a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_unalias_idempotent() {
        let poly = [0.013, 0.61, -3.4];
        let once = unalias_poly(&poly);
        let twice = unalias_poly(&once);
        assert_close(&once, &twice, 1e-12);
    }

    #[test]
    fn test_unalias_invariant_under_lattice_shift() {
        let poly = [0.0042, 0.21, 0.33, -0.1];
        let p = alias_lattice(4);
        let base = unalias_poly(&poly);
        for k in 0..4 {
            for mult in [-3.0, -1.0, 2.0] {
                let shifted: Vec<f64> = poly
                    .iter()
                    .zip(p.column(k).iter())
                    .map(|(a, b)| a + mult * b)
                    .collect();
                assert_close(&unalias_poly(&shifted), &base, 1e-9);
            }
        }
    }

    #[test]
    fn test_unalias_small_poly_unchanged() {
        let poly = [1e-4, -2e-3, 0.01];
        assert_close(&unalias_poly(&poly), &poly, 1e-15);
    }
}
