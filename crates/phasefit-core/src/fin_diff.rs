//! Discrete derivative and discrete integral of polynomials.
//!
//! The forward difference of a degree-`K` polynomial, `Δf(t) = f(t+1) - f(t)`,
//! is a degree `K-1` polynomial whose coefficients depend only on the top `K`
//! coefficients of `f` through a lower-triangular matrix of binomials:
//!
//! ```text
//! D[i][j] = C(K - j, K - i - 1)    for j <= i
//!
//! K = 4:   4 0 0 0
//!          6 3 0 0
//!          4 3 2 0
//!          1 1 1 1
//! ```
//!
//! [`disc_polyint`] inverts [`disc_polyder`] by a triangular solve against the
//! same matrix. The constant term is lost by differencing and comes back as 0.

use nalgebra::{DMatrix, DVector};

use crate::error::{EstimateError, Result};

/// Binomial coefficient `C(n, k)` as a float; 0 when `k > n`.
pub fn binomial(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let k = k.min(n - k);
    (0..k).fold(1.0, |acc, i| acc * (n - i) as f64 / (i + 1) as f64)
}

/// Lower-triangular `order × order` forward-difference matrix.
pub fn fin_diff_mat(order: usize) -> DMatrix<f64> {
    DMatrix::from_fn(order, order, |i, j| {
        if j <= i {
            binomial(order - j, order - i - 1)
        } else {
            0.0
        }
    })
}

/// Coefficients of the forward difference `f(t+1) - f(t)`.
///
/// The result is one coefficient shorter than `poly`; a constant (or empty)
/// polynomial differences to an empty one.
///
/// # Example
/// ```rust
/// use phasefit_core::fin_diff::disc_polyder;
///
/// let d = disc_polyder(&[0.005, 0.1, 0.3]);
/// assert!((d[0] - 0.01).abs() < 1e-15);
/// assert!((d[1] - 0.105).abs() < 1e-15);
/// ```
pub fn disc_polyder(poly: &[f64]) -> Vec<f64> {
    let order = poly.len().saturating_sub(1);
    if order == 0 {
        return Vec::new();
    }
    let top = DVector::from_column_slice(&poly[..order]);
    (fin_diff_mat(order) * top).iter().copied().collect()
}

/// Discrete integral: the polynomial whose forward difference is `poly`,
/// with a zero constant term.
///
/// # Errors
/// `NumericalInstability` if the triangular solve fails or overflows.
pub fn disc_polyint(poly: &[f64]) -> Result<Vec<f64>> {
    let order = poly.len();
    let rhs = DVector::from_column_slice(poly);
    let solved = fin_diff_mat(order)
        .solve_lower_triangular(&rhs)
        .ok_or_else(|| EstimateError::unstable("disc_polyint", "difference matrix is singular"))?;
    if solved.iter().any(|c| !c.is_finite()) {
        return Err(EstimateError::unstable(
            "disc_polyint",
            "integration produced non-finite coefficients",
        ));
    }
    let mut integral: Vec<f64> = solved.iter().copied().collect();
    integral.push(0.0);
    Ok(integral)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lstsq::polyval;

    #[test]
    fn test_binomial() {
        assert_eq!(binomial(4, 0), 1.0);
        assert_eq!(binomial(4, 2), 6.0);
        assert_eq!(binomial(10, 3), 120.0);
        assert_eq!(binomial(2, 3), 0.0);
    }

    #[test]
    fn test_fin_diff_mat_order_four() {
        let expected = [
            [4.0, 0.0, 0.0, 0.0],
            [6.0, 3.0, 0.0, 0.0],
            [4.0, 3.0, 2.0, 0.0],
            [1.0, 1.0, 1.0, 1.0],
        ];
        let mat = fin_diff_mat(4);
        for (i, row) in expected.iter().enumerate() {
            for (j, &v) in row.iter().enumerate() {
                assert_eq!(mat[(i, j)], v, "entry ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_polyder_matches_sampled_difference() {
        let poly = [2e-4, -0.003, 0.1, 0.3];
        let d = disc_polyder(&poly);
        for t in -10..10 {
            let t = f64::from(t);
            let expected = polyval(&poly, t + 1.0) - polyval(&poly, t);
            assert!((polyval(&d, t) - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_polyder_constant() {
        assert!(disc_polyder(&[3.0]).is_empty());
        assert!(disc_polyder(&[]).is_empty());
    }

    #[test]
    fn test_polyint_inverts_polyder() {
        let poly = [0.005, 0.1, 0.3];
        let back = disc_polyint(&disc_polyder(&poly)).unwrap();
        assert_eq!(back.len(), 3);
        assert!((back[0] - 0.005).abs() < 1e-15);
        assert!((back[1] - 0.1).abs() < 1e-15);
        assert_eq!(back[2], 0.0);
    }

    #[test]
    fn test_polyint_empty() {
        assert_eq!(disc_polyint(&[]).unwrap(), vec![0.0]);
    }
}
