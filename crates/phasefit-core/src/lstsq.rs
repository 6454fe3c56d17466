//! Polynomial evaluation, weighted least-squares fitting, and smoothing.
//!
//! Polynomials are coefficient slices ordered highest power first, so
//! `[a, b, c]` is `a·t² + b·t + c`.
//!
//! # Weighted fit
//!
//! [`weighted_polyfit`] minimises
//!
//! ```text
//! Σ (w[i] · (y[i] − p(x[i])))²
//! ```
//!
//! The weights multiply the residuals, not the squared residuals. The
//! Vandermonde matrix is column-scaled to unit norm and solved with a
//! Householder QR; a triangular factor whose smallest pivot is negligible
//! relative to its largest is reported as
//! [`EstimateError::NumericalInstability`] instead of producing coefficients.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::error::{EstimateError, Result};

/// Smallest accepted ratio between the smallest and largest pivot of the
/// triangular factor.
pub const MIN_PIVOT_RATIO: f64 = 1e-13;

/// Evaluate a polynomial at `x` using Horner's scheme.
///
/// An empty coefficient slice evaluates to 0.
#[inline]
pub fn polyval(poly: &[f64], x: f64) -> f64 {
    poly.iter().fold(0.0, |acc, &c| acc * x + c)
}

/// Least-squares polynomial fit of `degree` with optional per-sample weights.
///
/// # Arguments
/// * `x` - Abscissae
/// * `y` - Ordinates, same length as `x`
/// * `degree` - Polynomial degree; `degree + 1` coefficients are returned
/// * `weights` - Optional residual weights, same length as `x`
///
/// # Errors
/// `InvalidArgument` on mismatched lengths or fewer than `degree + 1` points;
/// `NumericalInstability` when the weighted Vandermonde system is singular or
/// too poorly conditioned.
///
/// # Example
/// ```rust
/// use phasefit_core::lstsq::weighted_polyfit;
///
/// let x = [-2.0, -1.0, 0.0, 1.0, 2.0];
/// let y: Vec<f64> = x.iter().map(|t| 0.5 * t * t - t + 2.0).collect();
/// let poly = weighted_polyfit(&x, &y, 2, None).unwrap();
/// assert!((poly[0] - 0.5).abs() < 1e-12);
/// assert!((poly[1] + 1.0).abs() < 1e-12);
/// assert!((poly[2] - 2.0).abs() < 1e-12);
/// ```
pub fn weighted_polyfit(
    x: &[f64],
    y: &[f64],
    degree: usize,
    weights: Option<&[f64]>,
) -> Result<Vec<f64>> {
    if x.len() != y.len() {
        return Err(EstimateError::invalid(
            "y",
            format!("length {} does not match x length {}", y.len(), x.len()),
        ));
    }
    if let Some(w) = weights
        && w.len() != x.len()
    {
        return Err(EstimateError::invalid(
            "weights",
            format!("length {} does not match x length {}", w.len(), x.len()),
        ));
    }
    let rows = x.len();
    let cols = degree + 1;
    if rows < cols {
        return Err(EstimateError::invalid(
            "x",
            format!("{rows} samples cannot determine {cols} coefficients"),
        ));
    }

    let weight = |i: usize| weights.map_or(1.0, |w| w[i]);
    let mut a = DMatrix::from_fn(rows, cols, |i, j| weight(i) * x[i].powi((degree - j) as i32));
    let b = DVector::from_fn(rows, |i, _| weight(i) * y[i]);

    let mut scale = Vec::with_capacity(cols);
    for mut column in a.column_iter_mut() {
        let norm = column.norm();
        if norm == 0.0 || !norm.is_finite() {
            return Err(EstimateError::unstable(
                "weighted_polyfit",
                format!("design column has norm {norm}"),
            ));
        }
        column /= norm;
        scale.push(norm);
    }

    let qr = a.qr();
    let r = qr.r();
    let rhs = qr.q().transpose() * b;

    let pivots = r.diagonal().map(f64::abs);
    let (min_pivot, max_pivot) = (pivots.min(), pivots.max());
    if min_pivot.is_nan() || min_pivot <= MIN_PIVOT_RATIO * max_pivot {
        #[cfg(feature = "tracing")]
        tracing::warn!(min_pivot, max_pivot, degree, rows, "rejecting ill-conditioned fit");
        return Err(EstimateError::unstable(
            "weighted_polyfit",
            format!("pivot ratio {:e} below {MIN_PIVOT_RATIO:e}", min_pivot / max_pivot),
        ));
    }

    let solved = r.solve_upper_triangular(&rhs).ok_or_else(|| {
        EstimateError::unstable("weighted_polyfit", "triangular factor is singular")
    })?;

    let poly: Vec<f64> = solved.iter().zip(&scale).map(|(c, s)| c / s).collect();
    if poly.iter().any(|c| !c.is_finite()) {
        return Err(EstimateError::unstable(
            "weighted_polyfit",
            "fit produced non-finite coefficients",
        ));
    }
    Ok(poly)
}

/// Valid-mode convolution with a length-`len` rectangular (all ones) kernel.
///
/// Output sample `k` is the sum of `signal[k..k + len]`, so the output is
/// `len - 1` samples shorter than the input. Returns an empty vector when
/// `len` is zero or longer than the signal.
pub fn boxcar_valid(signal: &[Complex64], len: usize) -> Vec<Complex64> {
    if len == 0 || len > signal.len() {
        return Vec::new();
    }
    signal.windows(len).map(|w| w.iter().sum()).collect()
}

/// Trim `filt_len / 2` samples from each end of a time axis.
///
/// Pairs with [`boxcar_valid`]: for an odd `filt_len` the trimmed times are
/// the centers of the filter windows.
pub fn trim_times(times: &[f64], filt_len: usize) -> &[f64] {
    let half = filt_len / 2;
    if 2 * half >= times.len() {
        return &[];
    }
    &times[half..times.len() - half]
}
