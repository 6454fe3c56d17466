//! Cramér–Rao lower bound for polynomial phase coefficients.
//!
//! For `s(t) = A·exp(iφ(t)) + w(t)` with circular complex Gaussian noise of
//! variance σ² and `φ(t) = Σ aₚ tᵖ` (radians), the Fisher information is
//!
//! ```text
//! J[i][j] = (2A²/σ²) · Σₜ t^(i+j)
//! ```
//!
//! The moment sums over the centered sample range are replaced by their
//! integral over `[-N/2, N/2]`:
//!
//! ```text
//! Σₜ t^k ≈ 2·(N/2)^(k+1)/(k+1)   k even,   0 otherwise
//! ```
//!
//! Inversion is done on the moment matrix normalized to `t/(N/2)` and scaled
//! back afterwards, which keeps it well conditioned for long signals.

use nalgebra::DMatrix;

use crate::error::{EstimateError, Result};
use crate::lstsq::MIN_PIVOT_RATIO;
use crate::phase::PhaseUnit;

/// Per-coefficient variance lower bound, highest power first.
///
/// # Arguments
/// * `order` - Polynomial order
/// * `n` - Number of samples
/// * `snr_db` - Signal-to-noise ratio `A²/σ²` in dB
/// * `unit` - Unit the coefficients are expressed in
/// * `dt` - Sample spacing; coefficient `p` scales as `dt^-p`
///
/// # Errors
/// `InvalidArgument` for zero samples, a non-positive or non-finite `dt`, or
/// a non-finite SNR; `NumericalInstability` if the normalized Fisher matrix
/// is too ill-conditioned to invert (pivot ratio of its triangular factor at
/// or below [`MIN_PIVOT_RATIO`]).
///
/// # Example
/// ```rust
/// use phasefit_core::crb::crb;
/// use phasefit_core::phase::PhaseUnit;
///
/// // Constant phase: variance 1 / (2·N·SNR) rad².
/// let bound = crb(0, 100, 0.0, PhaseUnit::Radians, 1.0).unwrap();
/// assert!((bound[0] - 1.0 / 200.0).abs() < 1e-15);
/// ```
pub fn crb(order: usize, n: usize, snr_db: f64, unit: PhaseUnit, dt: f64) -> Result<Vec<f64>> {
    if n == 0 {
        return Err(EstimateError::invalid("n", "bound needs at least one sample"));
    }
    if !(dt.is_finite() && dt > 0.0) {
        return Err(EstimateError::invalid("dt", format!("must be finite and > 0, got {dt}")));
    }
    if !snr_db.is_finite() {
        return Err(EstimateError::invalid("snr_db", format!("must be finite, got {snr_db}")));
    }

    let dim = order + 1;
    let moments = DMatrix::from_fn(dim, dim, |i, j| {
        let k = i + j;
        if k.is_multiple_of(2) { 2.0 / (k + 1) as f64 } else { 0.0 }
    });

    // The normalized moments are Hilbert-like; refuse orders whose
    // triangular factor has collapsed instead of trusting the inverse.
    let pivots = moments.clone().qr().r().diagonal().map(f64::abs);
    let (min_pivot, max_pivot) = (pivots.min(), pivots.max());
    if min_pivot.is_nan() || min_pivot <= MIN_PIVOT_RATIO * max_pivot {
        #[cfg(feature = "tracing")]
        tracing::warn!(min_pivot, max_pivot, order, "rejecting ill-conditioned moment matrix");
        return Err(EstimateError::unstable(
            "crb",
            format!(
                "moment matrix of order {order} has pivot ratio {:e}",
                min_pivot / max_pivot
            ),
        ));
    }

    let inverse = moments.try_inverse().ok_or_else(|| {
        EstimateError::unstable("crb", format!("moment matrix of order {order} is singular"))
    })?;

    let half = n as f64 / 2.0;
    let snr = 10f64.powf(snr_db / 10.0);
    let radians_per_unit = std::f64::consts::TAU / unit.per_cycle();

    let bound: Vec<f64> = (0..dim)
        .rev()
        .map(|p| {
            let var_rad = inverse[(p, p)] / half.powi(2 * p as i32 + 1) / (2.0 * snr);
            var_rad / radians_per_unit.powi(2) / dt.powi(2 * p as i32)
        })
        .collect();

    if bound.iter().any(|v| !v.is_finite() || *v < 0.0) {
        return Err(EstimateError::unstable(
            "crb",
            format!("order {order} with {n} samples produced an invalid bound"),
        ));
    }
    Ok(bound)
}
