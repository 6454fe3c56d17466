//! Conversions between wrapped phase, unwrapped phase, and complex signal.
//!
//! Phase is measured in cycles throughout the estimator: a wrapped value lies
//! in [-0.5, 0.5) and one full turn of the unit circle is 1.0. Radians only
//! appear at the boundary through [`PhaseUnit`].
//!
//! Sample times are integers centered on zero. For a length `N` the first
//! sample sits at [`default_tstart`]`(N) = -floor((N-1)/2)`, so an even length
//! puts the extra sample on the positive side:
//!
//! ```text
//! N = 5:  -2 -1  0  1  2
//! N = 6:  -2 -1  0  1  2  3
//! ```
//!
//! Centering keeps polynomial fits well conditioned, and integer spacing is
//! what makes the aliasing lattice in [`crate::unalias`] well defined.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::lstsq::polyval;

/// Unit used to express phase at the API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PhaseUnit {
    /// One full turn is 1.0.
    #[default]
    Cycles,
    /// One full turn is 2π.
    Radians,
}

impl PhaseUnit {
    /// Size of one full turn in this unit.
    pub fn per_cycle(self) -> f64 {
        match self {
            PhaseUnit::Cycles => 1.0,
            PhaseUnit::Radians => TAU,
        }
    }

    /// Convert a phase value expressed in this unit to cycles.
    pub fn to_cycles(self, value: f64) -> f64 {
        value / self.per_cycle()
    }

    /// Convert a phase value in cycles to this unit.
    pub fn from_cycles(self, cycles: f64) -> f64 {
        cycles * self.per_cycle()
    }
}

/// Wrap a phase value into [-0.5, 0.5).
///
/// Computes `x - round(x)` with ties rounded to even. The one value that
/// lands on +0.5 is folded onto -0.5 so the interval stays half-open.
///
/// # Example
/// ```rust
/// use phasefit_core::phase::wrap;
///
/// assert!((wrap(1.25) - 0.25).abs() < 1e-12);
/// assert!((wrap(-0.75) - 0.25).abs() < 1e-12);
/// assert_eq!(wrap(0.5), -0.5);
/// ```
#[inline]
pub fn wrap(x: f64) -> f64 {
    let w = x - x.round_ties_even();
    if w >= 0.5 { w - 1.0 } else { w }
}

/// Wrap every sample of a phase sequence.
pub fn wrap_phase(phase: &[f64]) -> Vec<f64> {
    phase.iter().map(|&p| wrap(p)).collect()
}

/// Phase of each complex sample in cycles, in [-0.5, 0.5).
pub fn sig_to_phase(signal: &[Complex64]) -> Vec<f64> {
    signal.iter().map(|s| wrap(s.arg() / TAU)).collect()
}

/// Unit-magnitude complex signal `exp(2πi·phase)` for a phase in cycles.
pub fn phase_to_sig(phase: &[f64]) -> Vec<Complex64> {
    phase.iter().map(|&p| Complex64::from_polar(1.0, TAU * p)).collect()
}

/// Index offset of the first sample for a centered sequence of length `n`.
///
/// Returns `-floor((n-1)/2)`, and 0 for an empty sequence.
#[inline]
pub fn default_tstart(n: usize) -> i64 {
    -((n.saturating_sub(1) / 2) as i64)
}

/// Integer-spaced sample times.
///
/// `tstart` defaults to [`default_tstart`]`(n)`; the `k`-th time is
/// `(tstart + k) * dt`.
///
/// # Example
/// ```rust
/// use phasefit_core::phase::sample_times;
///
/// assert_eq!(sample_times(4, None, 1.0), vec![-1.0, 0.0, 1.0, 2.0]);
/// assert_eq!(sample_times(3, Some(0), 0.5), vec![0.0, 0.5, 1.0]);
/// ```
pub fn sample_times(n: usize, tstart: Option<i64>, dt: f64) -> Vec<f64> {
    let tstart = tstart.unwrap_or_else(|| default_tstart(n));
    (0..n).map(|k| (tstart + k as i64) as f64 * dt).collect()
}

/// Evaluate `poly` at the sample times and wrap the result.
pub fn poly_to_phase(poly: &[f64], n: usize, tstart: Option<i64>, dt: f64) -> Vec<f64> {
    sample_times(n, tstart, dt)
        .into_iter()
        .map(|t| wrap(polyval(poly, t)))
        .collect()
}

/// Unit-magnitude signal whose phase (in cycles) is `poly` at the sample times.
pub fn poly_to_sig(poly: &[f64], n: usize, tstart: Option<i64>, dt: f64) -> Vec<Complex64> {
    sample_times(n, tstart, dt)
        .into_iter()
        .map(|t| Complex64::from_polar(1.0, TAU * polyval(poly, t)))
        .collect()
}

/// Wrapped difference `wrap(phase[k + delay] - phase[k])`.
///
/// The output is `delay` samples shorter than the input, and empty when
/// `delay >= phase.len()`.
pub fn phase_diff(phase: &[f64], delay: usize) -> Vec<f64> {
    let ahead = phase.get(delay..).unwrap_or(&[]);
    ahead
        .iter()
        .zip(phase.iter())
        .map(|(&later, &earlier)| wrap(later - earlier))
        .collect()
}

/// Circular mean of a phase sequence in cycles.
///
/// Averages the unit phasors and returns the angle of the mean. An empty
/// input or a mean phasor of zero length gives 0.
pub fn circular_mean(phase: &[f64]) -> f64 {
    let sum: Complex64 = phase
        .iter()
        .map(|&p| Complex64::from_polar(1.0, TAU * p))
        .sum();
    sum.arg() / TAU
}

/// Re-wrap phase around its own circular centroid instead of around zero.
///
/// Returns `wrap(p - m) + m` with `m` the [`circular_mean`]. A sequence that
/// straddles ±0.5 comes back contiguous, which reduces wrap artifacts before
/// a fit.
///
/// # Example
/// ```rust
/// use phasefit_core::phase::centered_phase;
///
/// let centered = centered_phase(&[0.45, -0.45]);
/// assert!((centered[1] - centered[0] - 0.1).abs() < 1e-12);
/// ```
pub fn centered_phase(phase: &[f64]) -> Vec<f64> {
    let mean = circular_mean(phase);
    phase.iter().map(|&p| wrap(p - mean) + mean).collect()
}

/// [`centered_phase`] for a complex signal.
///
/// The result is the unit-magnitude signal of the re-centered phase; the
/// input magnitude is discarded.
pub fn centered_signal(signal: &[Complex64]) -> Vec<Complex64> {
    phase_to_sig(&centered_phase(&sig_to_phase(signal)))
}
