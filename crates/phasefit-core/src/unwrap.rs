//! Phase unwrapping by repeated differencing and cumulative summation.
//!
//! Unlike jump-detection unwrappers, this works on wrapped *differences*:
//!
//! 1. Difference the sequence `num_differences` times. Pass `k` rewrites the
//!    suffix starting at `k + 1` with the wrapped differences of the suffix
//!    starting at `k`, leaving the first `k + 1` samples as anchors.
//! 2. Optionally re-wrap the innermost differences around their circular
//!    mean ([`centered_phase`]), so a steady trend near ±0.5 cycles does not
//!    split across the wrap boundary.
//! 3. Integrate back with cumulative sums, innermost difference first.
//! 4. Remove the integer part of the center sample so the unwrapped phase
//!    sits within half a cycle of zero at time zero.
//!
//! For a polynomial phase whose `num_differences`-th difference stays below
//! half a cycle the original trajectory is recovered to floating-point
//! precision. Faster phase aliases silently.

use crate::error::{EstimateError, Result};
use crate::lstsq::weighted_polyfit;
use crate::phase::{centered_phase, default_tstart, phase_diff, sample_times};

/// Settings for [`unwrap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnwrapConfig {
    /// Number of differencing passes before integration.
    pub num_differences: usize,
    /// Re-wrap the innermost differences around their circular mean.
    pub center_phase: bool,
}

impl Default for UnwrapConfig {
    fn default() -> Self {
        Self {
            num_differences: 1,
            center_phase: true,
        }
    }
}

impl UnwrapConfig {
    /// Set the number of differencing passes.
    pub fn with_num_differences(mut self, num_differences: usize) -> Self {
        self.num_differences = num_differences;
        self
    }

    /// Enable or disable centering of the innermost differences.
    pub fn with_center_phase(mut self, center_phase: bool) -> Self {
        self.center_phase = center_phase;
        self
    }
}

/// Unwrap a wrapped phase sequence (cycles).
///
/// # Errors
/// `InvalidArgument` when `phase` is empty or `num_differences` is not
/// smaller than its length.
///
/// # Example
/// ```rust
/// use phasefit_core::phase::{poly_to_phase, sample_times};
/// use phasefit_core::lstsq::polyval;
/// use phasefit_core::unwrap::{unwrap, UnwrapConfig};
///
/// let poly = [0.005, 0.2, 0.3];
/// let wrapped = poly_to_phase(&poly, 50, None, 1.0);
/// let unwrapped = unwrap(&wrapped, &UnwrapConfig::default()).unwrap();
/// for (u, t) in unwrapped.iter().zip(sample_times(50, None, 1.0)) {
///     assert!((u - polyval(&poly, t)).abs() < 1e-9);
/// }
/// ```
pub fn unwrap(phase: &[f64], config: &UnwrapConfig) -> Result<Vec<f64>> {
    let n = phase.len();
    if n == 0 {
        return Err(EstimateError::invalid("phase", "cannot unwrap an empty sequence"));
    }
    let num_differences = config.num_differences;
    if num_differences >= n {
        return Err(EstimateError::invalid(
            "num_differences",
            format!("{num_differences} differences need more than {n} samples"),
        ));
    }

    let mut cur = phase.to_vec();
    for ii in 0..num_differences {
        let diff = phase_diff(&cur[ii..], 1);
        cur[ii + 1..].copy_from_slice(&diff);
    }

    if config.center_phase {
        let centered = centered_phase(&cur[num_differences..]);
        cur[num_differences..].copy_from_slice(&centered);
    }

    for ii in (0..num_differences).rev() {
        let mut acc = 0.0;
        for value in &mut cur[ii..] {
            acc += *value;
            *value = acc;
        }
    }

    let center = (-default_tstart(n)) as usize;
    let offset = cur[center].round_ties_even();
    for value in &mut cur {
        *value -= offset;
    }
    Ok(cur)
}

/// Estimate a polynomial by unwrapping and fitting directly.
///
/// Unwraps with `config` and least-squares fits a polynomial of `order`
/// against the centered sample times. Cheap and adequate at high SNR; noisy
/// data should go through [`crate::fd::polyfit`] instead.
///
/// # Errors
/// Anything [`unwrap`] or [`weighted_polyfit`] reports.
pub fn unwrap_polyfit(phase: &[f64], order: usize, config: &UnwrapConfig) -> Result<Vec<f64>> {
    let unwrapped = unwrap(phase, config)?;
    let times = sample_times(phase.len(), None, 1.0);
    weighted_polyfit(&times, &unwrapped, order, None)
}
