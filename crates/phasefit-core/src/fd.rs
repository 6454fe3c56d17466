//! Finite-difference polynomial phase estimator.
//!
//! Based on Madsen & Cao, "Finite-Difference Algorithm for Polynomial Phase
//! Signal Parameter Estimation", with refinement between integration steps.
//!
//! # Algorithm
//!
//! ```text
//! s₀ = signal
//! sₖ[i] = sₖ₋₁[i+1] · conj(sₖ₋₁[i])         k = 1..=D   (order drops by one)
//!
//! smooth s_D with a length-L boxcar, take its phase, optionally center it,
//! fit a polynomial of order (order - D) against the trimmed times
//!
//! for k = D-1 down to 0:
//!     p = disc_polyint(p)                    (constant term comes back as 0)
//!     p = poly_refine_iter(sₖ, p, iters)     (recovers the constant term)
//!
//! return unalias_poly(p)
//! ```
//!
//! Differencing happens on the unit signals themselves, so no phase is
//! unwrapped until the order has been reduced and the values sit comfortably
//! inside the wrapped range. Every chain level keeps the time origin of the
//! input: sample `i` of any level is associated with time `tstart + i`.
//!
//! Works best when the signal is long (hundreds of samples or more), the
//! order is above 2, and the signal is Nyquist sampled. One phase difference
//! is the usual choice; two help when the instantaneous frequency sweeps most
//! of the Nyquist band, at the cost of SNR threshold.

use num_complex::Complex64;

use crate::error::{EstimateError, Result, check_filt_len, check_mag_weighting};
use crate::fin_diff::disc_polyint;
use crate::lstsq::{boxcar_valid, trim_times, weighted_polyfit};
use crate::phase::{centered_phase, default_tstart, sample_times, sig_to_phase};
use crate::refine::{RefineConfig, refine_iter_from};
use crate::unalias::unalias_poly;

/// Settings for the finite-difference estimator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FdConfig {
    /// Number of conjugate-multiply differencing steps (at least 1).
    pub phase_differences: usize,
    /// Re-wrap the differenced phase around its circular mean before fitting.
    pub center_phase: bool,
    /// Length of the rectangular smoothing filter (odd).
    pub filt_len: usize,
    /// Exponent applied to `|signal|` to form the fit weights.
    pub mag_weighting: f64,
    /// Refinement passes after each integration step.
    pub poly_refine_iters: usize,
    /// Settings for the refinement passes.
    pub refine: RefineConfig,
}

impl Default for FdConfig {
    fn default() -> Self {
        Self {
            phase_differences: 1,
            center_phase: true,
            filt_len: 5,
            mag_weighting: 1.0,
            poly_refine_iters: 3,
            refine: RefineConfig::default(),
        }
    }
}

impl FdConfig {
    /// Set the number of phase differences.
    pub fn with_phase_differences(mut self, phase_differences: usize) -> Self {
        self.phase_differences = phase_differences;
        self
    }

    /// Enable or disable phase centering before the fit.
    pub fn with_center_phase(mut self, center_phase: bool) -> Self {
        self.center_phase = center_phase;
        self
    }

    /// Set the smoothing filter length.
    pub fn with_filt_len(mut self, filt_len: usize) -> Self {
        self.filt_len = filt_len;
        self
    }

    /// Set the magnitude weighting exponent.
    pub fn with_mag_weighting(mut self, mag_weighting: f64) -> Self {
        self.mag_weighting = mag_weighting;
        self
    }

    /// Set the number of refinement passes per integration step.
    pub fn with_poly_refine_iters(mut self, poly_refine_iters: usize) -> Self {
        self.poly_refine_iters = poly_refine_iters;
        self
    }

    /// Set the refinement settings.
    pub fn with_refine(mut self, refine: RefineConfig) -> Self {
        self.refine = refine;
        self
    }

    /// Check the settings against a target polynomial order.
    pub fn validate(&self, order: usize) -> Result<()> {
        if self.phase_differences == 0 {
            return Err(EstimateError::invalid(
                "phase_differences",
                "at least one phase difference is required",
            ));
        }
        if order < self.phase_differences {
            return Err(EstimateError::invalid(
                "order",
                format!(
                    "order {order} is below the {} requested phase differences",
                    self.phase_differences
                ),
            ));
        }
        check_filt_len("filt_len", self.filt_len)?;
        check_mag_weighting(self.mag_weighting)?;
        if let Some(filt_len) = self.refine.filt_len {
            check_filt_len("refine.filt_len", filt_len)?;
        }
        check_mag_weighting(self.refine.mag_weighting)
    }
}

/// Estimate the phase polynomial (cycles, highest power first) of `signal`.
///
/// The returned coefficients are unaliased with [`unalias_poly`] and refer
/// to the centered integer sample times of
/// [`sample_times`](crate::phase::sample_times).
///
/// # Errors
/// `InvalidArgument` when the settings are invalid for `order` or the signal
/// is too short to leave `order - phase_differences + 1` samples after
/// differencing and smoothing; `NumericalInstability` from the fit or
/// integration steps.
///
/// # Example
/// ```rust
/// use phasefit_core::{FdConfig, polyfit, poly_to_sig, unalias_poly};
///
/// let truth = [0.005, 0.2, 0.3];
/// let signal = poly_to_sig(&truth, 50, None, 1.0);
/// let est = polyfit(&signal, 2, &FdConfig::default()).unwrap();
/// let diff: Vec<f64> = truth.iter().zip(&est).map(|(a, b)| a - b).collect();
/// assert!(unalias_poly(&diff).iter().all(|d| d.abs() < 1e-5));
/// ```
pub fn polyfit(signal: &[Complex64], order: usize, config: &FdConfig) -> Result<Vec<f64>> {
    config.validate(order)?;
    let n = signal.len();
    let differences = config.phase_differences;
    let fit_order = order - differences;
    let needed = differences + config.filt_len + fit_order;
    if n < needed {
        return Err(EstimateError::invalid(
            "signal",
            format!(
                "{n} samples leave too few for a degree-{fit_order} fit after \
                 {differences} differences and a length-{} filter (need {needed})",
                config.filt_len
            ),
        ));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(n, order, ?config, "fd polyfit");

    let mut chain: Vec<Vec<Complex64>> = Vec::with_capacity(differences + 1);
    chain.push(signal.to_vec());
    for _ in 0..differences {
        let prev = &chain[chain.len() - 1];
        let next: Vec<Complex64> = prev.windows(2).map(|w| w[1] * w[0].conj()).collect();
        chain.push(next);
    }

    let tstart = default_tstart(n);
    let times = sample_times(n - differences, Some(tstart), 1.0);
    let filtered = boxcar_valid(&chain[differences], config.filt_len);
    let trimmed = trim_times(&times, config.filt_len);

    let mut phase = sig_to_phase(&filtered);
    if config.center_phase {
        phase = centered_phase(&phase);
    }
    let weights: Vec<f64> = filtered
        .iter()
        .map(|s| s.norm().powf(config.mag_weighting))
        .collect();
    let mut estimate = weighted_polyfit(trimmed, &phase, fit_order, Some(&weights))?;

    for level in (0..differences).rev() {
        estimate = disc_polyint(&estimate)?;
        estimate = refine_iter_from(
            &chain[level],
            &estimate,
            tstart,
            config.poly_refine_iters,
            &config.refine,
        )?;
    }

    Ok(unalias_poly(&estimate))
}
