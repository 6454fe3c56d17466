//! Iterative polishing of a polynomial phase estimate by dechirping.
//!
//! One refinement pass:
//!
//! 1. Synthesize the unit signal implied by the current estimate.
//! 2. Dechirp: multiply the observation by its conjugate, leaving only the
//!    residual phase error (ideally close to constant).
//! 3. Smooth the residual with a rectangular filter and trim the time axis.
//! 4. Unwrap the residual phase and fit a polynomial of the same order,
//!    weighting each sample by `|residual|^mag_weighting`.
//! 5. Add the fitted correction to the estimate.
//!
//! [`poly_refine_iter`] repeats this a fixed number of times, growing the
//! filter by 2 samples per pass. There is no convergence test.

use num_complex::Complex64;

use crate::error::{EstimateError, Result, check_filt_len, check_mag_weighting};
use crate::lstsq::{boxcar_valid, polyval, trim_times, weighted_polyfit};
use crate::phase::{default_tstart, sample_times, sig_to_phase};
use crate::unwrap::{UnwrapConfig, unwrap};

/// Settings for [`poly_refine`] and [`poly_refine_iter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineConfig {
    /// Smoothing filter length for the first pass (odd). `None` selects
    /// [`default_refine_filt_len`] for the signal length.
    pub filt_len: Option<usize>,
    /// Exponent applied to the residual magnitude to form fit weights.
    pub mag_weighting: f64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            filt_len: None,
            mag_weighting: 1.0,
        }
    }
}

impl RefineConfig {
    /// Set an explicit first-pass filter length.
    pub fn with_filt_len(mut self, filt_len: usize) -> Self {
        self.filt_len = Some(filt_len);
        self
    }

    /// Set the magnitude weighting exponent.
    pub fn with_mag_weighting(mut self, mag_weighting: f64) -> Self {
        self.mag_weighting = mag_weighting;
        self
    }

    fn validate(&self) -> Result<()> {
        if let Some(filt_len) = self.filt_len {
            check_filt_len("refine.filt_len", filt_len)?;
        }
        check_mag_weighting(self.mag_weighting)
    }
}

/// Default first-pass filter length for a signal of `n` samples.
///
/// `(round(log2(n)) - 4) * 2 + 1`, clamped to at least 1. The result is
/// always odd: 1 up to 22 samples, 5 for 50, 9 for 256.
pub fn default_refine_filt_len(n: usize) -> usize {
    let octaves = (n as f64).log2().round();
    ((octaves - 4.0) * 2.0 + 1.0).max(1.0) as usize
}

/// Run a single refinement pass against `signal`.
///
/// # Errors
/// `InvalidArgument` for an empty signal or estimate, an even filter length,
/// or too few samples left after filtering; `NumericalInstability` if the
/// correction fit is ill-conditioned.
pub fn poly_refine(signal: &[Complex64], poly: &[f64], config: &RefineConfig) -> Result<Vec<f64>> {
    refine_iter_from(signal, poly, default_tstart(signal.len()), 1, config)
}

/// Run `num_iters` refinement passes, widening the filter by 2 each pass.
///
/// Zero iterations return the estimate unchanged.
///
/// # Errors
/// See [`poly_refine`].
pub fn poly_refine_iter(
    signal: &[Complex64],
    poly: &[f64],
    num_iters: usize,
    config: &RefineConfig,
) -> Result<Vec<f64>> {
    refine_iter_from(signal, poly, default_tstart(signal.len()), num_iters, config)
}

/// [`poly_refine_iter`] with the first sample at integer time `tstart`.
pub(crate) fn refine_iter_from(
    signal: &[Complex64],
    poly: &[f64],
    tstart: i64,
    num_iters: usize,
    config: &RefineConfig,
) -> Result<Vec<f64>> {
    config.validate()?;
    let n = signal.len();
    if n == 0 {
        return Err(EstimateError::invalid("signal", "cannot refine against an empty signal"));
    }
    if poly.is_empty() {
        return Err(EstimateError::invalid("poly", "estimate has no coefficients"));
    }

    let times = sample_times(n, Some(tstart), 1.0);
    let first_len = config.filt_len.unwrap_or_else(|| default_refine_filt_len(n));
    let longest = if n.is_multiple_of(2) { n - 1 } else { n };

    let mut estimate = poly.to_vec();
    for iteration in 0..num_iters {
        let requested = first_len + 2 * iteration;
        let filt_len = requested.min(longest);
        #[cfg(feature = "tracing")]
        {
            if filt_len != requested {
                tracing::debug!(requested, filt_len, n, "clamping refinement filter length");
            }
            tracing::debug!(iteration, filt_len, "poly_refine pass");
        }
        estimate = refine_step(signal, &estimate, &times, filt_len, config.mag_weighting)?;
    }
    Ok(estimate)
}

fn refine_step(
    signal: &[Complex64],
    poly: &[f64],
    times: &[f64],
    filt_len: usize,
    mag_weighting: f64,
) -> Result<Vec<f64>> {
    let dechirped: Vec<Complex64> = signal
        .iter()
        .zip(times)
        .map(|(s, &t)| s * Complex64::from_polar(1.0, -std::f64::consts::TAU * polyval(poly, t)))
        .collect();

    let filtered = boxcar_valid(&dechirped, filt_len);
    let trimmed = trim_times(times, filt_len);
    let residual = unwrap(&sig_to_phase(&filtered), &UnwrapConfig::default())?;
    let weights: Vec<f64> = filtered.iter().map(|s| s.norm().powf(mag_weighting)).collect();
    let correction = weighted_polyfit(trimmed, &residual, poly.len() - 1, Some(&weights))?;

    Ok(poly.iter().zip(&correction).map(|(p, c)| p + c).collect())
}
