//! Phasefit Core - polynomial phase estimation from wrapped samples
//!
//! This crate estimates the coefficients of a polynomial describing the
//! instantaneous phase of a complex signal, given only noisy samples whose
//! phase is known modulo one cycle:
//!
//! - [`phase`] - Wrapping, signal/phase conversion, centered sample times
//! - [`unwrap`] - Difference-and-integrate phase unwrapping
//! - [`lstsq`] - Weighted polynomial least squares and boxcar smoothing
//! - [`fin_diff`] - Discrete derivative / discrete integral of polynomials
//! - [`unalias`] - Canonical representative under integer-cycle ambiguity
//! - [`refine`] - Dechirp-and-fit refinement of an estimate
//! - [`fd`] - The finite-difference estimator
//! - [`crb`] - Cramér–Rao bound for benchmarking accuracy
//!
//! ## Conventions
//!
//! - Phase is in cycles: wrapped values lie in [-0.5, 0.5).
//! - Polynomials are coefficient slices, highest power first.
//! - Sample times are integers centered on zero
//!   (`-floor((N-1)/2) ..= N-1-floor((N-1)/2)`).
//!
//! ## Example
//!
//! ```rust
//! use phasefit_core::{FdConfig, PhaseUnit, crb, poly_to_sig, polyfit};
//!
//! let truth = [1e-6, 2e-4, 0.05, 0.3];
//! let signal = poly_to_sig(&truth, 256, None, 1.0);
//!
//! let estimate = polyfit(&signal, 3, &FdConfig::default()).unwrap();
//! let bound = crb(3, 256, 0.0, PhaseUnit::Cycles, 1.0).unwrap();
//! assert_eq!(estimate.len(), bound.len());
//! ```
//!
//! ## Features
//!
//! - `tracing` - Emit `tracing` events from the estimator, refiner, fit,
//!   and unaliaser.
//!
//! Every operation is a synchronous pure function over in-memory slices;
//! running many estimations in parallel is left to the caller.

pub mod crb;
pub mod error;
pub mod fd;
pub mod fin_diff;
pub mod lstsq;
pub mod phase;
pub mod refine;
pub mod unalias;
pub mod unwrap;

pub use crb::crb;
pub use error::{EstimateError, Result};
pub use fd::{FdConfig, polyfit};
pub use fin_diff::{disc_polyder, disc_polyint, fin_diff_mat};
pub use lstsq::{polyval, weighted_polyfit};
pub use phase::{
    PhaseUnit, centered_phase, centered_signal, phase_diff, phase_to_sig, poly_to_phase,
    poly_to_sig, sample_times, sig_to_phase, wrap, wrap_phase,
};
pub use refine::{RefineConfig, default_refine_filt_len, poly_refine, poly_refine_iter};
pub use unalias::{alias_lattice, unalias_poly};
pub use unwrap::{UnwrapConfig, unwrap, unwrap_polyfit};

/// Complex sample type used for signals.
pub use num_complex::Complex64;
