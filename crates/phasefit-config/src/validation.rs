//! Estimator preset validation.
//!
//! Checks every setting of an [`EstimatorPreset`](crate::EstimatorPreset)
//! and reports all problems at once, so a hand-edited preset file can be
//! fixed in a single pass.
//!
//! # Example
//!
//! ```rust
//! use phasefit_config::{EstimatorPreset, ValidationError, validate_preset};
//!
//! let mut preset = EstimatorPreset::new("broken");
//! preset.finite_difference.filt_len = 4;
//! preset.refine.mag_weighting = -1.0;
//!
//! let err = validate_preset(&preset).unwrap_err();
//! assert!(matches!(err, ValidationError::Multiple(ref errors) if errors.len() == 2));
//! ```

use thiserror::Error;

use crate::EstimatorPreset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Numeric setting outside its allowed range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Dotted name of the setting.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Smoothing filter length that is zero or even.
    #[error("parameter '{param}' must be a positive odd length, got {value}")]
    FilterLength {
        /// Dotted name of the setting.
        param: String,
        /// The rejected length.
        value: usize,
    },

    /// Setting that is not a usable number.
    #[error("invalid value for parameter '{param}': {reason}")]
    InvalidValue {
        /// Dotted name of the setting.
        param: String,
        /// Description of the problem.
        reason: String,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check a smoothing filter length.
pub fn validate_filt_len(param: &str, value: usize) -> ValidationResult<()> {
    if value == 0 || value.is_multiple_of(2) {
        Err(ValidationError::FilterLength {
            param: param.to_string(),
            value,
        })
    } else {
        Ok(())
    }
}

/// Check a magnitude weighting exponent: finite and non-negative.
pub fn validate_mag_weighting(param: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidValue {
            param: param.to_string(),
            reason: format!("expected a finite exponent, got {value}"),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min: 0.0,
            max: f64::INFINITY,
        });
    }
    Ok(())
}

/// Validate every setting of a preset.
///
/// Returns the single error when exactly one setting is wrong and
/// [`ValidationError::Multiple`] when several are.
pub fn validate_preset(preset: &EstimatorPreset) -> ValidationResult<()> {
    let fd = &preset.finite_difference;
    let mut errors = Vec::new();

    if fd.phase_differences == 0 {
        errors.push(ValidationError::OutOfRange {
            param: "finite_difference.phase_differences".to_string(),
            value: 0.0,
            min: 1.0,
            max: f64::INFINITY,
        });
    }
    if let Err(e) = validate_filt_len("finite_difference.filt_len", fd.filt_len) {
        errors.push(e);
    }
    if let Err(e) = validate_mag_weighting("finite_difference.mag_weighting", fd.mag_weighting) {
        errors.push(e);
    }
    if let Some(filt_len) = preset.refine.filt_len
        && let Err(e) = validate_filt_len("refine.filt_len", filt_len)
    {
        errors.push(e);
    }
    if let Err(e) = validate_mag_weighting("refine.mag_weighting", preset.refine.mag_weighting) {
        errors.push(e);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
