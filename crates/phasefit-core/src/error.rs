//! Error types for phase estimation.

use thiserror::Error;

/// Result alias used throughout the estimator.
pub type Result<T> = std::result::Result<T, EstimateError>;

/// Errors that can occur while unwrapping, fitting, or estimating.
///
/// Aliasing (more than half a cycle of phase change between adjacent samples)
/// is not detectable from wrapped data and is therefore never reported here.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum EstimateError {
    /// An input violated the documented contract of an operation.
    #[error("invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// Description of why the value is rejected.
        reason: String,
    },

    /// A fit or solve step was too poorly conditioned to trust.
    #[error("numerical instability in {context}: {detail}")]
    NumericalInstability {
        /// Operation that detected the problem.
        context: &'static str,
        /// Description of the failed check.
        detail: String,
    },
}

impl EstimateError {
    /// Create an invalid argument error.
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EstimateError::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }

    /// Create a numerical instability error.
    pub fn unstable(context: &'static str, detail: impl Into<String>) -> Self {
        EstimateError::NumericalInstability {
            context,
            detail: detail.into(),
        }
    }
}

/// Reject an even or zero filter length.
pub(crate) fn check_filt_len(name: &'static str, filt_len: usize) -> Result<()> {
    if filt_len == 0 || filt_len.is_multiple_of(2) {
        return Err(EstimateError::invalid(
            name,
            format!("filter length must be odd and at least 1, got {filt_len}"),
        ));
    }
    Ok(())
}

/// Reject a negative or non-finite magnitude weighting exponent.
pub(crate) fn check_mag_weighting(mag_weighting: f64) -> Result<()> {
    if !mag_weighting.is_finite() || mag_weighting < 0.0 {
        return Err(EstimateError::invalid(
            "mag_weighting",
            format!("must be finite and >= 0, got {mag_weighting}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_display() {
        let err = EstimateError::invalid("filt_len", "must be odd");
        assert_eq!(err.to_string(), "invalid argument 'filt_len': must be odd");
    }

    #[test]
    fn unstable_display() {
        let err = EstimateError::unstable("weighted_polyfit", "zero pivot");
        assert_eq!(
            err.to_string(),
            "numerical instability in weighted_polyfit: zero pivot"
        );
    }

    #[test]
    fn filt_len_checks() {
        assert!(check_filt_len("filt_len", 1).is_ok());
        assert!(check_filt_len("filt_len", 9).is_ok());
        assert!(matches!(
            check_filt_len("filt_len", 0),
            Err(EstimateError::InvalidArgument { name: "filt_len", .. })
        ));
        assert!(check_filt_len("filt_len", 4).is_err());
    }

    #[test]
    fn mag_weighting_checks() {
        assert!(check_mag_weighting(0.0).is_ok());
        assert!(check_mag_weighting(2.5).is_ok());
        assert!(check_mag_weighting(-1.0).is_err());
        assert!(check_mag_weighting(f64::NAN).is_err());
    }
}
