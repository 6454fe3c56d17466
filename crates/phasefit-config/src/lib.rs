//! Estimator presets for phasefit.
//!
//! Named finite-difference estimator settings stored as TOML, with
//! validation and a set of built-in factory presets.
//!
//! # Features
//!
//! - **Presets**: Load and save estimator settings from TOML files
//! - **Validation**: Report every invalid setting of a preset at once
//! - **Factory Presets**: Built-in settings for common signal conditions
//!
//! # Example
//!
//! ```rust,no_run
//! use phasefit_config::{EstimatorPreset, get_factory_preset};
//! use phasefit_core::{poly_to_sig, polyfit};
//!
//! let preset = get_factory_preset("wideband").unwrap();
//! preset.save("presets/wideband.toml").unwrap();
//!
//! let loaded = EstimatorPreset::load("presets/wideband.toml").unwrap();
//! let config = loaded.to_fd_config().unwrap();
//! let signal = poly_to_sig(&[0.002, 0.0, 0.1], 200, None, 1.0);
//! let estimate = polyfit(&signal, 2, &config).unwrap();
//! ```

mod error;
mod preset;

/// Preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_presets, get_factory_preset};
pub use preset::{EstimatorPreset, FiniteDifferenceSettings, RefineSettings};
pub use validation::{
    ValidationError, ValidationResult, validate_filt_len, validate_mag_weighting, validate_preset,
};
