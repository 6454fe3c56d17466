//! Estimator preset file format and operations.

use phasefit_core::{FdConfig, RefineConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_preset};

/// Settings of the finite-difference stage, as stored in a preset file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FiniteDifferenceSettings {
    /// Number of conjugate-multiply differencing steps.
    pub phase_differences: usize,
    /// Re-wrap the differenced phase around its circular mean before fitting.
    pub center_phase: bool,
    /// Smoothing filter length (odd).
    pub filt_len: usize,
    /// Exponent applied to `|signal|` to form the fit weights.
    pub mag_weighting: f64,
    /// Refinement passes after each integration step.
    pub poly_refine_iters: usize,
}

impl Default for FiniteDifferenceSettings {
    fn default() -> Self {
        let fd = FdConfig::default();
        Self {
            phase_differences: fd.phase_differences,
            center_phase: fd.center_phase,
            filt_len: fd.filt_len,
            mag_weighting: fd.mag_weighting,
            poly_refine_iters: fd.poly_refine_iters,
        }
    }
}

/// Settings of the refinement passes, as stored in a preset file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RefineSettings {
    /// Initial smoothing filter length; omitted means derived from the
    /// signal length.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filt_len: Option<usize>,
    /// Exponent applied to `|signal|` to form the fit weights.
    pub mag_weighting: f64,
}

impl Default for RefineSettings {
    fn default() -> Self {
        let refine = RefineConfig::default();
        Self {
            filt_len: refine.filt_len,
            mag_weighting: refine.mag_weighting,
        }
    }
}

/// Named estimator settings stored as TOML.
///
/// Missing tables and keys fall back to the estimator defaults, so a preset
/// file only needs to spell out what it changes.
///
/// # TOML Format
///
/// ```toml
/// name = "wideband"
/// description = "Two phase differences for sweeps across most of the band"
///
/// [finite_difference]
/// phase_differences = 2
/// center_phase = true
/// filt_len = 5
/// mag_weighting = 1.0
/// poly_refine_iters = 3
///
/// [refine]
/// filt_len = 9
/// mag_weighting = 1.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimatorPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Finite-difference stage settings.
    #[serde(default)]
    pub finite_difference: FiniteDifferenceSettings,

    /// Refinement settings.
    #[serde(default)]
    pub refine: RefineSettings,
}

impl EstimatorPreset {
    /// Create a preset holding the estimator defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            finite_difference: FiniteDifferenceSettings::default(),
            refine: RefineSettings::default(),
        }
    }

    /// Capture an estimator configuration under a name.
    pub fn from_fd_config(name: impl Into<String>, config: &FdConfig) -> Self {
        Self {
            name: name.into(),
            description: None,
            finite_difference: FiniteDifferenceSettings {
                phase_differences: config.phase_differences,
                center_phase: config.center_phase,
                filt_len: config.filt_len,
                mag_weighting: config.mag_weighting,
                poly_refine_iters: config.poly_refine_iters,
            },
            refine: RefineSettings {
                filt_len: config.refine.filt_len,
                mag_weighting: config.refine.mag_weighting,
            },
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the finite-difference settings.
    pub fn with_finite_difference(mut self, settings: FiniteDifferenceSettings) -> Self {
        self.finite_difference = settings;
        self
    }

    /// Replace the refinement settings.
    pub fn with_refine(mut self, settings: RefineSettings) -> Self {
        self.refine = settings;
        self
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let preset: EstimatorPreset = toml::from_str(&content)?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), name = %preset.name, "loaded preset");

        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;

        #[cfg(feature = "tracing")]
        tracing::debug!(path = %path.display(), name = %self.name, "saved preset");

        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every setting; see [`validate_preset`].
    pub fn validate(&self) -> ValidationResult<()> {
        validate_preset(self)
    }

    /// Validate and convert into the estimator configuration.
    pub fn to_fd_config(&self) -> Result<FdConfig, ConfigError> {
        self.validate()?;
        let fd = &self.finite_difference;
        let mut refine = RefineConfig::default().with_mag_weighting(self.refine.mag_weighting);
        refine.filt_len = self.refine.filt_len;

        Ok(FdConfig::default()
            .with_phase_differences(fd.phase_differences)
            .with_center_phase(fd.center_phase)
            .with_filt_len(fd.filt_len)
            .with_mag_weighting(fd.mag_weighting)
            .with_poly_refine_iters(fd.poly_refine_iters)
            .with_refine(refine))
    }
}

impl Default for EstimatorPreset {
    fn default() -> Self {
        Self::new("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationError;

    #[test]
    fn test_new_holds_estimator_defaults() {
        let preset = EstimatorPreset::new("Test");
        assert_eq!(preset.name, "Test");
        assert!(preset.description.is_none());
        assert_eq!(preset.to_fd_config().unwrap(), FdConfig::default());
    }

    #[test]
    fn test_from_toml_full() {
        let toml = r#"
name = "Custom"
description = "Hand tuned"

[finite_difference]
phase_differences = 2
center_phase = false
filt_len = 7
mag_weighting = 2.0
poly_refine_iters = 5

[refine]
filt_len = 11
mag_weighting = 0.5
"#;

        let preset = EstimatorPreset::from_toml(toml).unwrap();
        assert_eq!(preset.name, "Custom");
        assert_eq!(preset.description.as_deref(), Some("Hand tuned"));

        let config = preset.to_fd_config().unwrap();
        assert_eq!(config.phase_differences, 2);
        assert!(!config.center_phase);
        assert_eq!(config.filt_len, 7);
        assert_eq!(config.mag_weighting, 2.0);
        assert_eq!(config.poly_refine_iters, 5);
        assert_eq!(config.refine.filt_len, Some(11));
        assert_eq!(config.refine.mag_weighting, 0.5);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let toml = r#"
name = "Minimal"

[finite_difference]
filt_len = 9
"#;

        let preset = EstimatorPreset::from_toml(toml).unwrap();
        assert_eq!(preset.finite_difference.filt_len, 9);
        assert_eq!(preset.finite_difference.phase_differences, 1);
        assert_eq!(preset.finite_difference.poly_refine_iters, 3);
        assert_eq!(preset.refine, RefineSettings::default());
    }

    #[test]
    fn test_to_toml_omits_unset_refine_length() {
        let toml = EstimatorPreset::new("Test")
            .with_description("Test description")
            .to_toml()
            .unwrap();

        assert!(toml.contains("name = \"Test\""));
        assert!(toml.contains("description = \"Test description\""));
        assert!(toml.contains("[finite_difference]"));
        let refine_table = toml.split("[refine]").nth(1).unwrap();
        assert!(!refine_table.contains("filt_len"), "got: {toml}");
    }

    #[test]
    fn test_roundtrip_through_fd_config() {
        let config = FdConfig::default()
            .with_phase_differences(2)
            .with_filt_len(3)
            .with_refine(RefineConfig::default().with_filt_len(13));
        let preset = EstimatorPreset::from_fd_config("captured", &config);

        let parsed = EstimatorPreset::from_toml(&preset.to_toml().unwrap()).unwrap();
        assert_eq!(parsed, preset);
        assert_eq!(parsed.to_fd_config().unwrap(), config);
    }

    #[test]
    fn test_invalid_preset_does_not_convert() {
        let preset = EstimatorPreset::new("bad").with_finite_difference(FiniteDifferenceSettings {
            filt_len: 4,
            ..FiniteDifferenceSettings::default()
        });

        let err = preset.to_fd_config().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::FilterLength { value: 4, .. })
        ));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = EstimatorPreset::from_toml("name = 3\n[finite_difference]\n").unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse(_)));
    }
}
