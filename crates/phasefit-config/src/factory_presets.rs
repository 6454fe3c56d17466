//! Factory presets bundled with the phasefit library.
//!
//! These presets are always available without external files and cover the
//! usual trade-offs: wide frequency sweeps, low SNR, and throughput.

use crate::EstimatorPreset;

/// Array of factory preset names for external access.
pub static FACTORY_PRESET_NAMES: &[&str] = &["default", "wideband", "low_snr", "fast"];

/// TOML content for factory presets, embedded at compile time.
static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("wideband", WIDEBAND_PRESET),
    ("low_snr", LOW_SNR_PRESET),
    ("fast", FAST_PRESET),
];

/// Estimator defaults.
const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "One phase difference, length-5 smoothing, three refinement passes"

[finite_difference]
phase_differences = 1
center_phase = true
filt_len = 5
mag_weighting = 1.0
poly_refine_iters = 3

[refine]
mag_weighting = 1.0
"#;

/// Two phase differences for chirps that sweep most of the band.
const WIDEBAND_PRESET: &str = r#"
name = "Wideband"
description = "Two phase differences for instantaneous frequency sweeping most of the Nyquist band"

[finite_difference]
phase_differences = 2
center_phase = true
filt_len = 5
mag_weighting = 1.0
poly_refine_iters = 3

[refine]
mag_weighting = 1.0
"#;

/// Heavier smoothing and extra refinement near the SNR threshold.
const LOW_SNR_PRESET: &str = r#"
name = "Low SNR"
description = "Wider smoothing and more refinement passes for noisy signals"

[finite_difference]
phase_differences = 1
center_phase = true
filt_len = 9
mag_weighting = 2.0
poly_refine_iters = 5

[refine]
mag_weighting = 2.0
"#;

/// Minimum work per estimate.
const FAST_PRESET: &str = r#"
name = "Fast"
description = "Single refinement pass with a short fixed filter"

[finite_difference]
phase_differences = 1
center_phase = true
filt_len = 3
mag_weighting = 1.0
poly_refine_iters = 1

[refine]
filt_len = 5
mag_weighting = 1.0
"#;

/// Get all factory presets.
///
/// # Example
///
/// ```rust
/// use phasefit_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<EstimatorPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| EstimatorPreset::from_toml(toml).ok())
        .collect()
}

/// Get a factory preset by identifier or display name, case-insensitively.
///
/// # Example
///
/// ```rust
/// use phasefit_config::get_factory_preset;
///
/// let preset = get_factory_preset("wideband").unwrap();
/// assert_eq!(preset.finite_difference.phase_differences, 2);
/// assert!(get_factory_preset("Low SNR").is_some());
/// ```
pub fn get_factory_preset(name: &str) -> Option<EstimatorPreset> {
    let name_lower = name.to_lowercase();

    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.to_lowercase() == name_lower)
    {
        return EstimatorPreset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.to_lowercase() == name_lower)
}
