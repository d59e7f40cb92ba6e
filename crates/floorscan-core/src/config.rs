use crate::error::FloorscanError;
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_JSON: &str = include_str!("../config/default.json");

/// Tunable thresholds for fragment classification.
///
/// Distances are in page coordinates (points for PDF input).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionConfig {
    /// Largest gap between the bottom of a name fragment and the top of a
    /// dimension fragment for the two to be paired. Fragments may also
    /// overlap vertically by up to the same amount.
    pub max_vertical_gap: f64,
    /// Smallest shared x-range for two fragments to count as stacked.
    pub min_horizontal_overlap: f64,
    pub code_min_len: usize,
    pub code_max_len: usize,
}

impl ExtractionConfig {
    /// The built-in defaults from `config/default.json`.
    pub fn builtin() -> Result<ExtractionConfig, FloorscanError> {
        parse_config_str(DEFAULT_CONFIG_JSON)
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<ExtractionConfig, FloorscanError> {
    let content = std::fs::read_to_string(path).map_err(|e| FloorscanError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: ExtractionConfig =
        serde_json::from_str(&content).map_err(|e| FloorscanError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<ExtractionConfig, FloorscanError> {
    let config: ExtractionConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load `path` if given, otherwise the built-in defaults.
pub fn resolve_config(path: Option<&Path>) -> Result<ExtractionConfig, FloorscanError> {
    match path {
        Some(p) => load_config(p),
        None => ExtractionConfig::builtin(),
    }
}

/// Validate that a config is usable.
pub fn validate_config(config: &ExtractionConfig) -> Result<(), FloorscanError> {
    if !config.max_vertical_gap.is_finite() || config.max_vertical_gap < 0.0 {
        return Err(FloorscanError::ConfigInvalid(format!(
            "max_vertical_gap must be a non-negative number, got {}",
            config.max_vertical_gap
        )));
    }

    if !config.min_horizontal_overlap.is_finite() || config.min_horizontal_overlap < 0.0 {
        return Err(FloorscanError::ConfigInvalid(format!(
            "min_horizontal_overlap must be a non-negative number, got {}",
            config.min_horizontal_overlap
        )));
    }

    if config.code_min_len == 0 {
        return Err(FloorscanError::ConfigInvalid(
            "code_min_len must be at least 1".into(),
        ));
    }

    if config.code_min_len > config.code_max_len {
        return Err(FloorscanError::ConfigInvalid(format!(
            "code_min_len ({}) is greater than code_max_len ({})",
            config.code_min_len, config.code_max_len
        )));
    }

    Ok(())
}
