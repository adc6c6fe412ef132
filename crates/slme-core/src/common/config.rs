//! Query defaults for the efficiency engine, loadable from a JSON document.

use super::constants::STANDARD_TEMPERATURE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_THICKNESS_M: f64 = 50.0e-6;
pub const DEFAULT_VOLTAGE_STEP: f64 = 0.001;
pub const DEFAULT_MAX_VOLTAGE_STEPS: usize = 100_000;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EfficiencyConfig {
    pub temperature: f64,
    pub thickness: f64,
    pub voltage_step: f64,
    pub max_voltage_steps: usize,
    pub cutoff_below_gap: bool,
    pub absorbance_in_inverse_cm: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solar_spectrum_path: Option<PathBuf>,
}

impl Default for EfficiencyConfig {
    fn default() -> Self {
        Self {
            temperature: STANDARD_TEMPERATURE,
            thickness: DEFAULT_THICKNESS_M,
            voltage_step: DEFAULT_VOLTAGE_STEP,
            max_voltage_steps: DEFAULT_MAX_VOLTAGE_STEPS,
            cutoff_below_gap: true,
            absorbance_in_inverse_cm: false,
            solar_spectrum_path: None,
        }
    }
}

impl EfficiencyConfig {
    /// Largest voltage the power climb may reach before giving up.
    pub fn voltage_ceiling(&self) -> f64 {
        self.voltage_step * self.max_voltage_steps as f64
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EfficiencyConfigError {
    #[error("failed to read efficiency config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse efficiency config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

pub fn load_efficiency_config(
    config_path: impl AsRef<Path>,
) -> Result<EfficiencyConfig, EfficiencyConfigError> {
    let config_path = config_path.as_ref();
    let source =
        fs::read_to_string(config_path).map_err(|source| EfficiencyConfigError::Read {
            path: config_path.to_path_buf(),
            source,
        })?;
    serde_json::from_str(&source).map_err(|source| EfficiencyConfigError::Parse {
        path: config_path.to_path_buf(),
        source,
    })
}
