use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::peaks::detect::DetectionMode;
use crate::peaks::report::ChemicalShiftReport;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "PEAK_PICKER_CONFIG";

/// User-tunable picking and reporting settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Nucleus for which the chemical-shift report is generated.
    pub reportable_isotope: String,
    /// Decimals printed per shift in the report.
    pub report_precision: usize,
    pub detection_mode: DetectionMode,
    /// JSON file receiving picked peaks; in-memory when unset.
    pub store_path: Option<PathBuf>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            reportable_isotope: "13C".to_string(),
            report_precision: 2,
            detection_mode: DetectionMode::Downward,
            store_path: None,
        }
    }
}

impl PickerConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).context("parsing config JSON")
    }

    /// Config from [`CONFIG_ENV_VAR`], falling back to defaults.
    pub fn from_env() -> Self {
        let Some(path) = std::env::var_os(CONFIG_ENV_VAR) else {
            return Self::default();
        };
        match Self::load(Path::new(&path)) {
            Ok(config) => {
                log::info!("Loaded config from {}", Path::new(&path).display());
                config
            }
            Err(e) => {
                log::error!("Ignoring config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn report_formatter(&self) -> ChemicalShiftReport {
        ChemicalShiftReport {
            reportable_isotope: self.reportable_isotope.clone(),
            precision: self.report_precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: PickerConfig =
            serde_json::from_str(r#"{ "reportable_isotope": "15N", "detection_mode": "local_maxima" }"#)
                .unwrap();
        assert_eq!(config.reportable_isotope, "15N");
        assert_eq!(config.detection_mode, DetectionMode::LocalMaxima);
        assert_eq!(config.report_precision, 2);
        assert!(config.store_path.is_none());
    }

    #[test]
    fn formatter_follows_config() {
        let config = PickerConfig {
            report_precision: 3,
            ..Default::default()
        };
        let formatter = config.report_formatter();
        assert_eq!(formatter.precision, 3);
        assert_eq!(formatter.reportable_isotope, "13C");
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(PickerConfig::load(Path::new("/nonexistent/peak-picker.json")).is_err());
    }
}
