use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Number of stations in the default roster (`PS001`..`PS040`).
pub const DEFAULT_STATION_COUNT: usize = 40;

pub const DEFAULT_REPORT_FILE_NAME: &str = "discrepency-report.pdf";

pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Stations a processor may pick at login.
    pub stations: Vec<String>,
    /// `tracing` filter directive used when `LTRACK_LOG` is unset.
    pub log_filter: String,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Directory the report is exported into. `None` = current directory.
    pub output_dir: Option<PathBuf>,
    pub file_name: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            stations: default_roster(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            report: ReportSettings::default(),
        }
    }
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            output_dir: None,
            file_name: DEFAULT_REPORT_FILE_NAME.to_string(),
        }
    }
}

/// `PS001` through `PS040`.
pub fn default_roster() -> Vec<String> {
    (1..=DEFAULT_STATION_COUNT).map(|i| format!("PS{i:03}")).collect()
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("loadtrack")
            .join("settings.toml")
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report.file_name.trim().is_empty() {
            return Err(ConfigError::Validation("report.file_name must not be empty".into()));
        }

        for (i, station) in self.stations.iter().enumerate() {
            if station.trim().is_empty() {
                return Err(ConfigError::Validation(format!("stations[{i}] is empty")));
            }
            if self.stations[..i].contains(station) {
                return Err(ConfigError::Validation(format!(
                    "station '{station}' listed more than once"
                )));
            }
        }

        Ok(())
    }

    /// Load settings from `path`. The file must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&contents)
    }

    /// Load settings from the default location, falling back to defaults
    /// when no file is present.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn is_known_station(&self, station: &str) -> bool {
        self.stations.iter().any(|s| s == station)
    }

    /// Export directory, defaulting to the current directory.
    pub fn output_dir(&self) -> PathBuf {
        self.report.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}
