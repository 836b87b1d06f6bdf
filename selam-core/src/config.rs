//! Dashboard configuration.
//!
//! Stored as TOML. Every field has a default, so an absent file or a file
//! naming only a few keys is valid.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::sources::{DataSources, FORECASTS_FILE, IMPACTS_FILE, OBSERVATIONS_FILE};
use crate::domain::codes;
use crate::query::HistoricalCodeMap;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// File names of the three sources, relative to `data_dir`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFiles {
    pub observations: String,
    pub forecasts: String,
    pub impacts: String,
}

impl Default for SourceFiles {
    fn default() -> Self {
        Self {
            observations: OBSERVATIONS_FILE.to_string(),
            forecasts: FORECASTS_FILE.to_string(),
            impacts: IMPACTS_FILE.to_string(),
        }
    }
}

/// National target shown on the projections page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Substring selecting the forecast series.
    pub indicator: String,
    pub year: i32,
    pub value: f64,
    /// Lower gauge band ends here (last observed access rate).
    pub baseline: f64,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            indicator: "Access".to_string(),
            year: 2027,
            value: 60.0,
            baseline: 49.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub files: SourceFiles,
    /// Year of the overview metric cards.
    pub snapshot_year: i32,
    pub default_trend_codes: Vec<String>,
    pub target: TargetConfig,
    pub history_map: HistoricalCodeMap,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data").join("processed"),
            files: SourceFiles::default(),
            snapshot_year: 2024,
            default_trend_codes: vec![
                codes::ACC_OWNERSHIP.to_string(),
                codes::USG_DIGITAL_PAYMENT.to_string(),
            ],
            target: TargetConfig::default(),
            history_map: HistoricalCodeMap::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Like `from_file`, but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return Ok(Self::default());
        }
        Self::from_file(path)
    }

    pub fn sources(&self) -> DataSources {
        DataSources {
            observations: self.data_dir.join(&self.files.observations),
            forecasts: self.data_dir.join(&self.files.forecasts),
            impacts: self.data_dir.join(&self.files.impacts),
        }
    }
}
