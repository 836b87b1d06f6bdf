//! Source file locations and structured load errors.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default file names under the processed-data directory.
pub const OBSERVATIONS_FILE: &str = "ethiopia_fi_unified_data.csv";
pub const FORECASTS_FILE: &str = "forecast_results_2025_2027.csv";
pub const IMPACTS_FILE: &str = "modeled_event_impacts.csv";

/// Which of the three tables a source feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Observations,
    Forecasts,
    Impacts,
}

impl SourceKind {
    pub const ALL: [SourceKind; 3] = [SourceKind::Observations, SourceKind::Forecasts, SourceKind::Impacts];

    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Observations => "observation",
            SourceKind::Forecasts => "forecast",
            SourceKind::Impacts => "impact",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a source could not contribute rows.
///
/// None of these reach the caller of `load` as an `Err`: the loader
/// substitutes an empty table and records the error in the `LoadReport`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("{kind} source missing: {}", path.display())]
    MissingSource { kind: SourceKind, path: PathBuf },

    #[error("{kind} source {} lacks required column '{column}'", path.display())]
    MissingColumn {
        kind: SourceKind,
        path: PathBuf,
        column: String,
    },

    #[error("failed to read {kind} source {}: {reason}", path.display())]
    Unreadable {
        kind: SourceKind,
        path: PathBuf,
        reason: String,
    },
}

impl SourceError {
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceError::MissingSource { kind, .. }
            | SourceError::MissingColumn { kind, .. }
            | SourceError::Unreadable { kind, .. } => *kind,
        }
    }
}

/// Paths of the three tabular sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSources {
    pub observations: PathBuf,
    pub forecasts: PathBuf,
    pub impacts: PathBuf,
}

impl DataSources {
    /// Default file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            observations: dir.join(OBSERVATIONS_FILE),
            forecasts: dir.join(FORECASTS_FILE),
            impacts: dir.join(IMPACTS_FILE),
        }
    }

    pub fn path(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Observations => &self.observations,
            SourceKind::Forecasts => &self.forecasts,
            SourceKind::Impacts => &self.impacts,
        }
    }

    /// BLAKE3 fingerprint over the bytes of all three files.
    ///
    /// Absent or unreadable files contribute a fixed marker, so the
    /// fingerprint also changes when a file appears or disappears.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for kind in SourceKind::ALL {
            hasher.update(kind.label().as_bytes());
            match fs::read(self.path(kind)) {
                Ok(bytes) => {
                    hasher.update(b"present");
                    hasher.update(&(bytes.len() as u64).to_le_bytes());
                    hasher.update(&bytes);
                }
                Err(_) => {
                    hasher.update(b"absent");
                }
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_uses_default_names() {
        let sources = DataSources::in_dir("/srv/data/processed");
        assert!(sources.observations.ends_with(OBSERVATIONS_FILE));
        assert!(sources.forecasts.ends_with(FORECASTS_FILE));
        assert_eq!(sources.path(SourceKind::Impacts), sources.impacts.as_path());
    }

    #[test]
    fn fingerprint_tracks_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let sources = DataSources::in_dir(dir.path());

        let empty = sources.fingerprint();
        assert_eq!(empty, sources.fingerprint());

        std::fs::write(&sources.forecasts, "Indicator,Year,Value,Scenario\n").unwrap();
        let with_forecast = sources.fingerprint();
        assert_ne!(empty, with_forecast);

        std::fs::write(&sources.forecasts, "Indicator,Year,Value,Scenario\nA,2025,1,Base Case\n").unwrap();
        assert_ne!(with_forecast, sources.fingerprint());
    }

    #[test]
    fn error_reports_kind() {
        let err = SourceError::MissingSource {
            kind: SourceKind::Impacts,
            path: PathBuf::from("x.csv"),
        };
        assert_eq!(err.kind(), SourceKind::Impacts);
        assert!(err.to_string().contains("impact source missing"));
    }
}
