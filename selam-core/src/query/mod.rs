//! Indicator Query Engine.
//!
//! Pure functions over a loaded `Snapshot`. Empty tables produce empty
//! results or `None`; only violated uniqueness assumptions are errors.

pub mod forecast;
pub mod history_map;
pub mod impact;
pub mod latest;
pub mod target;
pub mod trend;

pub use forecast::{forecast_with_history, pivot, ForecastPivot, ForecastView, ScenarioPoint};
pub use history_map::{ContainsRule, HistoricalCodeMap, MatchRule};
pub use impact::{impact_magnitudes, impact_matrix, ImpactMagnitude, ImpactRow};
pub use latest::{latest_snapshot, Fallback, LatestValue, Resolution};
pub use target::{target_gap, TargetGap};
pub use trend::{observed_indicators, trend_series, TrendPoint, TrendSeries};

use serde::Serialize;
use thiserror::Error;

use crate::data::Snapshot;
use crate::domain::Scenario;

/// Structural data-quality violations. "No rows" is never one of these.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryError {
    #[error("duplicate forecast rows for '{indicator}' in {year}, scenario '{scenario}'")]
    DuplicateKey {
        indicator: String,
        year: i32,
        scenario: Scenario,
    },

    #[error("expected exactly one '{scenario}' forecast matching '{indicator}' in {year}, found {matches}")]
    AmbiguousOrMissingForecast {
        indicator: String,
        year: i32,
        scenario: Scenario,
        matches: usize,
    },
}

/// Query façade over one snapshot.
#[derive(Debug, Clone, Copy)]
pub struct IndicatorService<'a> {
    snapshot: &'a Snapshot,
    history: &'a HistoricalCodeMap,
}

impl<'a> IndicatorService<'a> {
    pub fn new(snapshot: &'a Snapshot, history: &'a HistoricalCodeMap) -> Self {
        Self { snapshot, history }
    }

    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn history_map(&self) -> &'a HistoricalCodeMap {
        self.history
    }

    pub fn latest_snapshot(&self, code: &str, year: i32, fallback: Fallback) -> Option<LatestValue> {
        latest_snapshot(self.snapshot.observations(), code, year, fallback)
    }

    pub fn observed_indicators(&self) -> Vec<String> {
        observed_indicators(self.snapshot.observations())
    }

    pub fn trend_series<S: AsRef<str>>(&self, codes: &[S]) -> TrendSeries {
        trend_series(self.snapshot.observations(), codes)
    }

    pub fn forecast_indicators(&self) -> Vec<String> {
        self.snapshot.forecasts().indicators()
    }

    pub fn forecast_with_history(&self, name: &str) -> ForecastView {
        forecast_with_history(self.snapshot.observations(), self.snapshot.forecasts(), self.history, name)
    }

    pub fn impact_matrix(&self) -> Vec<ImpactRow> {
        impact_matrix(self.snapshot.impacts())
    }

    pub fn impact_magnitudes(&self) -> Vec<ImpactMagnitude> {
        impact_magnitudes(self.snapshot.impacts())
    }

    pub fn target_gap(&self, indicator: &str, year: i32, target: f64) -> Result<Option<TargetGap>, QueryError> {
        target_gap(self.snapshot.forecasts(), indicator, year, target)
    }
}
