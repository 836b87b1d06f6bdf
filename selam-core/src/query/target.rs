//! Gap between the projected value and a national target.

use serde::Serialize;

use super::QueryError;
use crate::domain::{ForecastTable, Scenario};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetGap {
    pub indicator: String,
    pub year: i32,
    pub target_value: f64,
    pub base_value: f64,
    pub optimistic_value: f64,
    /// `target_value - base_value`.
    pub gap_points: f64,
}

/// Compare the Base Case projection for `year` with `target`.
///
/// Returns `Ok(None)` when there is no forecast data at all. Otherwise the
/// Base Case and Optimistic rows whose name contains `indicator` must each
/// be unique.
pub fn target_gap(
    forecasts: &ForecastTable,
    indicator: &str,
    year: i32,
    target: f64,
) -> Result<Option<TargetGap>, QueryError> {
    if forecasts.is_empty() {
        return Ok(None);
    }
    let base_value = single_value(forecasts, indicator, year, Scenario::BaseCase)?;
    let optimistic_value = single_value(forecasts, indicator, year, Scenario::Optimistic)?;

    Ok(Some(TargetGap {
        indicator: indicator.to_string(),
        year,
        target_value: target,
        base_value,
        optimistic_value,
        gap_points: target - base_value,
    }))
}

fn single_value(forecasts: &ForecastTable, indicator: &str, year: i32, scenario: Scenario) -> Result<f64, QueryError> {
    let matches: Vec<f64> = forecasts
        .rows()
        .iter()
        .filter(|r| r.indicator.contains(indicator) && r.year == Some(year) && r.scenario == scenario)
        .map(|r| r.value)
        .collect();

    match matches.as_slice() {
        [value] => Ok(*value),
        _ => Err(QueryError::AmbiguousOrMissingForecast {
            indicator: indicator.to_string(),
            year,
            scenario,
            matches: matches.len(),
        }),
    }
}
