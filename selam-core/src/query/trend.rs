//! Historical trend series for multi-line plots.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ObservationTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub indicator_code: String,
    pub date: NaiveDate,
    pub value: f64,
}

/// Observation points sorted ascending by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TrendSeries {
    pub points: Vec<TrendPoint>,
}

impl TrendSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Points grouped per indicator, each group still in date order.
    pub fn by_indicator(&self) -> BTreeMap<&str, Vec<(NaiveDate, f64)>> {
        let mut groups: BTreeMap<&str, Vec<(NaiveDate, f64)>> = BTreeMap::new();
        for p in &self.points {
            groups.entry(p.indicator_code.as_str()).or_default().push((p.date, p.value));
        }
        groups
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.points.first()?.date, self.points.last()?.date))
    }

    /// Min and max over finite values.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        finite_range(self.points.iter().map(|p| p.value))
    }
}

pub(crate) fn finite_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Distinct codes of real observation rows, in first-appearance order.
pub fn observed_indicators(table: &ObservationTable) -> Vec<String> {
    let mut seen = HashSet::new();
    table
        .rows()
        .iter()
        .filter(|o| o.record_type.is_observation())
        .filter(|o| seen.insert(o.indicator_code.as_str()))
        .map(|o| o.indicator_code.clone())
        .collect()
}

/// Observation rows of the selected indicators, ascending by date.
///
/// Undated rows cannot be placed on a time axis and are left out. Rows with
/// equal dates keep their file order.
pub fn trend_series<S: AsRef<str>>(table: &ObservationTable, codes: &[S]) -> TrendSeries {
    if codes.is_empty() {
        return TrendSeries::default();
    }
    let wanted: HashSet<&str> = codes.iter().map(|c| c.as_ref()).collect();

    let mut points: Vec<TrendPoint> = table
        .rows()
        .iter()
        .filter(|o| o.record_type.is_observation() && wanted.contains(o.indicator_code.as_str()))
        .filter_map(|o| {
            o.observation_date.map(|date| TrendPoint {
                indicator_code: o.indicator_code.clone(),
                date,
                value: o.value_numeric,
            })
        })
        .collect();
    points.sort_by_key(|p| p.date);

    TrendSeries { points }
}
