//! Forecast scenarios joined with the historical series they extend.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::history_map::{HistoricalCodeMap, MatchRule};
use super::QueryError;
use crate::domain::{ForecastPoint, ForecastTable, ObservationTable, Scenario};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioPoint {
    pub year: i32,
    pub value: f64,
    pub scenario: Scenario,
}

/// Historical and projected values for one forecast series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastView {
    pub indicator: String,
    pub historical_code: String,
    pub history_rule: MatchRule,
    /// Ordered by year; within a year historical rows precede forecast rows.
    pub points: Vec<ScenarioPoint>,
    #[serde(skip)]
    forecast_rows: Vec<ForecastPoint>,
}

impl ForecastView {
    /// The forecast rows for this series, in file order.
    pub fn forecast_rows(&self) -> &[ForecastPoint] {
        &self.forecast_rows
    }

    /// Points per scenario, ready for one line each.
    pub fn series(&self) -> BTreeMap<&Scenario, Vec<(i32, f64)>> {
        let mut out: BTreeMap<&Scenario, Vec<(i32, f64)>> = BTreeMap::new();
        for p in &self.points {
            out.entry(&p.scenario).or_default().push((p.year, p.value));
        }
        out
    }

    /// `Year → {Scenario → Value}` over the forecast rows.
    pub fn pivot(&self) -> Result<ForecastPivot, QueryError> {
        pivot(&self.forecast_rows)
    }
}

/// Forecast values indexed by year and scenario.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ForecastPivot {
    pub scenarios: Vec<Scenario>,
    pub rows: BTreeMap<i32, BTreeMap<Scenario, f64>>,
}

impl ForecastPivot {
    pub fn years(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    pub fn get(&self, year: i32, scenario: &Scenario) -> Option<f64> {
        self.rows.get(&year)?.get(scenario).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Pivot forecast rows, rejecting any repeated `(year, scenario)` pair.
///
/// Rows whose year did not parse have no pivot cell. They are skipped before
/// the uniqueness check, so repeated yearless rows never raise `DuplicateKey`.
pub fn pivot(rows: &[ForecastPoint]) -> Result<ForecastPivot, QueryError> {
    let mut out: BTreeMap<i32, BTreeMap<Scenario, f64>> = BTreeMap::new();
    let mut scenarios = BTreeSet::new();

    for row in rows {
        let Some(year) = row.year else { continue };
        let cells = out.entry(year).or_default();
        if cells.insert(row.scenario.clone(), row.value).is_some() {
            return Err(QueryError::DuplicateKey {
                indicator: row.indicator.clone(),
                year,
                scenario: row.scenario.clone(),
            });
        }
        scenarios.insert(row.scenario.clone());
    }

    Ok(ForecastPivot {
        scenarios: scenarios.into_iter().collect(),
        rows: out,
    })
}

pub fn forecast_with_history(
    observations: &ObservationTable,
    forecasts: &ForecastTable,
    history: &HistoricalCodeMap,
    name: &str,
) -> ForecastView {
    let (code, rule) = history.resolve_with_rule(name);
    let forecast_rows: Vec<ForecastPoint> = forecasts.for_indicator(name).cloned().collect();

    let historical = observations
        .for_code(code)
        .filter(|o| o.record_type.is_observation())
        .filter_map(|o| {
            o.year.map(|year| ScenarioPoint {
                year,
                value: o.value_numeric,
                scenario: Scenario::Historical,
            })
        });
    let projected = forecast_rows.iter().filter_map(|f| {
        f.year.map(|year| ScenarioPoint {
            year,
            value: f.value,
            scenario: f.scenario.clone(),
        })
    });

    let mut points: Vec<ScenarioPoint> = historical.chain(projected).collect();
    points.sort_by_key(|p| p.year);

    ForecastView {
        indicator: name.to_string(),
        historical_code: code.to_string(),
        history_rule: rule,
        points,
        forecast_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{codes, Observation, RecordType};
    use chrono::NaiveDate;

    fn fc(name: &str, year: i32, scenario: Scenario, value: f64) -> ForecastPoint {
        ForecastPoint {
            indicator: name.into(),
            year: Some(year),
            scenario,
            value,
        }
    }

    fn observations() -> ObservationTable {
        let d = |y| NaiveDate::from_ymd_opt(y, 12, 31);
        ObservationTable::new(vec![
            Observation::new(codes::ACC_OWNERSHIP, d(2021), 46.0, RecordType::Observation),
            Observation::new(codes::ACC_OWNERSHIP, d(2024), 49.0, RecordType::Observation),
            Observation::new(codes::ACC_OWNERSHIP, d(2025), 70.0, RecordType::parse("target")),
            Observation::new(codes::USG_DIGITAL_PAYMENT, d(2024), 35.0, RecordType::Observation),
        ])
    }

    fn forecasts() -> ForecastTable {
        ForecastTable::new(vec![
            fc("Account Ownership (Access)", 2025, Scenario::BaseCase, 50.5),
            fc("Account Ownership (Access)", 2025, Scenario::Optimistic, 52.0),
            fc("Account Ownership (Access)", 2026, Scenario::BaseCase, 51.2),
            fc("Digital Payment (Usage)", 2025, Scenario::BaseCase, 37.0),
        ])
    }

    #[test]
    fn access_series_uses_account_ownership_history() {
        let view = forecast_with_history(
            &observations(),
            &forecasts(),
            &HistoricalCodeMap::default(),
            "Account Ownership (Access)",
        );
        assert_eq!(view.historical_code, codes::ACC_OWNERSHIP);
        assert_eq!(view.forecast_rows().len(), 3);

        let labels: Vec<(i32, &str)> = view.points.iter().map(|p| (p.year, p.scenario.label())).collect();
        assert_eq!(
            labels,
            vec![
                (2021, "Historical"),
                (2024, "Historical"),
                (2025, "Base Case"),
                (2025, "Optimistic"),
                (2026, "Base Case"),
            ]
        );
    }

    #[test]
    fn other_series_use_digital_payment_history() {
        let view = forecast_with_history(
            &observations(),
            &forecasts(),
            &HistoricalCodeMap::default(),
            "Digital Payment (Usage)",
        );
        assert_eq!(view.historical_code, codes::USG_DIGITAL_PAYMENT);
        assert_eq!(view.series()[&Scenario::Historical], vec![(2024, 35.0)]);
    }

    #[test]
    fn pivot_indexes_year_by_scenario() {
        let view = forecast_with_history(
            &observations(),
            &forecasts(),
            &HistoricalCodeMap::default(),
            "Account Ownership (Access)",
        );
        let pivot = view.pivot().unwrap();
        assert_eq!(pivot.years().collect::<Vec<_>>(), vec![2025, 2026]);
        assert_eq!(pivot.get(2025, &Scenario::Optimistic), Some(52.0));
        assert_eq!(pivot.get(2026, &Scenario::Optimistic), None);
        assert_eq!(pivot.scenarios, vec![Scenario::BaseCase, Scenario::Optimistic]);
    }

    #[test]
    fn pivot_rejects_duplicate_pairs() {
        let rows = vec![
            fc("Access", 2027, Scenario::BaseCase, 52.0),
            fc("Access", 2027, Scenario::BaseCase, 53.0),
        ];
        let err = pivot(&rows).unwrap_err();
        assert_eq!(
            err,
            QueryError::DuplicateKey {
                indicator: "Access".into(),
                year: 2027,
                scenario: Scenario::BaseCase,
            }
        );
    }

    #[test]
    fn yearless_rows_are_outside_duplicate_check() {
        let undated = |value| ForecastPoint {
            indicator: "Access".into(),
            year: None,
            scenario: Scenario::BaseCase,
            value,
        };
        let rows = vec![undated(50.0), undated(51.0), fc("Access", 2025, Scenario::BaseCase, 49.0)];
        let table = pivot(&rows).unwrap();
        assert_eq!(table.years().collect::<Vec<_>>(), vec![2025]);
        assert_eq!(table.get(2025, &Scenario::BaseCase), Some(49.0));

        let only_undated = pivot(&rows[..2]).unwrap();
        assert!(only_undated.is_empty());
    }

    #[test]
    fn unknown_series_has_history_only() {
        let view = forecast_with_history(&observations(), &forecasts(), &HistoricalCodeMap::default(), "Nope");
        assert!(view.forecast_rows().is_empty());
        assert!(view.points.iter().all(|p| p.scenario == Scenario::Historical));
        assert!(view.pivot().unwrap().is_empty());
    }
}
