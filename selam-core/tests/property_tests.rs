//! Property tests for query invariants.
//!
//! Uses proptest to verify:
//! 1. Trend ordering: output is non-decreasing by date for any code subset
//! 2. Pivot uniqueness: `DuplicateKey` iff some (year, scenario) repeats
//! 3. Impact ordering: newest first, undated rows last in file order
//! 4. Latest value: the exact-year pick carries the greatest date

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate};
use proptest::prelude::*;
use selam_core::domain::{
    ForecastPoint, ImpactRecord, ImpactTable, Observation, ObservationTable, RecordType, Scenario,
};
use selam_core::query::{impact_matrix, latest_snapshot, pivot, trend_series, Fallback, QueryError};

const CODES: [&str; 4] = ["ACC_OWNERSHIP", "USG_DIGITAL_PAYMENT", "ACC_MM_ACCOUNT", "USG_P2P_COUNT"];

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_date() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::weighted(0.85, (2011..2026i32, 1..=12u32, 1..=28u32))
        .prop_map(|d| d.and_then(|(y, m, day)| NaiveDate::from_ymd_opt(y, m, day)))
}

fn arb_record_type() -> impl Strategy<Value = RecordType> {
    prop_oneof![
        4 => Just(RecordType::Observation),
        1 => Just(RecordType::Other("event".into())),
        1 => Just(RecordType::Other("target".into())),
    ]
}

fn arb_observation() -> impl Strategy<Value = Observation> {
    (0..CODES.len(), arb_date(), 0.0..100.0f64, arb_record_type())
        .prop_map(|(code, date, value, rt)| Observation::new(CODES[code], date, value, rt))
}

fn arb_scenario() -> impl Strategy<Value = Scenario> {
    prop_oneof![
        Just(Scenario::BaseCase),
        Just(Scenario::Optimistic),
        Just(Scenario::Pessimistic),
    ]
}

fn arb_forecast_row() -> impl Strategy<Value = ForecastPoint> {
    (2025..=2027i32, arb_scenario(), 30.0..70.0f64).prop_map(|(year, scenario, value)| ForecastPoint {
        indicator: "Access".into(),
        year: Some(year),
        scenario,
        value,
    })
}

fn arb_impact(i: usize) -> impl Strategy<Value = ImpactRecord> {
    (arb_date(), -0.05..0.1f64)
        .prop_map(move |(date, impact)| ImpactRecord::new("policy", date, format!("event {i}"), "ACC_OWNERSHIP", impact))
}

fn arb_impacts() -> impl Strategy<Value = Vec<ImpactRecord>> {
    (0..20usize).prop_flat_map(|n| (0..n).map(arb_impact).collect::<Vec<_>>())
}

// ── 1. Trend ordering ────────────────────────────────────────────────

proptest! {
    #[test]
    fn trend_series_is_sorted_by_date(
        rows in prop::collection::vec(arb_observation(), 0..60),
        mask in prop::collection::vec(any::<bool>(), CODES.len()),
    ) {
        let table = ObservationTable::new(rows);
        let selected: Vec<&str> = CODES.iter().zip(&mask).filter(|(_, &m)| m).map(|(c, _)| *c).collect();
        let series = trend_series(&table, selected.as_slice());

        prop_assert!(series.points.windows(2).all(|w| w[0].date <= w[1].date));
        prop_assert!(series.points.iter().all(|p| selected.contains(&p.indicator_code.as_str())));

        let expected = table
            .rows()
            .iter()
            .filter(|o| o.record_type.is_observation() && o.observation_date.is_some())
            .filter(|o| selected.contains(&o.indicator_code.as_str()))
            .count();
        prop_assert_eq!(series.len(), expected);
    }

    #[test]
    fn derived_year_matches_date(rows in prop::collection::vec(arb_observation(), 0..40)) {
        for row in ObservationTable::new(rows).rows() {
            prop_assert_eq!(row.year, row.observation_date.map(|d| d.year()));
        }
    }
}

// ── 2. Pivot uniqueness ──────────────────────────────────────────────

proptest! {
    #[test]
    fn pivot_rejects_exactly_the_duplicates(rows in prop::collection::vec(arb_forecast_row(), 0..12)) {
        let mut seen = HashSet::new();
        let has_duplicate = !rows.iter().all(|r| seen.insert((r.year, r.scenario.clone())));

        match pivot(&rows) {
            Ok(p) => {
                prop_assert!(!has_duplicate);
                let cells: usize = p.rows.values().map(|m| m.len()).sum();
                prop_assert_eq!(cells, rows.len());
            }
            Err(QueryError::DuplicateKey { .. }) => prop_assert!(has_duplicate),
            Err(other) => prop_assert!(false, "unexpected error {other}"),
        }
    }
}

// ── 3. Impact ordering ───────────────────────────────────────────────

proptest! {
    #[test]
    fn impact_matrix_newest_first_undated_last(records in arb_impacts()) {
        let undated_in_file_order: Vec<String> = records
            .iter()
            .filter(|r| r.observation_date.is_none())
            .map(|r| r.original_text.clone())
            .collect();
        let rows = impact_matrix(&ImpactTable::new(records, true));

        let first_undated = rows.iter().position(|r| r.observation_date.is_none()).unwrap_or(rows.len());
        prop_assert!(rows[first_undated..].iter().all(|r| r.observation_date.is_none()));
        prop_assert!(rows[..first_undated]
            .windows(2)
            .all(|w| w[0].observation_date >= w[1].observation_date));

        let undated: Vec<String> = rows[first_undated..].iter().map(|r| r.original_text.clone()).collect();
        prop_assert_eq!(undated, undated_in_file_order);
    }
}

// ── 4. Latest value ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn exact_year_pick_has_greatest_date(
        rows in prop::collection::vec(arb_observation(), 1..40),
        year in 2011..2026i32,
    ) {
        let table = ObservationTable::new(rows);
        let code = CODES[0];
        let best = table
            .rows()
            .iter()
            .filter(|o| o.indicator_code == code && o.year == Some(year))
            .filter_map(|o| o.observation_date)
            .max();

        match latest_snapshot(&table, code, year, Fallback::ExactYear) {
            Some(found) => prop_assert_eq!(found.observation_date, best),
            None => prop_assert!(best.is_none()),
        }
    }
}
