//! Latest-value lookup for metric cards.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Observation, ObservationTable};

/// Whether a lookup may fall back to the most recent row of any year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    ExactYear,
    LatestDate,
}

/// How a `LatestValue` was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resolution {
    ExactYear,
    LatestDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestValue {
    pub indicator_code: String,
    pub value: f64,
    pub observation_date: Option<NaiveDate>,
    pub year: Option<i32>,
    pub resolution: Resolution,
}

/// Value of `code` in `year`.
///
/// Several rows in the same year resolve to the one with the greatest
/// date, then the earliest in file order. With `Fallback::LatestDate` and no
/// row in `year`, the most recent dated row of the indicator is used instead.
pub fn latest_snapshot(table: &ObservationTable, code: &str, year: i32, fallback: Fallback) -> Option<LatestValue> {
    let (row, resolution) = match most_recent(table.for_code_year(code, year)) {
        Some(row) => (row, Resolution::ExactYear),
        None if fallback == Fallback::LatestDate => {
            let row = most_recent(table.for_code(code).filter(|o| o.observation_date.is_some()))?;
            (row, Resolution::LatestDate)
        }
        None => return None,
    };

    Some(LatestValue {
        indicator_code: row.indicator_code.clone(),
        value: row.value_numeric,
        observation_date: row.observation_date,
        year: row.year,
        resolution,
    })
}

fn most_recent<'a>(rows: impl Iterator<Item = &'a Observation>) -> Option<&'a Observation> {
    rows.fold(None, |best: Option<&Observation>, row| match best {
        Some(b) if b.observation_date >= row.observation_date => Some(b),
        _ => Some(row),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordType;

    fn obs(code: &str, y: i32, m: u32, d: u32, v: f64) -> Observation {
        Observation::new(code, NaiveDate::from_ymd_opt(y, m, d), v, RecordType::Observation)
    }

    #[test]
    fn exact_year_match() {
        let table = ObservationTable::new(vec![
            obs("ACC_OWNERSHIP", 2021, 12, 31, 46.0),
            obs("ACC_OWNERSHIP", 2024, 11, 29, 49.0),
        ]);
        let v = latest_snapshot(&table, "ACC_OWNERSHIP", 2024, Fallback::ExactYear).unwrap();
        assert_eq!(v.value, 49.0);
        assert_eq!(v.resolution, Resolution::ExactYear);
    }

    #[test]
    fn duplicate_rows_in_year_pick_latest_date_then_file_order() {
        let table = ObservationTable::new(vec![
            obs("X", 2024, 3, 1, 1.0),
            obs("X", 2024, 9, 1, 2.0),
            obs("X", 2024, 9, 1, 3.0),
        ]);
        let v = latest_snapshot(&table, "X", 2024, Fallback::ExactYear).unwrap();
        assert_eq!(v.value, 2.0);
    }

    #[test]
    fn fallback_uses_most_recent_row() {
        let table = ObservationTable::new(vec![
            obs("ACC_MM_ACCOUNT", 2023, 6, 1, 9.45),
            obs("ACC_MM_ACCOUNT", 2021, 12, 31, 4.7),
            Observation::new("ACC_MM_ACCOUNT", None, 99.0, RecordType::Observation),
        ]);
        assert!(latest_snapshot(&table, "ACC_MM_ACCOUNT", 2024, Fallback::ExactYear).is_none());

        let v = latest_snapshot(&table, "ACC_MM_ACCOUNT", 2024, Fallback::LatestDate).unwrap();
        assert_eq!(v.value, 9.45);
        assert_eq!(v.year, Some(2023));
        assert_eq!(v.resolution, Resolution::LatestDate);
    }

    #[test]
    fn unknown_code_is_not_found() {
        let table = ObservationTable::default();
        assert!(latest_snapshot(&table, "NOPE", 2024, Fallback::LatestDate).is_none());
    }
}
