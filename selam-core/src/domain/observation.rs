//! Observation: one row of the unified indicator table.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Row kind in the unified table.
///
/// Only `Observation` rows are real historical data points. Everything else
/// (annotations, targets, events) is carried through verbatim but excluded
/// from indicator enumeration and trend plotting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum RecordType {
    Observation,
    Other(String),
}

impl RecordType {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "observation" => RecordType::Observation,
            other => RecordType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Observation => "observation",
            RecordType::Other(s) => s,
        }
    }

    pub fn is_observation(&self) -> bool {
        matches!(self, RecordType::Observation)
    }
}

impl From<String> for RecordType {
    fn from(s: String) -> Self {
        RecordType::parse(&s)
    }
}

impl From<RecordType> for String {
    fn from(r: RecordType) -> Self {
        r.as_str().to_string()
    }
}

/// A single measurement of an indicator.
///
/// `year` is derived from `observation_date` when the row is built and is
/// `None` exactly when the date is missing or unparseable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub indicator_code: String,
    pub observation_date: Option<NaiveDate>,
    pub year: Option<i32>,
    /// Percentage or count depending on the indicator. `NaN` when the cell
    /// was empty or not numeric.
    pub value_numeric: f64,
    pub record_type: RecordType,
}

impl Observation {
    pub fn new(
        indicator_code: impl Into<String>,
        observation_date: Option<NaiveDate>,
        value_numeric: f64,
        record_type: RecordType,
    ) -> Self {
        Self {
            indicator_code: indicator_code.into(),
            observation_date,
            year: observation_date.map(|d| d.year()),
            value_numeric,
            record_type,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct CodeIndex {
    all: Vec<usize>,
    by_year: BTreeMap<i32, Vec<usize>>,
}

/// Immutable observation table with a per-code, per-year row index.
#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    rows: Vec<Observation>,
    index: HashMap<String, CodeIndex>,
}

impl ObservationTable {
    pub fn new(rows: Vec<Observation>) -> Self {
        let mut index: HashMap<String, CodeIndex> = HashMap::new();
        for (i, row) in rows.iter().enumerate() {
            let entry = index.entry(row.indicator_code.clone()).or_default();
            entry.all.push(i);
            if let Some(year) = row.year {
                entry.by_year.entry(year).or_default().push(i);
            }
        }
        Self { rows, index }
    }

    /// All rows in file order.
    pub fn rows(&self) -> &[Observation] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows for one indicator code, in file order.
    pub fn for_code<'a>(&'a self, code: &str) -> impl Iterator<Item = &'a Observation> + 'a {
        self.index
            .get(code)
            .map(|ix| ix.all.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.rows[i])
    }

    /// Rows for one indicator code in one calendar year, in file order.
    pub fn for_code_year<'a>(
        &'a self,
        code: &str,
        year: i32,
    ) -> impl Iterator<Item = &'a Observation> + 'a {
        self.index
            .get(code)
            .and_then(|ix| ix.by_year.get(&year))
            .map(|v| v.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.rows[i])
    }
}
