//! Forecast points: one projected value per indicator, year and scenario.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Named forecast trajectory.
///
/// `Historical` never appears in the forecast source; it tags observed rows
/// when history and projections are plotted together. Labels outside the
/// known set are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Scenario {
    Historical,
    BaseCase,
    Optimistic,
    Pessimistic,
    Other(String),
}

impl Scenario {
    pub const FORECAST: [Scenario; 3] = [Scenario::BaseCase, Scenario::Optimistic, Scenario::Pessimistic];

    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "Historical" => Scenario::Historical,
            "Base Case" => Scenario::BaseCase,
            "Optimistic" => Scenario::Optimistic,
            "Pessimistic" => Scenario::Pessimistic,
            other => Scenario::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Scenario::Historical => "Historical",
            Scenario::BaseCase => "Base Case",
            Scenario::Optimistic => "Optimistic",
            Scenario::Pessimistic => "Pessimistic",
            Scenario::Other(s) => s,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for Scenario {
    fn from(s: String) -> Self {
        Scenario::parse(&s)
    }
}

impl From<Scenario> for String {
    fn from(s: Scenario) -> Self {
        s.label().to_string()
    }
}

/// One row of the forecast table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Human-readable series name (`Indicator` column). Not an indicator code.
    pub indicator: String,
    pub year: Option<i32>,
    pub scenario: Scenario,
    pub value: f64,
}

/// Immutable forecast table.
#[derive(Debug, Clone, Default)]
pub struct ForecastTable {
    rows: Vec<ForecastPoint>,
}

impl ForecastTable {
    pub fn new(rows: Vec<ForecastPoint>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ForecastPoint] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose series name equals `name`, in file order.
    pub fn for_indicator<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ForecastPoint> + 'a {
        self.rows.iter().filter(move |r| r.indicator == name)
    }

    /// Distinct series names in first-appearance order.
    pub fn indicators(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.indicator) {
                seen.push(row.indicator.clone());
            }
        }
        seen
    }
}
