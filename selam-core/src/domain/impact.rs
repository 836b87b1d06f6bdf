//! Modeled event impacts.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Estimated effect of one event on one indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactRecord {
    pub category: String,
    pub observation_date: Option<NaiveDate>,
    pub year: Option<i32>,
    /// Display metadata only.
    pub original_text: String,
    /// Loose reference to an indicator; not checked against the observations.
    pub related_indicator: String,
    /// Fractional impact: 0.03 is +3 percentage points.
    pub estimated_impact: f64,
}

impl ImpactRecord {
    pub fn new(
        category: impl Into<String>,
        observation_date: Option<NaiveDate>,
        original_text: impl Into<String>,
        related_indicator: impl Into<String>,
        estimated_impact: f64,
    ) -> Self {
        Self {
            category: category.into(),
            observation_date,
            year: observation_date.map(|d| d.year()),
            original_text: original_text.into(),
            related_indicator: related_indicator.into(),
            estimated_impact,
        }
    }

    /// Impact in percentage points.
    pub fn impact_percent(&self) -> f64 {
        self.estimated_impact * 100.0
    }
}

/// Immutable impact table.
#[derive(Debug, Clone, Default)]
pub struct ImpactTable {
    rows: Vec<ImpactRecord>,
    has_dates: bool,
}

impl ImpactTable {
    /// `has_dates` records whether the source carried an `observation_date` column.
    pub fn new(rows: Vec<ImpactRecord>, has_dates: bool) -> Self {
        Self { rows, has_dates }
    }

    pub fn rows(&self) -> &[ImpactRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_dates(&self) -> bool {
        self.has_dates
    }
}
