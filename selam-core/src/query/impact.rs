//! Event-impact matrix and per-indicator magnitudes.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::ImpactTable;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactRow {
    pub category: String,
    pub observation_date: Option<NaiveDate>,
    pub original_text: String,
    pub related_indicator: String,
    pub estimated_impact: f64,
    /// `estimated_impact × 100`.
    pub impact_percent: f64,
}

/// Summed impact for one `(indicator, category)` bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactMagnitude {
    pub related_indicator: String,
    pub category: String,
    pub impact_percent: f64,
    pub events: usize,
}

/// Most recent first; undated rows last, in file order.
fn newest_first(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub fn impact_matrix(table: &ImpactTable) -> Vec<ImpactRow> {
    let mut rows: Vec<ImpactRow> = table
        .rows()
        .iter()
        .map(|r| ImpactRow {
            category: r.category.clone(),
            observation_date: r.observation_date,
            original_text: r.original_text.clone(),
            related_indicator: r.related_indicator.clone(),
            estimated_impact: r.estimated_impact,
            impact_percent: r.impact_percent(),
        })
        .collect();
    rows.sort_by(|a, b| newest_first(a.observation_date, b.observation_date));
    rows
}

/// Impact summed per indicator and category, ordered by indicator then
/// category. Non-numeric impacts count as events but add nothing.
pub fn impact_magnitudes(table: &ImpactTable) -> Vec<ImpactMagnitude> {
    let mut sums: BTreeMap<(&str, &str), (f64, usize)> = BTreeMap::new();
    for r in table.rows() {
        let entry = sums
            .entry((r.related_indicator.as_str(), r.category.as_str()))
            .or_insert((0.0, 0));
        if r.estimated_impact.is_finite() {
            entry.0 += r.impact_percent();
        }
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|((indicator, category), (impact_percent, events))| ImpactMagnitude {
            related_indicator: indicator.to_string(),
            category: category.to_string(),
            impact_percent,
            events,
        })
        .collect()
}
