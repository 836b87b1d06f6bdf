//! CSV export of query results.
//!
//! - `trends.csv`: the default trend selection, oldest first
//! - `forecast_<slug>.csv`: one file per forecast series, historical rows included;
//!   series whose names flatten to the same slug get `_2`, `_3`, ... suffixes
//! - `impacts.csv`: the impact matrix, newest first
//!
//! Pages with no data are skipped rather than written as header-only files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use selam_core::dashboard::{Dashboard, PageState};
use selam_core::query::{ForecastView, ImpactRow, TrendSeries};

pub fn trends_csv(series: &TrendSeries) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["observation_date", "indicator_code", "value_numeric"])?;
    for p in &series.points {
        wtr.write_record([
            p.date.to_string().as_str(),
            p.indicator_code.as_str(),
            format_value(p.value).as_str(),
        ])?;
    }
    finish(wtr)
}

pub fn forecast_csv(view: &ForecastView) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["Indicator", "Year", "Scenario", "Value"])?;
    for p in &view.points {
        wtr.write_record([
            view.indicator.as_str(),
            p.year.to_string().as_str(),
            p.scenario.label(),
            format_value(p.value).as_str(),
        ])?;
    }
    finish(wtr)
}

pub fn impacts_csv(rows: &[ImpactRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record([
        "category",
        "observation_date",
        "original_text",
        "related_indicator",
        "estimated_impact",
        "impact_percent",
    ])?;
    for r in rows {
        wtr.write_record([
            r.category.as_str(),
            r.observation_date.map(|d| d.to_string()).unwrap_or_default().as_str(),
            r.original_text.as_str(),
            r.related_indicator.as_str(),
            format_value(r.estimated_impact).as_str(),
            format_value(r.impact_percent).as_str(),
        ])?;
    }
    finish(wtr)
}

/// Write every available export under `out_dir`. Returns the files written.
pub fn write_all(dashboard: &Dashboard<'_>, out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create export dir: {}", out_dir.display()))?;
    let mut written = Vec::new();

    if let PageState::Ready(model) = dashboard.trends(None) {
        written.push(write(out_dir, "trends.csv", &trends_csv(&model.series)?)?);
    }

    let service = dashboard.service();
    let mut taken = HashSet::new();
    for name in service.forecast_indicators() {
        let view = service.forecast_with_history(&name);
        let file = format!("forecast_{}.csv", unique_slug(&name, &mut taken));
        written.push(write(out_dir, &file, &forecast_csv(&view)?)?);
    }

    if let PageState::Ready(model) = dashboard.impacts() {
        written.push(write(out_dir, "impacts.csv", &impacts_csv(&model.rows)?)?);
    }

    tracing::info!(files = written.len(), dir = %out_dir.display(), "export complete");
    Ok(written)
}

fn write(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, content).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Missing values export as empty cells.
fn format_value(v: f64) -> String {
    if v.is_finite() {
        v.to_string()
    } else {
        String::new()
    }
}

/// `"Access (Account Ownership)"` → `"access_account_ownership"`.
fn slug(name: &str) -> String {
    let mut out = String::new();
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    while out.ends_with('_') {
        out.pop();
    }
    if out.is_empty() {
        out.push_str("series");
    }
    out
}

/// `slug(name)`, suffixed with `_2`, `_3`, ... until it is not in `taken`.
fn unique_slug(name: &str, taken: &mut HashSet<String>) -> String {
    let base = slug(name);
    let mut candidate = base.clone();
    let mut n = 2;
    while !taken.insert(candidate.clone()) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    candidate
}
