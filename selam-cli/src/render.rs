//! Plain-text rendering of page models.

use std::fmt::Write;

use selam_core::dashboard::{
    format_percent, ForecastsModel, ImpactsModel, OverviewModel, ProjectionsModel, TrendsModel, KEY_OBSERVATIONS,
    P2P_NOTE, RECOMMENDATIONS, SCENARIO_DEFINITIONS,
};
use selam_core::data::SourceStatus;
use selam_core::query::Resolution;

fn rule(out: &mut String, width: usize) {
    let _ = writeln!(out, "{}", "-".repeat(width));
}

fn date_cell(date: Option<chrono::NaiveDate>) -> String {
    date.map(|d| d.to_string()).unwrap_or_else(|| "-".into())
}

pub fn sources(statuses: &[SourceStatus]) -> String {
    let mut out = String::new();
    for s in statuses {
        let state = if s.loaded { "loaded" } else { "EMPTY" };
        let _ = writeln!(out, "{:<12} {:<7} {}", s.kind.label(), state, s.message.as_deref().unwrap_or(""));
    }
    out
}

pub fn overview(model: &OverviewModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== Key Metrics Snapshot ({}) ===", model.snapshot_year);
    for card in &model.cards {
        let note = match card.resolution {
            Some(Resolution::LatestDate) => " (latest available)",
            _ => "",
        };
        let _ = writeln!(
            out,
            "{:<28} {:>7}  {}{note}",
            card.title,
            card.display_value(),
            card.delta
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "--- P2P Transaction Growth ---");
    let _ = writeln!(out, "{P2P_NOTE}");
    for bar in &model.p2p {
        let _ = writeln!(out, "{}  {:>10.1}", bar.year, bar.value);
    }
    out
}

pub fn indicators(observed: &[String], forecasts: &[String]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Observed indicators:");
    for code in observed {
        let _ = writeln!(out, "  {code}");
    }
    let _ = writeln!(out, "Forecast series:");
    for name in forecasts {
        let _ = writeln!(out, "  {name}");
    }
    out
}

pub fn trends(model: &TrendsModel) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Selected: {}", model.selected.join(", "));
    let _ = writeln!(out, "{:<12} {:<24} {:>10}", "Date", "Indicator", "Value");
    rule(&mut out, 48);
    for p in &model.series.points {
        let _ = writeln!(out, "{:<12} {:<24} {:>10.2}", p.date, p.indicator_code, p.value);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Key observations:");
    for note in KEY_OBSERVATIONS {
        let _ = writeln!(out, "- {note}");
    }
    out
}

pub fn forecast(model: &ForecastsModel) -> String {
    let mut out = String::new();
    let view = &model.view;
    let _ = writeln!(out, "=== {}: 2025-2027 Projections ===", view.indicator);
    let _ = writeln!(out, "History from {}", view.historical_code);
    if !model.shares_history_with.is_empty() {
        let _ = writeln!(
            out,
            "WARNING: history shared with {}",
            model.shares_history_with.join(", ")
        );
    }
    let _ = writeln!(out, "{:<6} {:<14} {:>8}", "Year", "Scenario", "Value");
    rule(&mut out, 30);
    for p in &view.points {
        let _ = writeln!(out, "{:<6} {:<14} {:>8.2}", p.year, p.scenario.label(), p.value);
    }

    let _ = writeln!(out);
    match (&model.pivot, &model.pivot_error) {
        (Some(pivot), _) => {
            let _ = write!(out, "{:<6}", "Year");
            for s in &pivot.scenarios {
                let _ = write!(out, " {:>12}", s.label());
            }
            let _ = writeln!(out);
            for year in pivot.years() {
                let _ = write!(out, "{year:<6}");
                for s in &pivot.scenarios {
                    match pivot.get(year, s) {
                        Some(v) => {
                            let _ = write!(out, " {v:>12.2}");
                        }
                        None => {
                            let _ = write!(out, " {:>12}", "-");
                        }
                    }
                }
                let _ = writeln!(out);
            }
        }
        (None, Some(err)) => {
            let _ = writeln!(out, "WARNING: {err}");
        }
        (None, None) => {}
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Scenario definitions:");
    for (name, text) in SCENARIO_DEFINITIONS {
        let _ = writeln!(out, "- {name}: {text}");
    }
    out
}

pub fn impacts(model: &ImpactsModel) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<16} {:<12} {:<36} {:<22} {:>8}",
        "Category", "Date", "Event", "Indicator", "Impact %"
    );
    rule(&mut out, 98);
    for r in &model.rows {
        let _ = writeln!(
            out,
            "{:<16} {:<12} {:<36} {:<22} {:>8.2}",
            r.category,
            date_cell(r.observation_date),
            r.original_text,
            r.related_indicator,
            r.impact_percent
        );
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "--- Projected Impact Magnitude (pp) ---");
    for m in &model.magnitudes {
        let _ = writeln!(
            out,
            "{:<22} {:<16} {:>8.2}  ({} events)",
            m.related_indicator, m.category, m.impact_percent, m.events
        );
    }
    out
}

pub fn projections(model: &ProjectionsModel) -> String {
    let mut out = String::new();
    let gap = &model.gap;
    let _ = writeln!(
        out,
        "=== Progress Toward National Target ({}) ===",
        format_percent(Some(gap.target_value))
    );
    let _ = writeln!(out, "{} Base Forecast:   {:.1}%", gap.year, gap.base_value);
    let _ = writeln!(out, "{} Optimistic:      {:.1}%", gap.year, gap.optimistic_value);
    let _ = writeln!(out, "Gap to Target:        {:.1}pp", gap.gap_points);
    let _ = writeln!(out, "{}", gauge_line(model, 50));
    let _ = writeln!(out);
    let _ = writeln!(out, "Strategic recommendations:");
    for (i, (title, text)) in RECOMMENDATIONS.iter().enumerate() {
        let _ = writeln!(out, "{}. {title}: {text}", i + 1);
    }
    out
}

/// `[#####====      |   ]`: `#` up to the value, `=` the optimistic band, `|` the target.
fn gauge_line(model: &ProjectionsModel, width: usize) -> String {
    let g = &model.gauge;
    let col = |v: f64| ((v / g.axis_max).clamp(0.0, 1.0) * width as f64).round() as usize;
    let filled = col(g.value);
    let (band_lo, band_hi) = (col(g.optimistic_band.0), col(g.optimistic_band.1));
    let target = col(g.threshold).min(width.saturating_sub(1));

    let cells: String = (0..width)
        .map(|i| match i {
            _ if i == target => '|',
            _ if i < filled => '#',
            _ if i >= band_lo && i < band_hi => '=',
            _ => ' ',
        })
        .collect();
    format!("[{cells}]")
}
