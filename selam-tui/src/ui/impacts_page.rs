//! Page 4: event impact matrix and per-indicator magnitudes.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use selam_core::dashboard::{ImpactsModel, IMPACTS_INTRO};
use selam_core::query::ImpactMagnitude;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, model: &ImpactsModel, scroll: usize) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(6), Constraint::Length(10)])
        .split(area);

    f.render_widget(Paragraph::new(Span::styled(IMPACTS_INTRO, theme::muted())), rows[0]);
    render_matrix(f, rows[1], model, scroll);
    render_magnitudes(f, rows[2], &model.magnitudes);
}

fn render_matrix(f: &mut Frame, area: Rect, model: &ImpactsModel, scroll: usize) {
    let title = if model.has_dates {
        format!(" Impact Matrix ({} events, newest first) [j/k] ", model.rows.len())
    } else {
        format!(" Impact Matrix ({} events) [j/k] ", model.rows.len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(title)
        .title_style(theme::text());

    let header = Row::new(["Category", "Date", "Event", "Indicator", "Impact (pp)"]).style(theme::accent_bold());

    let body: Vec<Row> = model
        .rows
        .iter()
        .enumerate()
        .skip(scroll)
        .map(|(i, r)| {
            let date = r.observation_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
            let impact = Cell::from(format!("{:+.2}", r.impact_percent))
                .style(Style::default().fg(theme::impact_color(r.impact_percent)));
            let style = if i == scroll {
                theme::text().add_modifier(Modifier::BOLD)
            } else {
                theme::text()
            };
            Row::new(vec![
                Cell::from(r.category.as_str()),
                Cell::from(date),
                Cell::from(r.original_text.as_str()),
                Cell::from(r.related_indicator.as_str()),
                impact,
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(16),
        Constraint::Length(11),
        Constraint::Min(20),
        Constraint::Length(22),
        Constraint::Length(11),
    ];
    let table = Table::new(body, widths).header(header).block(block).column_spacing(1);
    f.render_widget(table, area);
}

/// Bar heights use hundredths of a point; labels keep the sign.
fn bar_value(impact_percent: f64) -> u64 {
    if impact_percent.is_finite() {
        (impact_percent.abs() * 100.0).round() as u64
    } else {
        0
    }
}

fn render_magnitudes(f: &mut Frame, area: Rect, magnitudes: &[ImpactMagnitude]) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Projected Impact Magnitude (pp) ")
        .title_style(theme::text());

    if magnitudes.is_empty() {
        f.render_widget(block, area);
        return;
    }

    let bars: Vec<Bar> = magnitudes
        .iter()
        .map(|m| {
            Bar::default()
                .value(bar_value(m.impact_percent))
                .text_value(format!("{:+.2}", m.impact_percent))
                .label(Line::from(format!("{} / {}", m.related_indicator, m.category)))
                .style(Style::default().fg(theme::impact_color(m.impact_percent)))
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .data(BarGroup::default().bars(&bars))
        .bar_width(1)
        .bar_gap(0)
        .value_style(theme::text());
    f.render_widget(chart, area);
}
