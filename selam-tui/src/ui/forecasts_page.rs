//! Page 3: scenario lines over history, pivot table, scenario definitions.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Cell, Chart, Dataset, GraphType, Paragraph, Row, Table, Wrap};
use ratatui::Frame;

use selam_core::dashboard::{ForecastsModel, SCENARIO_DEFINITIONS};
use selam_core::query::ForecastPivot;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, model: &ForecastsModel) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(8), Constraint::Length(9)])
        .split(area);

    render_header(f, rows[0], model);
    render_chart(f, rows[1], model);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);
    render_pivot(f, bottom[0], model);
    render_definitions(f, bottom[1]);
}

fn render_header(f: &mut Frame, area: Rect, model: &ForecastsModel) {
    let position = model
        .indicators
        .iter()
        .position(|n| *n == model.view.indicator)
        .map(|i| i + 1)
        .unwrap_or(1);

    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {}: 2025-2027 Projections", model.view.indicator), theme::accent_bold()),
        Span::styled(
            format!("  ({position}/{}) [h/l] series", model.indicators.len()),
            theme::muted(),
        ),
    ])];
    if model.shares_history_with.is_empty() {
        lines.push(Line::from(Span::styled(
            format!(" history: {}", model.view.historical_code),
            theme::muted(),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!(
                " history: {} (also used by {})",
                model.view.historical_code,
                model.shares_history_with.join(", ")
            ),
            theme::warning(),
        )));
    }
    f.render_widget(Paragraph::new(lines), area);
}

fn render_chart(f: &mut Frame, area: Rect, model: &ForecastsModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Scenarios ")
        .title_style(theme::text());

    let series = model.view.series();
    if series.is_empty() {
        let text = Paragraph::new(Span::styled("No points for this series.", theme::muted())).block(block);
        f.render_widget(text, area);
        return;
    }

    let data: Vec<(Style, &str, Vec<(f64, f64)>)> = series
        .iter()
        .map(|(scenario, points)| {
            let xy = points.iter().map(|(y, v)| (*y as f64, *v)).collect();
            (Style::default().fg(theme::scenario_color(scenario)), scenario.label(), xy)
        })
        .collect();

    let all = model.view.points.iter().filter(|p| p.value.is_finite());
    let (mut x_min, mut x_max, mut y_min, mut y_max) = (i32::MAX, i32::MIN, f64::INFINITY, f64::NEG_INFINITY);
    for p in all {
        x_min = x_min.min(p.year);
        x_max = x_max.max(p.year);
        y_min = y_min.min(p.value);
        y_max = y_max.max(p.value);
    }
    if x_min > x_max {
        let text = Paragraph::new(Span::styled("No numeric values for this series.", theme::muted())).block(block);
        f.render_widget(text, area);
        return;
    }
    let padding = ((y_max - y_min).abs() * 0.1).max(1.0);
    let (y_lo, y_hi) = ((y_min - padding).max(0.0), y_max + padding);

    let datasets: Vec<Dataset> = data
        .iter()
        .map(|(style, name, xy)| {
            Dataset::default()
                .name(*name)
                .marker(symbols::Marker::Braille)
                .style(*style)
                .graph_type(GraphType::Line)
                .data(xy)
        })
        .collect();

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title(Span::styled("Year", theme::muted()))
                .style(theme::muted())
                .bounds([x_min as f64, (x_max as f64).max(x_min as f64 + 1.0)])
                .labels(vec![
                    Span::styled(x_min.to_string(), theme::muted()),
                    Span::styled(x_max.to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("%", theme::muted()))
                .style(theme::muted())
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::styled(format!("{y_lo:.0}"), theme::muted()),
                    Span::styled(format!("{y_hi:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_pivot(f: &mut Frame, area: Rect, model: &ForecastsModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Forecast Table ")
        .title_style(theme::text());

    match (&model.pivot, &model.pivot_error) {
        (Some(pivot), _) => f.render_widget(pivot_table(pivot).block(block), area),
        (None, Some(err)) => {
            let text = Paragraph::new(Span::styled(err.to_string(), theme::negative()))
                .wrap(Wrap { trim: true })
                .block(block);
            f.render_widget(text, area);
        }
        (None, None) => f.render_widget(block, area),
    }
}

fn pivot_table(pivot: &ForecastPivot) -> Table<'_> {
    let header = Row::new(
        std::iter::once(Cell::from("Year")).chain(
            pivot
                .scenarios
                .iter()
                .map(|s| Cell::from(s.label()).style(Style::default().fg(theme::scenario_color(s)))),
        ),
    )
    .style(theme::accent_bold());

    let rows: Vec<Row> = pivot
        .years()
        .map(|year| {
            let cells = std::iter::once(Cell::from(year.to_string())).chain(pivot.scenarios.iter().map(|s| {
                match pivot.get(year, s) {
                    Some(v) => Cell::from(format!("{v:.2}")),
                    None => Cell::from("-").style(theme::muted()),
                }
            }));
            Row::new(cells).style(theme::text())
        })
        .collect();

    let widths = std::iter::once(Constraint::Length(6))
        .chain(pivot.scenarios.iter().map(|_| Constraint::Length(12)))
        .collect::<Vec<_>>();

    Table::new(rows, widths).header(header).column_spacing(1)
}

fn render_definitions(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Scenario Definitions ")
        .title_style(theme::text());

    let mut lines = Vec::new();
    for (name, text) in SCENARIO_DEFINITIONS {
        lines.push(Line::from(vec![
            Span::styled(format!("{name}: "), theme::accent()),
            Span::styled(text, theme::muted()),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}
