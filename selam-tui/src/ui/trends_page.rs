//! Page 2: indicator picker and historical trend lines.

use chrono::{Datelike, NaiveDate};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap};
use ratatui::Frame;

use selam_core::dashboard::{TrendsModel, KEY_OBSERVATIONS};

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, model: &TrendsModel, cursor: usize) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(20)])
        .split(area);

    render_picker(f, cols[0], model, cursor);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(8), Constraint::Length(5)])
        .split(cols[1]);

    render_chart(f, right[0], model);
    render_observations(f, right[1]);
}

fn render_picker(f: &mut Frame, area: Rect, model: &TrendsModel, cursor: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Indicators [Space] ")
        .title_style(theme::text());
    let inner = block.inner(area);
    f.render_widget(block, area);

    // Keep the cursor row in view.
    let height = inner.height as usize;
    let start = cursor.saturating_sub(height.saturating_sub(1));

    let lines: Vec<Line> = model
        .available
        .iter()
        .enumerate()
        .skip(start)
        .take(height)
        .map(|(i, code)| {
            let slot = model.selected.iter().position(|c| c == code);
            let mark = if slot.is_some() { "[x] " } else { "[ ] " };
            let mut style = match slot {
                Some(s) => Style::default().fg(theme::series_color(s)),
                None => theme::muted(),
            };
            if i == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            Line::from(Span::styled(format!("{mark}{code}"), style))
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

/// X axis is fractional years so unevenly spaced dates plot at their true position.
fn year_fraction(date: NaiveDate) -> f64 {
    date.year() as f64 + (date.ordinal0() as f64 / 366.0)
}

fn render_chart(f: &mut Frame, area: Rect, model: &TrendsModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Historical Trends ")
        .title_style(theme::text());

    let (Some((first, last)), Some((lo, hi))) = (model.series.date_range(), model.series.value_range()) else {
        let text = Paragraph::new(Span::styled("Select an indicator to plot.", theme::muted())).block(block);
        f.render_widget(text, area);
        return;
    };

    let by_code = model.series.by_indicator();
    let data: Vec<(&str, Vec<(f64, f64)>)> = model
        .selected
        .iter()
        .filter_map(|code| {
            let points = by_code.get(code.as_str())?;
            let xy = points.iter().map(|(d, v)| (year_fraction(*d), *v)).collect();
            Some((code.as_str(), xy))
        })
        .collect();

    let datasets: Vec<Dataset> = data
        .iter()
        .map(|(code, xy)| {
            let slot = model.selected.iter().position(|c| c == code).unwrap_or(0);
            Dataset::default()
                .name(*code)
                .marker(symbols::Marker::Braille)
                .style(Style::default().fg(theme::series_color(slot)))
                .graph_type(GraphType::Line)
                .data(xy)
        })
        .collect();

    let x_min = first.year() as f64;
    let x_max = (last.year() + 1) as f64;
    let padding = ((hi - lo).abs() * 0.05).max(1.0);
    let y_min = (lo - padding).max(0.0);
    let y_max = hi + padding;

    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .style(theme::muted())
                .bounds([x_min, x_max])
                .labels(vec![
                    Span::styled(first.year().to_string(), theme::muted()),
                    Span::styled(last.year().to_string(), theme::muted()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title(Span::styled("Value", theme::muted()))
                .style(theme::muted())
                .bounds([y_min, y_max])
                .labels(vec![
                    Span::styled(format!("{y_min:.0}"), theme::muted()),
                    Span::styled(format!("{y_max:.0}"), theme::muted()),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_observations(f: &mut Frame, area: Rect) {
    let mut lines = vec![Line::from(Span::styled("Key observations", theme::accent_bold()))];
    for note in KEY_OBSERVATIONS {
        lines.push(Line::from(vec![
            Span::styled("- ", theme::accent()),
            Span::styled(note, theme::muted()),
        ]));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}
