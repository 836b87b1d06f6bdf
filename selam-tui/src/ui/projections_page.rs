//! Page 5: progress toward the national target.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;

use selam_core::dashboard::{format_percent, GaugeBands, ProjectionsModel, RECOMMENDATIONS};

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, model: &ProjectionsModel) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(5),
        ])
        .split(area);

    render_figures(f, rows[0], model);
    render_gauge(f, rows[1], model);
    render_bands(f, rows[2], &model.gauge);
    render_recommendations(f, rows[3]);
}

fn render_figures(f: &mut Frame, area: Rect, model: &ProjectionsModel) {
    let gap = &model.gap;
    let gap_style = if gap.gap_points > 0.0 {
        theme::warning()
    } else {
        theme::positive()
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(
                " Progress Toward National Target ({} by {})",
                format_percent(Some(gap.target_value)),
                gap.year
            ),
            theme::accent_bold(),
        )),
        Line::from(Span::styled(format!(" Series: {}", gap.indicator), theme::muted())),
        figure(format!("{} Base Forecast", gap.year), format!("{:.1}%", gap.base_value), theme::accent()),
        figure(format!("{} Optimistic", gap.year), format!("{:.1}%", gap.optimistic_value), theme::positive()),
        figure("Gap to Target".to_string(), format!("{:.1}pp", gap.gap_points), gap_style),
    ];
    f.render_widget(Paragraph::new(lines), area);
}

fn figure(label: String, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("   {label:<20}"), theme::muted()),
        Span::styled(value, style),
    ])
}

fn render_gauge(f: &mut Frame, area: Rect, model: &ProjectionsModel) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted())
                .title(" Base Case vs 100% ")
                .title_style(theme::text()),
        )
        .gauge_style(Style::default().fg(theme::ACCENT).bg(theme::BACKGROUND))
        .ratio(model.gauge.ratio())
        .label(Span::styled(format!("{:.1}%", model.gauge.value), theme::text()));
    f.render_widget(gauge, area);
}

/// One cell per axis step: baseline band, optimistic band, target marker.
fn band_cells(g: &GaugeBands, width: usize) -> Vec<(char, Style)> {
    let col = |v: f64| ((v / g.axis_max).clamp(0.0, 1.0) * width as f64).round() as usize;
    let baseline_end = col(g.baseline_band.1);
    let (opt_lo, opt_hi) = (col(g.optimistic_band.0), col(g.optimistic_band.1));
    let target = col(g.threshold).min(width.saturating_sub(1));

    (0..width)
        .map(|i| {
            if i == target {
                ('|', theme::negative())
            } else if i < baseline_end {
                ('░', theme::muted())
            } else if i >= opt_lo && i < opt_hi {
                ('▒', theme::positive())
            } else {
                (' ', theme::text())
            }
        })
        .collect()
}

fn render_bands(f: &mut Frame, area: Rect, g: &GaugeBands) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(
            " baseline 0-{:.0} | optimistic {:.0}-{:.0} | target {:.0} ",
            g.baseline_band.1, g.optimistic_band.0, g.optimistic_band.1, g.threshold
        ))
        .title_style(theme::muted());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let spans: Vec<Span> = band_cells(g, inner.width as usize)
        .into_iter()
        .map(|(c, style)| Span::styled(c.to_string(), style))
        .collect();
    f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

fn render_recommendations(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" Strategic Recommendations ")
        .title_style(theme::text());

    let lines: Vec<Line> = RECOMMENDATIONS
        .iter()
        .enumerate()
        .map(|(i, (title, text))| {
            Line::from(vec![
                Span::styled(format!("{}. {title}: ", i + 1), theme::accent()),
                Span::styled(*text, theme::muted()),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bands() -> GaugeBands {
        GaugeBands {
            axis_max: 100.0,
            value: 52.0,
            baseline_band: (0.0, 49.0),
            optimistic_band: (49.0, 58.0),
            threshold: 60.0,
        }
    }

    #[test]
    fn target_marker_lands_on_threshold_column() {
        let cells = band_cells(&bands(), 100);
        assert_eq!(cells.len(), 100);
        assert_eq!(cells[60].0, '|');
        assert_eq!(cells[10].0, '░');
        assert_eq!(cells[50].0, '▒');
        assert_eq!(cells[80].0, ' ');
    }

    #[test]
    fn zero_width_is_empty() {
        assert!(band_cells(&bands(), 0).is_empty());
    }
}
