//! Page 1: metric cards and P2P transaction growth.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use selam_core::dashboard::{MetricCard, OverviewModel, P2P_NOTE};
use selam_core::query::Resolution;

use crate::theme;

pub fn render(f: &mut Frame, area: Rect, model: &OverviewModel) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(6), Constraint::Min(6)])
        .split(area);

    f.render_widget(
        Paragraph::new(Span::styled(
            format!(" Key Metrics Snapshot ({})", model.snapshot_year),
            theme::accent_bold(),
        )),
        rows[0],
    );

    let n = model.cards.len().max(1) as u32;
    let card_areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, n); n as usize])
        .split(rows[1]);
    for (card, slot) in model.cards.iter().zip(card_areas.iter()) {
        render_card(f, *slot, card);
    }

    render_p2p(f, rows[2], model);
}

fn render_card(f: &mut Frame, area: Rect, card: &MetricCard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(format!(" {} ", card.title))
        .title_style(theme::text());

    let value_style = if card.value.is_some() {
        theme::accent_bold()
    } else {
        theme::muted()
    };
    let mut lines = vec![
        Line::from(Span::styled(card.display_value(), value_style)),
        Line::from(Span::styled(card.delta.as_str(), theme::positive())),
    ];
    if card.resolution == Some(Resolution::LatestDate) {
        lines.push(Line::from(Span::styled("latest available", theme::muted())));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_p2p(f: &mut Frame, area: Rect, model: &OverviewModel) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::muted())
        .title(" P2P Transaction Growth ")
        .title_style(theme::text());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3)])
        .split(inner);

    f.render_widget(
        Paragraph::new(Span::styled(P2P_NOTE, theme::muted())).wrap(Wrap { trim: true }),
        parts[0],
    );

    if model.p2p.is_empty() {
        f.render_widget(
            Paragraph::new(Span::styled("No P2P transaction counts recorded.", theme::warning())),
            parts[1],
        );
        return;
    }

    // Bars take whole numbers; values are counts so rounding loses nothing visible.
    let bars: Vec<Bar> = model
        .p2p
        .iter()
        .map(|b| {
            Bar::default()
                .value(b.value.max(0.0).round() as u64)
                .text_value(format!("{:.1}", b.value))
                .label(Line::from(b.year.to_string()))
                .style(theme::positive())
        })
        .collect();

    let chart = BarChart::default()
        .data(BarGroup::default().bars(&bars))
        .bar_width(8)
        .bar_gap(2)
        .value_style(theme::text());
    f.render_widget(chart, parts[1]);
}
