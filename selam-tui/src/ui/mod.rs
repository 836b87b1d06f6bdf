//! Top-level UI layout: one framed page plus the status bar.

pub mod forecasts_page;
pub mod impacts_page;
pub mod overlays;
pub mod overview_page;
pub mod projections_page;
pub mod status_bar;
pub mod trends_page;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use selam_core::dashboard::{Page, PageState};

use crate::app::{AppState, Overlay};
use crate::theme;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    // Split: main area + 1-line status bar.
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(f.area());

    let main_area = chunks[0];
    let status_area = chunks[1];

    draw_page(f, main_area, app);
    status_bar::render(f, status_area, app);

    match app.overlay {
        Overlay::Help => overlays::render_help(f, main_area),
        Overlay::ErrorHistory => overlays::render_error_history(f, main_area, app),
        Overlay::None => {}
    }
}

/// Draw the active page inside its border.
fn draw_page(f: &mut Frame, area: Rect, app: &AppState) {
    let page = app.active_page;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::panel_border(true))
        .title(format!(" {} [{}] ", page.label(), page.index() + 1))
        .title_style(theme::panel_title(true));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let dashboard = app.dashboard();
    match page {
        Page::Overview => render_state(f, inner, &dashboard.overview(), overview_page::render),
        Page::Trends => {
            let page = dashboard.trends(app.trends.selection.as_deref());
            render_state(f, inner, &page, |f, area, model| {
                trends_page::render(f, area, model, app.trends.cursor)
            })
        }
        Page::Forecasts => {
            let page = dashboard.forecasts(app.forecasts.selected.as_deref());
            render_state(f, inner, &page, forecasts_page::render)
        }
        Page::Impacts => render_state(f, inner, &dashboard.impacts(), |f, area, model| {
            impacts_page::render(f, area, model, app.impacts.scroll)
        }),
        Page::Projections => render_state(f, inner, &dashboard.projections(), projections_page::render),
    }
}

/// Draw a ready model, or the page's notice in place of its content.
fn render_state<T>(f: &mut Frame, area: Rect, state: &PageState<T>, render: impl FnOnce(&mut Frame, Rect, &T)) {
    match state {
        PageState::Ready(model) => render(f, area, model),
        PageState::NoData { message } => render_notice(f, area, message, theme::warning()),
        PageState::Failed { error } => render_notice(f, area, &error.to_string(), theme::negative()),
    }
}

fn render_notice(f: &mut Frame, area: Rect, message: &str, style: ratatui::style::Style) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(message.to_string(), style)),
        Line::from(""),
        Line::from(Span::styled("Press r to reload the data files.", theme::muted())),
    ];
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
