//! Bottom status bar: page hints, last status message.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use selam_core::dashboard::Page;

use crate::app::{AppState, StatusLevel};
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];

    for page in Page::ALL {
        let style = if page == app.active_page {
            theme::accent_bold()
        } else {
            theme::muted()
        };
        spans.push(Span::styled(format!("{}:{} ", page.index() + 1, short_label(page)), style));
    }
    spans.push(Span::styled("?:Help", theme::muted()));

    spans.push(Span::raw(" | "));

    if let Some((msg, level)) = &app.status_message {
        let style = match level {
            StatusLevel::Info => theme::accent(),
            StatusLevel::Warning => theme::warning(),
            StatusLevel::Error => theme::negative(),
        };
        spans.push(Span::styled(msg.as_str(), style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn short_label(page: Page) -> &'static str {
    match page {
        Page::Overview => "Overview",
        Page::Trends => "Trends",
        Page::Forecasts => "Forecasts",
        Page::Impacts => "Impacts",
        Page::Projections => "Target",
    }
}
