//! Keyboard input dispatch: overlays → global keys → page-specific handlers.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use selam_core::dashboard::Page;

use crate::app::{AppState, Overlay};

/// Handle a key event. Sets `app.running = false` on quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) {
    // Only handle key press events (Windows sends both Press and Release).
    if key.kind != KeyEventKind::Press {
        return;
    }

    // 1. Overlays consume input first.
    match app.overlay {
        Overlay::Help => {
            app.overlay = Overlay::None;
            return;
        }
        Overlay::ErrorHistory => {
            handle_error_overlay(app, key);
            return;
        }
        Overlay::None => {}
    }

    // 2. Global keys (always available).
    match key.code {
        KeyCode::Char('q') => {
            app.running = false;
            return;
        }
        KeyCode::Char(c @ '1'..='5') => {
            let index = c as usize - '1' as usize;
            if let Some(page) = Page::from_index(index) {
                app.active_page = page;
            }
            return;
        }
        KeyCode::Tab => {
            if key.modifiers.contains(KeyModifiers::SHIFT) {
                app.active_page = app.active_page.prev();
            } else {
                app.active_page = app.active_page.next();
            }
            return;
        }
        KeyCode::BackTab => {
            app.active_page = app.active_page.prev();
            return;
        }
        KeyCode::Char('?') => {
            app.overlay = Overlay::Help;
            return;
        }
        KeyCode::Char('e') => {
            app.overlay = Overlay::ErrorHistory;
            app.error_scroll = 0;
            return;
        }
        KeyCode::Char('r') => {
            app.reload();
            return;
        }
        _ => {}
    }

    // 3. Page-specific keys.
    match app.active_page {
        Page::Trends => handle_trends_key(app, key),
        Page::Forecasts => handle_forecasts_key(app, key),
        Page::Impacts => handle_impacts_key(app, key),
        Page::Overview | Page::Projections => {} // display only
    }
}

fn handle_error_overlay(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('e') => {
            app.overlay = Overlay::None;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if app.error_scroll + 1 < app.error_history.len() {
                app.error_scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.error_scroll = app.error_scroll.saturating_sub(1);
        }
        _ => {}
    }
}

fn handle_trends_key(app: &mut AppState, key: KeyEvent) {
    let dashboard = app.dashboard();
    let available = dashboard.service().observed_indicators();
    let defaults = dashboard.default_trend_selection();

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.trends.cursor + 1 < available.len() {
                app.trends.cursor += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.trends.cursor = app.trends.cursor.saturating_sub(1);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            if let Some(code) = available.get(app.trends.cursor) {
                app.trends.toggle(code, defaults);
            }
        }
        KeyCode::Char('d') => {
            app.trends.selection = None;
            app.set_status("Trend selection reset to defaults");
        }
        _ => {}
    }
}

fn handle_forecasts_key(app: &mut AppState, key: KeyEvent) {
    let names = app.dashboard().service().forecast_indicators();
    match key.code {
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char('j') | KeyCode::Down => {
            app.forecasts.cycle(&names, 1);
            app.check_forecast();
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::Char('k') | KeyCode::Up => {
            app.forecasts.cycle(&names, -1);
            app.check_forecast();
        }
        _ => {}
    }
}

fn handle_impacts_key(app: &mut AppState, key: KeyEvent) {
    let rows = app.snapshot.impacts().len();
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if app.impacts.scroll + 1 < rows {
                app.impacts.scroll += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.impacts.scroll = app.impacts.scroll.saturating_sub(1);
        }
        KeyCode::Char('g') => app.impacts.scroll = 0,
        KeyCode::Char('G') => app.impacts.scroll = rows.saturating_sub(1),
        _ => {}
    }
}
