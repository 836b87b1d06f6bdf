//! Drive the TUI through key events and draw into a `TestBackend`.

use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use proptest::prelude::*;
use ratatui::backend::TestBackend;
use ratatui::Terminal;

use selam_core::dashboard::{Page, OVERVIEW_NO_DATA};
use selam_core::DashboardConfig;
use selam_tui::app::Overlay;
use selam_tui::{handle_key, ui, AppState};

fn fixture_config() -> DashboardConfig {
    DashboardConfig {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../selam-core/tests/fixtures"),
        ..DashboardConfig::default()
    }
}

fn fixture_app() -> AppState {
    AppState::new(fixture_config(), PathBuf::from("state.json"))
}

fn press(app: &mut AppState, code: KeyCode) {
    handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
}

fn screen(app: &AppState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(140, 45)).unwrap();
    terminal.draw(|f| ui::draw(f, app)).unwrap();

    let buffer = terminal.backend().buffer();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn overview_shows_cards() {
    let app = fixture_app();
    let text = screen(&app);
    assert!(text.contains("Overview [1]"));
    assert!(text.contains("Account Ownership (Access)"));
    assert!(text.contains("49%"));
    assert!(text.contains("P2P Transaction Growth"));
}

#[test]
fn digit_keys_switch_pages() {
    let mut app = fixture_app();

    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.active_page, Page::Forecasts);
    let text = screen(&app);
    assert!(text.contains("Forecasts (2025-2027) [3]"));
    assert!(text.contains("Base Case"));

    press(&mut app, KeyCode::Char('5'));
    let text = screen(&app);
    assert!(text.contains("Inclusion Projections [5]"));
    assert!(text.contains("8.0pp"));
    assert!(text.contains("Strategic Recommendations"));

    press(&mut app, KeyCode::Char('4'));
    let text = screen(&app);
    assert!(text.contains("NFIS-II Strategy"));
}

#[test]
fn tab_cycles_and_wraps() {
    let mut app = fixture_app();
    press(&mut app, KeyCode::BackTab);
    assert_eq!(app.active_page, Page::Projections);
    press(&mut app, KeyCode::Tab);
    assert_eq!(app.active_page, Page::Overview);
    handle_key(&mut app, KeyEvent::new(KeyCode::Tab, KeyModifiers::SHIFT));
    assert_eq!(app.active_page, Page::Projections);
}

#[test]
fn release_events_are_ignored() {
    let mut app = fixture_app();
    let mut key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
    key.kind = KeyEventKind::Release;
    handle_key(&mut app, key);
    assert!(app.running);

    press(&mut app, KeyCode::Char('q'));
    assert!(!app.running);
}

#[test]
fn trend_toggle_updates_chart_selection() {
    let mut app = fixture_app();
    press(&mut app, KeyCode::Char('2'));
    let available = app.dashboard().service().observed_indicators();
    let mm = available.iter().position(|c| c == "ACC_MM_ACCOUNT").unwrap();

    for _ in 0..mm {
        press(&mut app, KeyCode::Char('j'));
    }
    press(&mut app, KeyCode::Char(' '));
    let selection = app.trends.selection.clone().unwrap();
    assert!(selection.contains(&"ACC_MM_ACCOUNT".to_string()));
    assert!(selection.contains(&"ACC_OWNERSHIP".to_string()));
    assert!(screen(&app).contains("[x] ACC_MM_ACCOUNT"));

    press(&mut app, KeyCode::Char('d'));
    assert!(app.trends.selection.is_none());
}

#[test]
fn forecast_series_cycle() {
    let mut app = fixture_app();
    press(&mut app, KeyCode::Char('3'));
    press(&mut app, KeyCode::Char('l'));
    assert_eq!(app.forecasts.selected.as_deref(), Some("Usage (Digital Payments)"));
    assert!(screen(&app).contains("Usage (Digital Payments): 2025-2027 Projections"));
    press(&mut app, KeyCode::Char('l'));
    assert_eq!(app.forecasts.selected.as_deref(), Some("Access (Account Ownership)"));
}

#[test]
fn overlays_consume_keys() {
    let mut app = fixture_app();
    press(&mut app, KeyCode::Char('?'));
    assert_eq!(app.overlay, Overlay::Help);
    assert!(screen(&app).contains("Reload data files from disk"));

    // Any key closes help without acting on it.
    press(&mut app, KeyCode::Char('q'));
    assert_eq!(app.overlay, Overlay::None);
    assert!(app.running);

    press(&mut app, KeyCode::Char('e'));
    assert_eq!(app.overlay, Overlay::ErrorHistory);
    assert!(screen(&app).contains("No errors recorded."));
    press(&mut app, KeyCode::Esc);
    assert_eq!(app.overlay, Overlay::None);
}

#[test]
fn missing_data_renders_notice_and_recovers_on_reload() {
    let dir = tempfile::tempdir().unwrap();
    let config = DashboardConfig {
        data_dir: dir.path().to_path_buf(),
        ..DashboardConfig::default()
    };
    let mut app = AppState::new(config, PathBuf::from("state.json"));
    assert!(screen(&app).contains(OVERVIEW_NO_DATA));

    let fixtures = fixture_config().sources();
    let target = app.cache.sources().clone();
    std::fs::copy(&fixtures.observations, &target.observations).unwrap();
    std::fs::copy(&fixtures.forecasts, &target.forecasts).unwrap();
    std::fs::copy(&fixtures.impacts, &target.impacts).unwrap();

    press(&mut app, KeyCode::Char('r'));
    let text = screen(&app);
    assert!(!text.contains(OVERVIEW_NO_DATA));
    assert!(text.contains("49%"));
}

proptest! {
    #[test]
    fn tab_then_backtab_returns_to_start(start in 0usize..5, steps in 0usize..12) {
        let mut app = fixture_app();
        app.active_page = Page::from_index(start).unwrap();
        for _ in 0..steps {
            press(&mut app, KeyCode::Tab);
        }
        prop_assert_eq!(app.active_page.index(), (start + steps) % 5);
        for _ in 0..steps {
            press(&mut app, KeyCode::BackTab);
        }
        prop_assert_eq!(app.active_page, Page::from_index(start).unwrap());
    }
}
