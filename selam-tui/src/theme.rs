//! Parrot/neon theme tokens for the Selam TUI.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (primary highlights, focus)
//! - **Positive**: Neon green (gains, optimistic scenario)
//! - **Negative**: Hot pink (losses, errors, pessimistic scenario)
//! - **Warning**: Neon orange (no-data notices, target threshold)
//! - **Neutral**: Cool purple (extra chart series)
//! - **Muted**: Steel blue (labels, axis text)

use ratatui::style::{Color, Modifier, Style};

use selam_core::domain::Scenario;

pub const BACKGROUND: Color = Color::Rgb(18, 18, 20);
pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_SECONDARY: Color = Color::Rgb(170, 170, 170);

/// Line colors for multi-indicator charts, cycled by series index.
const SERIES: [Color; 6] = [ACCENT, POSITIVE, WARNING, NEUTRAL, NEGATIVE, MUTED];

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

/// Historical is drawn white on the dark background.
pub fn scenario_color(scenario: &Scenario) -> Color {
    match scenario {
        Scenario::Historical => TEXT_PRIMARY,
        Scenario::BaseCase => ACCENT,
        Scenario::Optimistic => POSITIVE,
        Scenario::Pessimistic => NEGATIVE,
        Scenario::Other(_) => TEXT_SECONDARY,
    }
}

/// Color for a signed impact (positive = green, negative = pink).
pub fn impact_color(value: f64) -> Color {
    if value >= 0.0 {
        POSITIVE
    } else {
        NEGATIVE
    }
}
