//! Selam TUI: five-page terminal dashboard over one indicator snapshot.
//!
//! Pages:
//! 1. Overview: metric cards, P2P transaction growth
//! 2. Trends Analysis: indicator picker and trend lines
//! 3. Forecasts: scenario lines, pivot table, definitions
//! 4. Event Impacts: impact matrix and magnitudes
//! 5. Inclusion Projections: target gauge and recommendations

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;

pub use app::AppState;
pub use input::handle_key;
