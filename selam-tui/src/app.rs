//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. Page content is rebuilt from the current
//! snapshot on every draw; only selections and cursors are stored.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDateTime;

use selam_core::dashboard::{Dashboard, Page, PageState};
use selam_core::data::{LoadMode, Snapshot, SnapshotCache};
use selam_core::DashboardConfig;

const ERROR_HISTORY_CAP: usize = 50;

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// A source file was missing or unreadable.
    Data,
    /// Duplicate or ambiguous forecast rows.
    Query,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Data => "DATA",
            ErrorCategory::Query => "QRY",
        }
    }
}

/// Trends page: indicator list cursor and the plotted selection.
#[derive(Debug, Default)]
pub struct TrendsPageState {
    pub cursor: usize,
    /// `None` until the user toggles something; the configured defaults apply.
    pub selection: Option<Vec<String>>,
}

impl TrendsPageState {
    /// Toggle `code`, starting from `defaults` on first use.
    pub fn toggle(&mut self, code: &str, defaults: Vec<String>) {
        let selection = self.selection.get_or_insert(defaults);
        match selection.iter().position(|c| c == code) {
            Some(i) => {
                selection.remove(i);
            }
            None => selection.push(code.to_string()),
        }
    }
}

/// Forecasts page: which series is shown.
#[derive(Debug, Default)]
pub struct ForecastsPageState {
    pub selected: Option<String>,
}

impl ForecastsPageState {
    /// Step through `names` by `delta`, wrapping.
    pub fn cycle(&mut self, names: &[String], delta: isize) {
        if names.is_empty() {
            return;
        }
        let current = self
            .selected
            .as_ref()
            .and_then(|s| names.iter().position(|n| n == s))
            .unwrap_or(0) as isize;
        let len = names.len() as isize;
        let next = (current + delta).rem_euclid(len) as usize;
        self.selected = Some(names[next].clone());
    }
}

/// Impacts page: first visible matrix row.
#[derive(Debug, Default)]
pub struct ImpactsPageState {
    pub scroll: usize,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Help,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_page: Page,
    pub running: bool,

    // Data
    pub config: DashboardConfig,
    pub cache: SnapshotCache,
    pub snapshot: Arc<Snapshot>,

    // Page states
    pub trends: TrendsPageState,
    pub forecasts: ForecastsPageState,
    pub impacts: ImpactsPageState,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,

    // Paths
    pub state_path: PathBuf,
}

impl AppState {
    pub fn new(config: DashboardConfig, state_path: PathBuf) -> Self {
        let mut cache = SnapshotCache::new(config.sources());
        let snapshot = cache.get(LoadMode::Cached);
        let mut app = Self {
            active_page: Page::Overview,
            running: true,
            config,
            cache,
            snapshot,
            trends: TrendsPageState::default(),
            forecasts: ForecastsPageState::default(),
            impacts: ImpactsPageState::default(),
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
            state_path,
        };
        app.report_load();
        app
    }

    /// Page models over the current snapshot.
    pub fn dashboard(&self) -> Dashboard<'_> {
        Dashboard::new(&self.snapshot, &self.config)
    }

    /// Rebuild the snapshot from disk. Readers of the old `Arc` keep it.
    pub fn reload(&mut self) {
        self.snapshot = self.cache.get(LoadMode::Reload);
        self.clamp_cursors();
        self.report_load();
    }

    /// Record degraded sources in the error history and the status bar.
    fn report_load(&mut self) {
        let issues: Vec<String> = self.snapshot.report().issues.iter().map(|e| e.to_string()).collect();
        if issues.is_empty() {
            self.set_status(format!(
                "Loaded {} observations, {} forecasts, {} impacts at {}",
                self.snapshot.observations().len(),
                self.snapshot.forecasts().len(),
                self.snapshot.impacts().len(),
                self.snapshot.loaded_at().format("%H:%M:%S"),
            ));
            self.check_forecast();
            return;
        }
        for issue in issues {
            self.push_error(ErrorCategory::Data, issue, "data load".into());
        }
        if self.snapshot.report().short_circuited {
            self.set_warning("Observation data missing: all pages empty (press r to reload)");
        }
    }

    /// Record a rejected forecast pivot for the selected series.
    pub fn check_forecast(&mut self) {
        let PageState::Ready(model) = self.dashboard().forecasts(self.forecasts.selected.as_deref()) else {
            return;
        };
        if let Some(err) = model.pivot_error {
            self.push_error(ErrorCategory::Query, err.to_string(), model.view.indicator);
        }
    }

    fn clamp_cursors(&mut self) {
        let available = self.dashboard().service().observed_indicators().len();
        self.trends.cursor = self.trends.cursor.min(available.saturating_sub(1));
        let rows = self.snapshot.impacts().len();
        self.impacts.scroll = self.impacts.scroll.min(rows.saturating_sub(1));
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use selam_core::data::DataSources;

    fn fixture_config() -> DashboardConfig {
        DashboardConfig {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../selam-core/tests/fixtures"),
            ..DashboardConfig::default()
        }
    }

    #[test]
    fn loads_fixture_snapshot() {
        let app = AppState::new(fixture_config(), PathBuf::from("."));
        assert!(app.snapshot.has_primary_data());
        assert!(app.error_history.is_empty());
        assert!(matches!(app.status_message, Some((_, StatusLevel::Info))));
    }

    #[test]
    fn status_shows_load_time() {
        let app = AppState::new(fixture_config(), PathBuf::from("."));
        let stamp = app.snapshot.loaded_at().format("%H:%M:%S").to_string();
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert!(msg.ends_with(&format!(" at {stamp}")), "{msg}");
    }

    #[test]
    fn missing_data_is_recorded() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let app = AppState::new(config, PathBuf::from("."));
        assert!(!app.snapshot.has_primary_data());
        assert_eq!(app.error_history.len(), 1);
        assert_eq!(app.error_history[0].category, ErrorCategory::Data);
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));
    }

    #[test]
    fn reload_swaps_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let mut app = AppState::new(config, PathBuf::from("."));
        let before = Arc::clone(&app.snapshot);

        let fixtures = DataSources::in_dir(fixture_config().data_dir);
        std::fs::copy(&fixtures.observations, DataSources::in_dir(dir.path()).observations).unwrap();
        app.reload();

        assert!(!Arc::ptr_eq(&before, &app.snapshot));
        assert!(before.observations().is_empty());
        assert!(app.snapshot.has_primary_data());
    }

    #[test]
    fn error_history_caps_at_50() {
        let mut app = AppState::new(fixture_config(), PathBuf::from("."));
        for i in 0..60 {
            app.push_error(ErrorCategory::Query, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), 50);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn trend_toggle_starts_from_defaults() {
        let mut state = TrendsPageState::default();
        let defaults = vec!["ACC_OWNERSHIP".to_string(), "USG_DIGITAL_PAYMENT".to_string()];
        state.toggle("ACC_OWNERSHIP", defaults.clone());
        assert_eq!(state.selection, Some(vec!["USG_DIGITAL_PAYMENT".to_string()]));
        state.toggle("ACC_MM_ACCOUNT", defaults);
        assert_eq!(
            state.selection,
            Some(vec!["USG_DIGITAL_PAYMENT".to_string(), "ACC_MM_ACCOUNT".to_string()])
        );
    }

    #[test]
    fn forecast_cycle_wraps() {
        let names = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let mut state = ForecastsPageState::default();
        state.cycle(&names, -1);
        assert_eq!(state.selected.as_deref(), Some("C"));
        state.cycle(&names, 1);
        assert_eq!(state.selected.as_deref(), Some("A"));
        state.cycle(&[], 1);
        assert_eq!(state.selected.as_deref(), Some("A"));
    }
}
