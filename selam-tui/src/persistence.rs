//! App state persistence: JSON save/load across restarts.

use std::path::Path;

use serde::{Deserialize, Serialize};

use selam_core::dashboard::Page;

use crate::app::AppState;

/// Serializable subset of app state that persists across restarts.
#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub active_page: Page,
    /// `None` means the configured default trend codes.
    pub trend_selection: Option<Vec<String>>,
    pub forecast_indicator: Option<String>,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            active_page: Page::Overview,
            trend_selection: None,
            forecast_indicator: None,
        }
    }
}

/// Load persisted state from disk. Returns defaults if file is missing or corrupt.
pub fn load(path: &Path) -> PersistedState {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => PersistedState::default(),
    }
}

/// Save persisted state to disk. Creates parent directories if needed.
pub fn save(path: &Path, state: &PersistedState) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(state)?;
    std::fs::write(path, json)?;
    Ok(())
}

pub fn extract(app: &AppState) -> PersistedState {
    PersistedState {
        active_page: app.active_page,
        trend_selection: app.trends.selection.clone(),
        forecast_indicator: app.forecasts.selected.clone(),
    }
}

/// Apply persisted state. Codes or series absent from the current
/// snapshot are dropped; the page then falls back to its defaults.
///
/// A table that loaded empty says nothing about which codes exist, so its
/// saved selection is kept as-is for the next reload.
pub fn apply(app: &mut AppState, state: PersistedState) {
    app.active_page = state.active_page;

    let service = app.dashboard().service();
    let observed = service.observed_indicators();
    let series = service.forecast_indicators();

    app.trends.selection = match state.trend_selection {
        Some(codes) if !observed.is_empty() => {
            let kept: Vec<String> = codes.into_iter().filter(|c| observed.contains(c)).collect();
            (!kept.is_empty()).then_some(kept)
        }
        saved => saved,
    };
    app.forecasts.selected = match state.forecast_indicator {
        Some(name) if !series.is_empty() => series.contains(&name).then_some(name),
        saved => saved,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use selam_core::DashboardConfig;
    use std::path::PathBuf;

    fn fixture_app() -> AppState {
        let config = DashboardConfig {
            data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../selam-core/tests/fixtures"),
            ..DashboardConfig::default()
        };
        AppState::new(config, PathBuf::from("state.json"))
    }

    #[test]
    fn roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let state = PersistedState {
            active_page: Page::Impacts,
            trend_selection: Some(vec!["ACC_MM_ACCOUNT".into()]),
            forecast_indicator: Some("Usage (Digital Payments)".into()),
        };
        save(&path, &state).unwrap();
        let loaded = load(&path);

        assert_eq!(loaded.active_page, Page::Impacts);
        assert_eq!(loaded.trend_selection, Some(vec!["ACC_MM_ACCOUNT".to_string()]));
        assert_eq!(loaded.forecast_indicator.as_deref(), Some("Usage (Digital Payments)"));
    }

    #[test]
    fn missing_file_returns_defaults() {
        let loaded = load(Path::new("/nonexistent/path/state.json"));
        assert_eq!(loaded.active_page, Page::Overview);
        assert!(loaded.trend_selection.is_none());
    }

    #[test]
    fn corrupt_file_returns_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, "not valid json {{{").unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.active_page, Page::Overview);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{ "active_page": "Forecasts" }"#).unwrap();

        let loaded = load(&path);
        assert_eq!(loaded.active_page, Page::Forecasts);
        assert!(loaded.forecast_indicator.is_none());
    }

    #[test]
    fn apply_drops_unknown_codes() {
        let mut app = fixture_app();
        apply(
            &mut app,
            PersistedState {
                active_page: Page::Trends,
                trend_selection: Some(vec!["ACC_OWNERSHIP".into(), "GONE".into()]),
                forecast_indicator: Some("Retired Series".into()),
            },
        );
        assert_eq!(app.active_page, Page::Trends);
        assert_eq!(app.trends.selection, Some(vec!["ACC_OWNERSHIP".to_string()]));
        assert!(app.forecasts.selected.is_none());

        let extracted = extract(&app);
        assert_eq!(extracted.active_page, Page::Trends);
    }

    #[test]
    fn apply_clears_selection_when_no_code_survives() {
        let mut app = fixture_app();
        apply(
            &mut app,
            PersistedState {
                trend_selection: Some(vec!["GONE".into()]),
                ..PersistedState::default()
            },
        );
        assert!(app.trends.selection.is_none());
    }

    #[test]
    fn saved_selection_survives_start_without_data() {
        let dir = tempfile::tempdir().unwrap();
        let config = DashboardConfig {
            data_dir: dir.path().to_path_buf(),
            ..DashboardConfig::default()
        };
        let mut app = AppState::new(config, PathBuf::from("state.json"));
        assert!(!app.snapshot.has_primary_data());

        apply(
            &mut app,
            PersistedState {
                active_page: Page::Trends,
                trend_selection: Some(vec!["ACC_MM_ACCOUNT".into()]),
                forecast_indicator: Some("Usage (Digital Payments)".into()),
            },
        );
        assert_eq!(app.trends.selection, Some(vec!["ACC_MM_ACCOUNT".to_string()]));

        let fixtures = fixture_app().cache.sources().clone();
        let target = app.cache.sources().clone();
        std::fs::copy(&fixtures.observations, &target.observations).unwrap();
        std::fs::copy(&fixtures.forecasts, &target.forecasts).unwrap();
        std::fs::copy(&fixtures.impacts, &target.impacts).unwrap();
        app.reload();

        let page = app.dashboard().trends(app.trends.selection.as_deref());
        let model = page.ready().unwrap();
        assert_eq!(model.selected, vec!["ACC_MM_ACCOUNT".to_string()]);
        assert!(!model.series.is_empty());

        let forecasts = app.dashboard().forecasts(app.forecasts.selected.as_deref());
        assert_eq!(forecasts.ready().unwrap().view.indicator, "Usage (Digital Payments)");

        let saved = extract(&app);
        assert_eq!(saved.trend_selection, Some(vec!["ACC_MM_ACCOUNT".to_string()]));
        assert_eq!(saved.forecast_indicator.as_deref(), Some("Usage (Digital Payments)"));
    }
}
