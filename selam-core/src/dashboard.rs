//! Page models: the five fixed dashboard views assembled from query results.
//!
//! Models carry data only. The TUI and CLI decide how to draw them.

use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::data::Snapshot;
use crate::domain::codes;
use crate::query::{
    Fallback, ForecastPivot, ForecastView, ImpactMagnitude, ImpactRow, IndicatorService, QueryError,
    Resolution, TargetGap, TrendSeries,
};

/// Dashboard pages, in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Page {
    Overview,
    Trends,
    Forecasts,
    Impacts,
    Projections,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Overview,
        Page::Trends,
        Page::Forecasts,
        Page::Impacts,
        Page::Projections,
    ];

    pub fn index(self) -> usize {
        match self {
            Page::Overview => 0,
            Page::Trends => 1,
            Page::Forecasts => 2,
            Page::Impacts => 3,
            Page::Projections => 4,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            Page::Overview => "Overview",
            Page::Trends => "Trends Analysis",
            Page::Forecasts => "Forecasts (2025-2027)",
            Page::Impacts => "Event Impacts",
            Page::Projections => "Inclusion Projections",
        }
    }

    pub fn next(self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// What a page shows: its model, a no-data notice, or a structural error.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PageState<T> {
    Ready(T),
    NoData { message: String },
    Failed { error: QueryError },
}

impl<T> PageState<T> {
    fn no_data(message: &str) -> Self {
        PageState::NoData {
            message: message.to_string(),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            PageState::Ready(model) => Some(model),
            _ => None,
        }
    }
}

pub const OVERVIEW_NO_DATA: &str = "Data not loaded. Please ensure data processing steps are complete.";
pub const TRENDS_NO_DATA: &str = "No data available.";
pub const FORECASTS_NO_DATA: &str = "Forecast data not generated yet.";
pub const IMPACTS_NO_DATA: &str = "Impact modeling data not found.";
pub const PROJECTIONS_NO_DATA: &str = "No forecast data for the target year.";

pub const P2P_NOTE: &str = "Interoperable P2P digital transfers have surpassed ATM cash withdrawals, \
signaling a transition to digital-first habits.";

pub const KEY_OBSERVATIONS: [&str; 2] = [
    "2021-2024 slowdown: account ownership grew only +3pp despite massive mobile money expansion.",
    "Registered vs active gap: 65M+ accounts are registered, but Findex usage data shows lower active engagement.",
];

pub const SCENARIO_DEFINITIONS: [(&str, &str); 3] = [
    ("Base Case", "Trend continuation + confirmed policy impacts."),
    ("Optimistic", "Accelerated policy adoption (e.g. successful digital ID rollout)."),
    ("Pessimistic", "Implementation delays or macro headwinds."),
];

pub const IMPACTS_INTRO: &str =
    "How specific events (policies, launches) shift inclusion metrics, in percentage points.";

pub const RECOMMENDATIONS: [(&str, &str); 3] = [
    ("Digital ID Integration", "Accelerate biometric verification to lower onboarding friction."),
    ("Merchant Acceptance", "Expand P2P usage into P2B (person to business) for daily commerce."),
    ("Rural Agent Networks", "Incentivize expansion beyond Addis to reach the underserved."),
];

/// Shortest exact form: `49` → `"49%"`, `9.45` → `"9.45%"`, missing → `"N/A"`.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{v}%"),
        _ => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub title: String,
    pub indicator_code: String,
    pub value: Option<f64>,
    /// `None` when no value was found.
    pub resolution: Option<Resolution>,
    pub delta: String,
}

impl MetricCard {
    pub fn display_value(&self) -> String {
        format_percent(self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YearBar {
    pub year: i32,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewModel {
    pub snapshot_year: i32,
    pub cards: Vec<MetricCard>,
    /// P2P transaction counts by year, ascending.
    pub p2p: Vec<YearBar>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendsModel {
    pub available: Vec<String>,
    pub selected: Vec<String>,
    pub series: TrendSeries,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastsModel {
    pub indicators: Vec<String>,
    pub view: ForecastView,
    pub pivot: Option<ForecastPivot>,
    /// Set when the pivot could not be built.
    pub pivot_error: Option<QueryError>,
    /// Other series whose history resolves to the same code.
    pub shares_history_with: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactsModel {
    pub rows: Vec<ImpactRow>,
    pub magnitudes: Vec<ImpactMagnitude>,
    pub has_dates: bool,
}

/// Gauge geometry for the projection page. Axis runs 0 to `axis_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GaugeBands {
    pub axis_max: f64,
    pub value: f64,
    pub baseline_band: (f64, f64),
    pub optimistic_band: (f64, f64),
    pub threshold: f64,
}

impl GaugeBands {
    pub fn new(gap: &TargetGap, baseline: f64) -> Self {
        Self {
            axis_max: 100.0,
            value: gap.base_value,
            baseline_band: (0.0, baseline),
            optimistic_band: (baseline, gap.optimistic_value.max(baseline)),
            threshold: gap.target_value,
        }
    }

    /// `value / axis_max`, clamped to `0..=1`.
    pub fn ratio(&self) -> f64 {
        if self.value.is_finite() {
            (self.value / self.axis_max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectionsModel {
    pub gap: TargetGap,
    pub gauge: GaugeBands,
}

/// Builds page models from one snapshot and the dashboard config.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    service: IndicatorService<'a>,
    config: &'a DashboardConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(snapshot: &'a Snapshot, config: &'a DashboardConfig) -> Self {
        Self {
            service: IndicatorService::new(snapshot, &config.history_map),
            config,
        }
    }

    pub fn service(&self) -> IndicatorService<'a> {
        self.service
    }

    pub fn overview(&self) -> PageState<OverviewModel> {
        let observations = self.service.snapshot().observations();
        if observations.is_empty() {
            return PageState::no_data(OVERVIEW_NO_DATA);
        }
        let year = self.config.snapshot_year;
        let cards = vec![
            self.card("Account Ownership (Access)", codes::ACC_OWNERSHIP, Fallback::ExactYear, "3pp vs 2021"),
            self.card("Digital Payment Usage", codes::USG_DIGITAL_PAYMENT, Fallback::ExactYear, "High Growth"),
            self.card("Mobile Money Accounts", codes::ACC_MM_ACCOUNT, Fallback::LatestDate, "Doubled since '21"),
        ];

        let mut p2p: Vec<YearBar> = observations
            .for_code(codes::USG_P2P_COUNT)
            .filter_map(|o| match o.year {
                Some(year) if o.value_numeric.is_finite() => Some(YearBar {
                    year,
                    value: o.value_numeric,
                }),
                _ => None,
            })
            .collect();
        p2p.sort_by_key(|b| b.year);

        PageState::Ready(OverviewModel {
            snapshot_year: year,
            cards,
            p2p,
        })
    }

    fn card(&self, title: &str, code: &str, fallback: Fallback, delta: &str) -> MetricCard {
        let latest = self.service.latest_snapshot(code, self.config.snapshot_year, fallback);
        MetricCard {
            title: title.to_string(),
            indicator_code: code.to_string(),
            value: latest.as_ref().map(|l| l.value),
            resolution: latest.map(|l| l.resolution),
            delta: delta.to_string(),
        }
    }

    /// Configured default codes that are actually observed.
    pub fn default_trend_selection(&self) -> Vec<String> {
        let available = self.service.observed_indicators();
        self.config
            .default_trend_codes
            .iter()
            .filter(|c| available.contains(c))
            .cloned()
            .collect()
    }

    /// `selection: None` uses the default selection.
    pub fn trends(&self, selection: Option<&[String]>) -> PageState<TrendsModel> {
        if self.service.snapshot().observations().is_empty() {
            return PageState::no_data(TRENDS_NO_DATA);
        }
        let selected = match selection {
            Some(codes) => codes.to_vec(),
            None => self.default_trend_selection(),
        };
        PageState::Ready(TrendsModel {
            available: self.service.observed_indicators(),
            series: self.service.trend_series(selected.as_slice()),
            selected,
        })
    }

    /// `selected` falls back to the first series when absent or unknown.
    pub fn forecasts(&self, selected: Option<&str>) -> PageState<ForecastsModel> {
        let indicators = self.service.forecast_indicators();
        let name = match selected {
            Some(name) if indicators.iter().any(|i| i == name) => name.to_string(),
            _ => match indicators.first() {
                Some(first) => first.clone(),
                None => return PageState::no_data(FORECASTS_NO_DATA),
            },
        };

        let view = self.service.forecast_with_history(&name);
        let (pivot, pivot_error) = match view.pivot() {
            Ok(p) => (Some(p), None),
            Err(e) => {
                tracing::warn!(indicator = %name, error = %e, "forecast pivot rejected");
                (None, Some(e))
            }
        };
        let shares_history_with = self
            .service
            .history_map()
            .shared_contains_targets(&indicators)
            .remove(view.historical_code.as_str())
            .map(|names| names.into_iter().filter(|n| *n != name).map(String::from).collect())
            .unwrap_or_default();

        PageState::Ready(ForecastsModel {
            indicators,
            view,
            pivot,
            pivot_error,
            shares_history_with,
        })
    }

    pub fn impacts(&self) -> PageState<ImpactsModel> {
        let table = self.service.snapshot().impacts();
        if table.is_empty() {
            return PageState::no_data(IMPACTS_NO_DATA);
        }
        PageState::Ready(ImpactsModel {
            rows: self.service.impact_matrix(),
            magnitudes: self.service.impact_magnitudes(),
            has_dates: table.has_dates(),
        })
    }

    pub fn projections(&self) -> PageState<ProjectionsModel> {
        let target = &self.config.target;
        match self.service.target_gap(&target.indicator, target.year, target.value) {
            Ok(Some(gap)) => PageState::Ready(ProjectionsModel {
                gauge: GaugeBands::new(&gap, target.baseline),
                gap,
            }),
            Ok(None) => PageState::no_data(PROJECTIONS_NO_DATA),
            Err(error) => {
                tracing::warn!(%error, "target gap unavailable");
                PageState::Failed { error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        ForecastPoint, ForecastTable, ImpactRecord, ImpactTable, Observation, ObservationTable, RecordType,
        Scenario,
    };
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn obs(code: &str, d: Option<NaiveDate>, v: f64) -> Observation {
        Observation::new(code, d, v, RecordType::Observation)
    }

    fn fc(indicator: &str, year: i32, scenario: Scenario, value: f64) -> ForecastPoint {
        ForecastPoint {
            indicator: indicator.into(),
            year: Some(year),
            scenario,
            value,
        }
    }

    fn snapshot() -> Snapshot {
        let observations = ObservationTable::new(vec![
            obs("ACC_OWNERSHIP", date(2021, 12, 31), 46.0),
            obs("ACC_OWNERSHIP", date(2024, 11, 29), 49.0),
            obs("USG_DIGITAL_PAYMENT", date(2024, 11, 29), 35.0),
            obs("ACC_MM_ACCOUNT", date(2023, 6, 1), 9.45),
            obs("USG_P2P_COUNT", date(2025, 1, 1), 128.0),
            obs("USG_P2P_COUNT", date(2023, 1, 1), 49.7),
        ]);
        let forecasts = ForecastTable::new(vec![
            fc("Access Rate", 2025, Scenario::BaseCase, 50.0),
            fc("Access Rate", 2027, Scenario::BaseCase, 52.0),
            fc("Access Rate", 2027, Scenario::Optimistic, 58.0),
            fc("Usage Rate", 2027, Scenario::BaseCase, 40.0),
        ]);
        let impacts = ImpactTable::new(
            vec![ImpactRecord::new(
                "policy",
                date(2020, 4, 1),
                "Directive",
                "ACC_OWNERSHIP",
                0.035,
            )],
            true,
        );
        Snapshot::from_tables(observations, forecasts, impacts)
    }

    #[test]
    fn page_cycle_wraps() {
        assert_eq!(Page::Projections.next(), Page::Overview);
        assert_eq!(Page::Overview.prev(), Page::Projections);
        for page in Page::ALL {
            assert_eq!(Page::from_index(page.index()), Some(page));
        }
        assert_eq!(Page::from_index(5), None);
    }

    #[test]
    fn percent_formatting() {
        assert_eq!(format_percent(Some(49.0)), "49%");
        assert_eq!(format_percent(Some(9.45)), "9.45%");
        assert_eq!(format_percent(Some(49.26)), "49.26%");
        assert_eq!(format_percent(Some(f64::NAN)), "N/A");
        assert_eq!(format_percent(None), "N/A");
    }

    #[test]
    fn overview_cards_and_p2p() {
        let snap = snapshot();
        let config = DashboardConfig::default();
        let model = Dashboard::new(&snap, &config).overview();
        let model = model.ready().unwrap();

        assert_eq!(model.cards[0].display_value(), "49%");
        assert_eq!(model.cards[0].resolution, Some(Resolution::ExactYear));
        assert_eq!(model.cards[1].display_value(), "35%");
        assert_eq!(model.cards[2].value, Some(9.45));
        assert_eq!(model.cards[2].resolution, Some(Resolution::LatestDate));
        assert_eq!(model.p2p.iter().map(|b| b.year).collect::<Vec<_>>(), vec![2023, 2025]);
    }

    #[test]
    fn exact_year_card_without_row_is_na() {
        let snap = snapshot();
        let config = DashboardConfig {
            snapshot_year: 2022,
            ..DashboardConfig::default()
        };
        let model = Dashboard::new(&snap, &config).overview();
        let cards = &model.ready().unwrap().cards;
        assert_eq!(cards[0].display_value(), "N/A");
        assert_eq!(cards[0].resolution, None);
        // Mobile money still falls back to its latest row.
        assert_eq!(cards[2].value, Some(9.45));
    }

    #[test]
    fn empty_snapshot_is_no_data_everywhere() {
        let snap = Snapshot::default();
        let config = DashboardConfig::default();
        let dash = Dashboard::new(&snap, &config);
        assert!(matches!(dash.overview(), PageState::NoData { .. }));
        assert!(matches!(dash.trends(None), PageState::NoData { .. }));
        assert!(matches!(dash.forecasts(None), PageState::NoData { .. }));
        assert!(matches!(dash.impacts(), PageState::NoData { .. }));
        assert!(matches!(dash.projections(), PageState::NoData { .. }));
    }

    #[test]
    fn trends_default_selection_is_filtered() {
        let snap = snapshot();
        let config = DashboardConfig {
            default_trend_codes: vec!["ACC_OWNERSHIP".into(), "NOT_THERE".into()],
            ..DashboardConfig::default()
        };
        let dash = Dashboard::new(&snap, &config);
        let model = dash.trends(None);
        let model = model.ready().unwrap();
        assert_eq!(model.selected, vec!["ACC_OWNERSHIP".to_string()]);
        assert_eq!(model.series.len(), 2);

        let empty: Vec<String> = Vec::new();
        let none = dash.trends(Some(empty.as_slice()));
        assert!(none.ready().unwrap().series.is_empty());
    }

    #[test]
    fn forecasts_fall_back_to_first_series() {
        let snap = snapshot();
        let config = DashboardConfig::default();
        let model = Dashboard::new(&snap, &config).forecasts(Some("Unknown"));
        let model = model.ready().unwrap();
        assert_eq!(model.view.indicator, "Access Rate");
        assert_eq!(model.view.historical_code, "ACC_OWNERSHIP");
        assert!(model.pivot.is_some());
        assert!(model.pivot_error.is_none());
        assert!(model.shares_history_with.is_empty());
    }

    #[test]
    fn impacts_page_scales_percent() {
        let snap = snapshot();
        let config = DashboardConfig::default();
        let model = Dashboard::new(&snap, &config).impacts();
        let model = model.ready().unwrap();
        assert!((model.rows[0].impact_percent - 3.5).abs() < 1e-9);
        assert!(model.has_dates);
    }

    #[test]
    fn projections_gap_and_bands() {
        let snap = snapshot();
        let config = DashboardConfig::default();
        let model = Dashboard::new(&snap, &config).projections();
        let model = model.ready().unwrap();
        assert_eq!(model.gap.base_value, 52.0);
        assert_eq!(model.gap.gap_points, 8.0);
        assert_eq!(model.gauge.baseline_band, (0.0, 49.0));
        assert_eq!(model.gauge.optimistic_band, (49.0, 58.0));
        assert_eq!(model.gauge.threshold, 60.0);
        assert!((model.gauge.ratio() - 0.52).abs() < 1e-9);
    }

    #[test]
    fn projections_surface_missing_optimistic() {
        let snap = snapshot();
        let config = DashboardConfig {
            target: crate::config::TargetConfig {
                year: 2025,
                ..Default::default()
            },
            ..DashboardConfig::default()
        };
        let state = Dashboard::new(&snap, &config).projections();
        assert!(matches!(
            state,
            PageState::Failed {
                error: QueryError::AmbiguousOrMissingForecast {
                    scenario: Scenario::Optimistic,
                    matches: 0,
                    ..
                }
            }
        ));
    }
}
