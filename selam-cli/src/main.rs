//! Selam CLI: print dashboard pages and indicator queries, export CSV.
//!
//! Commands:
//! - `overview`: metric cards for the snapshot year and P2P growth
//! - `sources`: per-source load status
//! - `indicators`: observed indicator codes and forecast series names
//! - `trends`: trend series for selected codes
//! - `forecast`: forecast series with its historical context and pivot
//! - `impacts`: event impact matrix and magnitudes
//! - `target`: gap between the projection and the national target
//! - `export`: write trends, forecast and impact tables as CSV

mod export;
mod render;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use selam_core::dashboard::{Dashboard, PageState};
use selam_core::{DashboardConfig, Snapshot};

#[derive(Parser)]
#[command(
    name = "selam",
    version,
    about = "Selam CLI: Ethiopia financial inclusion indicators"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct GlobalArgs {
    /// Path to the TOML configuration file. Missing file means defaults.
    #[arg(long, global = true, default_value = "selam.toml")]
    config: PathBuf,

    /// Directory holding the processed CSV files. Overrides the config.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Print JSON instead of text tables.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Key metric cards for the snapshot year.
    Overview,
    /// Load status of each source file.
    Sources,
    /// Observed indicator codes and forecast series names.
    Indicators,
    /// Historical trend points, oldest first.
    Trends {
        /// Indicator codes. Defaults to the configured selection.
        codes: Vec<String>,
    },
    /// Forecast scenarios with historical context.
    Forecast {
        /// Forecast series name. Defaults to the first series.
        name: Option<String>,
    },
    /// Event impact matrix, newest first.
    Impacts,
    /// Gap between the Base Case projection and the target.
    Target {
        /// Substring selecting the forecast series.
        #[arg(long)]
        indicator: Option<String>,

        /// Target year.
        #[arg(long)]
        year: Option<i32>,

        /// Target value in percent.
        #[arg(long)]
        value: Option<f64>,
    },
    /// Write trends.csv, forecast_<series>.csv and impacts.csv.
    Export {
        /// Output directory.
        #[arg(long, default_value = "exports")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let cli = Cli::parse();
    let mut config = DashboardConfig::load_or_default(&cli.global.config)
        .with_context(|| format!("failed to load config {}", cli.global.config.display()))?;
    if let Some(dir) = cli.global.data_dir.clone() {
        config.data_dir = dir;
    }

    let snapshot = Snapshot::load(&config.sources());
    let json = cli.global.json;

    match cli.command {
        Commands::Overview => run_overview(&snapshot, &config, json),
        Commands::Sources => emit(json, snapshot.report().summary().as_slice(), render::sources),
        Commands::Indicators => run_indicators(&snapshot, &config, json),
        Commands::Trends { codes } => run_trends(&snapshot, &config, codes, json),
        Commands::Forecast { name } => run_forecast(&snapshot, &config, name, json),
        Commands::Impacts => run_impacts(&snapshot, &config, json),
        Commands::Target {
            indicator,
            year,
            value,
        } => {
            if let Some(indicator) = indicator {
                config.target.indicator = indicator;
            }
            if let Some(year) = year {
                config.target.year = year;
            }
            if let Some(value) = value {
                config.target.value = value;
            }
            run_target(&snapshot, &config, json)
        }
        Commands::Export { out_dir } => {
            let written = export::write_all(&Dashboard::new(&snapshot, &config), &out_dir)?;
            for path in written {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
    }
}

/// Print `value` as pretty JSON or through its text renderer.
fn emit<T: Serialize + ?Sized>(json: bool, value: &T, text: impl FnOnce(&T) -> String) -> Result<()> {
    if json {
        let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
        println!("{out}");
    } else {
        print!("{}", text(value));
    }
    Ok(())
}

/// Print a page; a structural query error becomes a non-zero exit.
fn emit_page<T: Serialize>(json: bool, page: &PageState<T>, text: impl FnOnce(&T) -> String) -> Result<()> {
    match page {
        PageState::Ready(model) => emit(json, model, text),
        PageState::NoData { message } => {
            if json {
                emit(true, page, |_| String::new())
            } else {
                println!("{message}");
                Ok(())
            }
        }
        PageState::Failed { error } => bail!("{error}"),
    }
}

fn run_overview(snapshot: &Snapshot, config: &DashboardConfig, json: bool) -> Result<()> {
    emit_page(json, &Dashboard::new(snapshot, config).overview(), render::overview)
}

#[derive(Serialize)]
struct IndicatorList {
    observed: Vec<String>,
    forecasts: Vec<String>,
}

fn run_indicators(snapshot: &Snapshot, config: &DashboardConfig, json: bool) -> Result<()> {
    let service = Dashboard::new(snapshot, config).service();
    let list = IndicatorList {
        observed: service.observed_indicators(),
        forecasts: service.forecast_indicators(),
    };
    emit(json, &list, |l| render::indicators(&l.observed, &l.forecasts))
}

fn run_trends(snapshot: &Snapshot, config: &DashboardConfig, codes: Vec<String>, json: bool) -> Result<()> {
    let dashboard = Dashboard::new(snapshot, config);
    let selection = (!codes.is_empty()).then_some(codes);
    emit_page(json, &dashboard.trends(selection.as_deref()), render::trends)
}

fn run_forecast(snapshot: &Snapshot, config: &DashboardConfig, name: Option<String>, json: bool) -> Result<()> {
    let page = Dashboard::new(snapshot, config).forecasts(name.as_deref());
    if let PageState::Ready(model) = &page {
        if let Some(requested) = &name {
            if &model.view.indicator != requested {
                bail!(
                    "unknown forecast series '{requested}'. Valid: {}",
                    model.indicators.join(", ")
                );
            }
        }
    }
    emit_page(json, &page, render::forecast)?;
    if let Some(model) = page.ready() {
        if let Some(err) = &model.pivot_error {
            bail!("{err}");
        }
    }
    Ok(())
}

fn run_impacts(snapshot: &Snapshot, config: &DashboardConfig, json: bool) -> Result<()> {
    emit_page(json, &Dashboard::new(snapshot, config).impacts(), render::impacts)
}

fn run_target(snapshot: &Snapshot, config: &DashboardConfig, json: bool) -> Result<()> {
    emit_page(json, &Dashboard::new(snapshot, config).projections(), render::projections)
}
