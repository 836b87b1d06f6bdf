//! Selam TUI binary: terminal setup, event loop, state persistence.

use std::fs::File;
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use selam_core::DashboardConfig;
use selam_tui::{input, persistence, ui, AppState};

fn main() -> Result<()> {
    // Install a panic hook that restores the terminal before printing the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    // Paths
    let app_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("selam");
    let state_path = app_dir.join("state.json");
    let config_path = std::env::var_os("SELAM_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("selam.toml"));

    init_logging(&app_dir)?;

    let config = DashboardConfig::load_or_default(&config_path)
        .with_context(|| format!("failed to load config {}", config_path.display()))?;

    let persisted = persistence::load(&state_path);
    let mut app = AppState::new(config, state_path.clone());
    persistence::apply(&mut app, persisted);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    // Save state before exit
    let persisted = persistence::extract(&app);
    if let Err(e) = persistence::save(&state_path, &persisted) {
        tracing::warn!(error = %e, path = %state_path.display(), "failed to save UI state");
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Log to `<config dir>/selam/selam-tui.log`; stdout belongs to the alternate screen.
fn init_logging(app_dir: &std::path::Path) -> Result<()> {
    std::fs::create_dir_all(app_dir).with_context(|| format!("failed to create {}", app_dir.display()))?;
    let log_path = app_dir.join("selam-tui.log");
    let file = File::create(&log_path).with_context(|| format!("failed to open log {}", log_path.display()))?;

    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .init();
    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    loop {
        // 1. Render
        terminal.draw(|f| ui::draw(f, app))?;

        // 2. Poll for input events (50ms timeout for ~20 FPS tick)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }

        // 3. Check quit
        if !app.running {
            break;
        }
    }
    Ok(())
}
