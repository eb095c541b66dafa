// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tokio::runtime::Runtime;
use tracing_subscriber::filter::EnvFilter;

mod app;
mod config;
mod data;
mod events;
mod source;
mod ui;
mod weather;

use app::{App, View};
use config::Settings;
use data::table::MAX_WINDOW_HOURS;
use source::{FileSource, FirebaseSource, SnapshotSource};
use weather::WeatherClient;

#[derive(Parser, Debug)]
#[command(name = "agriwatch")]
#[command(about = "Terminal dashboard for monitoring farm water and soil sensors")]
struct Args {
    /// Settings file (TOML); environment variables override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Read snapshots from a JSON file instead of the realtime store
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Refresh interval in seconds (overrides dashboard.refresh_secs)
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Initial time window in hours, 0-24 (overrides dashboard.window_hours)
    #[arg(long)]
    hours: Option<u32>,

    /// Export the current window to a CSV file and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Where to write logs while the TUI owns the terminal
    #[arg(long, default_value = "agriwatch.log")]
    log_file: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // The TUI owns stdout, so logs go to a file unless we are exporting
    if args.export.is_some() {
        init_tracing(None)?;
    } else {
        init_tracing(Some(&args.log_file))?;
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(refresh) = args.refresh {
        settings.dashboard.refresh_secs = refresh;
    }
    if let Some(hours) = args.hours {
        settings.dashboard.window_hours = hours.min(MAX_WINDOW_HOURS);
    }
    settings.log_summary();

    // Network requests run here while the render loop stays synchronous
    let runtime = Runtime::new().context("Failed to start async runtime")?;

    let source = build_source(&args, &settings, &runtime)?;
    let mut app = App::new(source, settings.thresholds).with_dashboard(&settings.dashboard);

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&mut app, &export_path);
    }

    if settings.weather.is_configured() {
        let client = WeatherClient::new(settings.weather.clone(), settings.weather.timeout());
        app = app.with_weather(client, runtime.handle().clone());
    } else {
        tracing::info!("Weather API key not set, weather page disabled");
    }

    let refresh = Duration::from_secs(settings.dashboard.refresh_secs.max(1));
    run_tui(app.with_theme(ui::Theme::auto_detect()), refresh)
}

/// Initialize the global tracing subscriber.
///
/// The level comes from `RUST_LOG` when set, otherwise from
/// `AGRIWATCH_LOG_LEVEL` (default `info`). With a `log_file` the output is
/// appended there without colors; otherwise it goes to stderr.
fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let env_filter = if env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        let level = match env::var("AGRIWATCH_LOG_LEVEL").ok().as_deref() {
            Some("trace") => "trace",
            Some("debug") => "debug",
            Some("warn") => "warn",
            Some("error") => "error",
            _ => "info",
        };
        EnvFilter::new(format!("{level},hyper=warn,reqwest=warn"))
    };

    let builder = tracing_subscriber::fmt()
        .with_target(true)
        .with_env_filter(env_filter)
        .compact();

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(io::stderr).init(),
    }
    Ok(())
}

/// Pick the snapshot source: a local file when given, else the realtime store.
fn build_source(
    args: &Args,
    settings: &Settings,
    runtime: &Runtime,
) -> Result<Box<dyn SnapshotSource>> {
    if let Some(ref path) = args.file {
        return Ok(Box::new(FileSource::new(path)));
    }

    let store = &settings.store;
    let credential = store.credential()?;
    Ok(Box::new(FirebaseSource::new(
        runtime.handle().clone(),
        &store.database_url,
        &store.collection,
        credential,
        store.timeout(),
    )))
}

/// Run the TUI until the user quits
fn run_tui(mut app: App, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Load initial data
    app.refresh_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();
    let mut last_weather = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(10),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Weather => ui::weather::render(frame, app, chunks[2]),
                View::Sensors => ui::sensors::render(frame, app, chunks[2]),
                View::Logs => ui::logs::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_thresholds {
                ui::thresholds::render_overlay(frame, app, area);
            }

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Keep the window anchored to the wall clock between refreshes
        app.tick();

        // Auto-refresh data periodically; the cache decides whether to hit the store
        if last_refresh.elapsed() >= refresh_interval {
            app.refresh_data();
            last_refresh = Instant::now();
        }

        // Weather is only re-fetched while its page is open
        if app.current_view == View::Weather && last_weather.elapsed() >= refresh_interval * 6 {
            app.refresh_weather();
            last_weather = Instant::now();
        }
    }

    Ok(())
}

/// Fetch once and write the selected window to CSV
fn export_to_file(app: &mut App, export_path: &Path) -> Result<()> {
    app.refresh_data();
    if let Some(ref err) = app.load_error {
        anyhow::bail!("Failed to read sensor data: {}", err);
    }

    let rows = app.export_csv(export_path)?;
    println!("Exported {} rows to: {}", rows, export_path.display());
    Ok(())
}
