// Composition root: wires the feed adapter, the monitor service and the MVU TUI together

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use directories::ProjectDirs;
use gempa_core::app::Command;
use gempa_core::ports::{AppConfig, Clock, ConfigStore, FeedPort, SystemClock};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::adapters::{feed::HttpFeedAdapter, persistence::FileConfigStore};
use crate::cli::CliArgs;
use crate::services::monitor_service::{MonitorService, MonitorSettings};
use crate::tui::{TuiMessage, TuiModel, TuiUpdate, TuiView};

/// The main application struct that coordinates everything
pub struct GempaWatchApp {
    /// Background refresh cycle
    monitor: MonitorService,

    /// The TUI model (MVU pattern)
    tui_model: TuiModel,

    /// Terminal for rendering
    terminal: Terminal<CrosstermBackend<io::Stdout>>,

    /// Event receiver from the monitor service
    event_rx: mpsc::UnboundedReceiver<gempa_core::domain::Event>,

    /// Command sender to the monitor service
    command_tx: mpsc::UnboundedSender<Command>,
}

impl GempaWatchApp {
    /// Create a new application instance from parsed arguments
    /// This is where dependency injection happens
    pub fn new(cli_args: &CliArgs) -> Result<Self> {
        let config = load_config(cli_args)?;
        info!("Polling {} every {}s", config.feed.url, config.feed.poll_interval_secs);

        // Create adapters (dependency injection)
        let feed_adapter =
            HttpFeedAdapter::new(config.feed.url.clone(), config.feed.request_timeout())?;
        debug!("Feed adapter ready for {}", feed_adapter.feed_url());
        let feed_port: Arc<dyn FeedPort> = Arc::new(feed_adapter);
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let (monitor, event_rx, command_tx) =
            MonitorService::new(feed_port, clock, MonitorSettings::from_config(&config.feed));

        let tui_model = TuiModel::with_config(&config);

        // Initialize terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            monitor,
            tui_model,
            terminal,
            event_rx,
            command_tx,
        })
    }

    /// Run the application until the user quits
    pub async fn run(self) -> Result<()> {
        let GempaWatchApp {
            mut monitor,
            mut tui_model,
            mut terminal,
            event_rx,
            command_tx,
        } = self;

        // Start the monitor in the background; its first fetch runs immediately
        let monitor_handle = tokio::spawn(async move { monitor.start().await });

        let result = run_main_loop(&mut tui_model, &mut terminal, event_rx, &command_tx).await;

        // Clean shutdown
        shutdown(&mut terminal)?;

        if command_tx.send(Command::Quit).is_err() {
            debug!("Monitor already stopped");
        }
        match monitor_handle.await {
            Ok(Err(e)) => error!("Monitor stopped with error: {}", e),
            Err(e) => error!("Monitor task failed: {:?}", e),
            Ok(Ok(())) => {}
        }

        result
    }
}

/// Load the config file, then apply command-line overrides
pub fn load_config(cli_args: &CliArgs) -> Result<AppConfig> {
    let config_store = match &cli_args.config {
        Some(path) => FileConfigStore::with_path(path),
        None => FileConfigStore::new()?,
    };
    info!("Using config {}", config_store.path().display());

    let mut config = config_store.load()?;
    cli_args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

/// Main application loop - coordinates TUI and monitor service
async fn run_main_loop(
    tui_model: &mut TuiModel,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut event_rx: mpsc::UnboundedReceiver<gempa_core::domain::Event>,
    command_tx: &mpsc::UnboundedSender<Command>,
) -> Result<()> {
    let mut last_render = Instant::now();
    let render_interval = Duration::from_millis(33);
    let mut needs_redraw = true;

    loop {
        let now = Instant::now();

        // Handle events from the monitor service
        while let Ok(event) = event_rx.try_recv() {
            debug!("Received event from monitor: {:?}", event);
            tui_model.apply_event(&event, now);
            needs_redraw = true;
        }

        // Handle user input
        if event::poll(Duration::from_millis(10))? {
            match event::read()? {
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    let message =
                        TuiUpdate::handle_key(tui_model, key_event.code, key_event.modifiers)?;

                    if let TuiMessage::Command(cmd) = message {
                        debug!("Sending command to monitor: {:?}", cmd);
                        if matches!(cmd, Command::Quit) {
                            tui_model.should_quit = true;
                        } else if let Err(e) = command_tx.send(cmd) {
                            error!("Failed to send command: {}", e);
                        }
                    }

                    needs_redraw = true;
                }
                Event::Resize(width, height) => {
                    TuiUpdate::handle_resize(tui_model, width, height)?;
                    needs_redraw = true;
                }
                _ => {}
            }
        }

        if tui_model.should_quit {
            info!("Quit requested, exiting main loop");
            break;
        }

        let now = Instant::now();
        tui_model.tick(now);

        // Animations (flights, spinner) need continuous frames
        if needs_redraw || last_render.elapsed() >= render_interval {
            terminal.draw(|frame| TuiView::render(tui_model, frame, now))?;
            last_render = now;
            needs_redraw = false;
        }

        // Small sleep to prevent busy waiting
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    Ok(())
}

/// Restore the terminal
fn shutdown(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    info!("Shutting down gempa-watch");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

/// Default log location in the platform data directory
pub fn default_log_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "gempa-watch")
        .context("Failed to determine project directories")?;
    Ok(proj_dirs.data_dir().join("gempa-watch.log"))
}

/// Send tracing output to a file; the terminal belongs to the TUI.
/// `RUST_LOG` overrides the default `info` filter.
pub fn init_tracing(log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .init();

    Ok(())
}

/// Entry point used by the binary
pub async fn run() -> Result<()> {
    let cli_args = CliArgs::parse();

    let log_path = match &cli_args.log_file {
        Some(path) => path.clone(),
        None => default_log_path()?,
    };
    init_tracing(&log_path)?;

    info!("Starting gempa-watch {}", env!("CARGO_PKG_VERSION"));

    let app = GempaWatchApp::new(&cli_args)?;
    app.run().await?;

    info!("gempa-watch shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_applies_overrides() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("gempa-watch.toml");
        let path_arg = path.to_string_lossy().to_string();

        let args = CliArgs::parse_from([
            "gempa-watch",
            "--config",
            path_arg.as_str(),
            "--interval",
            "45",
        ]);
        let config = load_config(&args)?;

        assert_eq!(config.feed.poll_interval_secs, 45);
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_load_config_rejects_zero_interval() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("gempa-watch.toml");
        let path_arg = path.to_string_lossy().to_string();

        let args = CliArgs::parse_from([
            "gempa-watch",
            "--config",
            path_arg.as_str(),
            "--interval",
            "0",
        ]);
        let err = load_config(&args).unwrap_err();
        assert!(err.to_string().contains("poll_interval_secs"));
        Ok(())
    }

    #[test]
    fn test_default_log_path() -> Result<()> {
        let path = default_log_path()?;
        assert!(path.ends_with("gempa-watch.log"));
        Ok(())
    }
}
