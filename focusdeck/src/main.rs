//! Focusdeck — terminal-native focus timer with a persisted task list.
//!
//! Launches the TUI, restores the persisted task list and theme, and
//! optionally wires up the motivational quote service. Configuration via
//! CLI flags, environment variables, or config file
//! (`~/.config/focusdeck/config.toml`).
//!
//! ```bash
//! # Plain session, 25 minutes
//! cargo run --bin focusdeck
//!
//! # Custom session length and a quote service
//! cargo run --bin focusdeck -- --minutes 50 \
//!     --quote-url http://127.0.0.1:4500/api/quote
//!
//! # Or via environment variables
//! FOCUSDECK_MINUTES=50 FOCUSDECK_QUOTE_URL=http://127.0.0.1:4500/api/quote cargo run
//! ```

use std::io::{self, Write};
use std::path::Path;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use focusdeck::app::{App, AppCommand};
use focusdeck::config::{AppConfig, CliArgs};
use focusdeck::quote::{self, QuoteCommand, QuoteConfig, QuoteEvent};
use focusdeck::storage::FileStore;
use focusdeck::tasks::TaskStore;
use focusdeck::timer::now_ms;
use focusdeck::ui;

/// Cadence of the periodic tick source. The interval is advisory only —
/// the engine recomputes from absolute time, so late ticks are harmless.
const TICK_INTERVAL_MS: u64 = 1000;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > config file > defaults).
    let config = match AppConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            AppConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!("focusdeck starting");

    // Open the storage backend: one handle for the task payload, one for
    // the theme preference (independent keys in the same directory).
    let open = |label: &str| match config.data_dir.as_ref() {
        Some(dir) => FileStore::open(dir.clone()),
        None => FileStore::open_default(),
    }
    .map_err(|e| {
        eprintln!("Error: cannot open {label} storage: {e}");
        io::Error::other(e.to_string())
    });
    let task_store = open("task")?;
    let theme_store = open("theme")?;

    let mut app = App::new(TaskStore::load(task_store), theme_store, &config);

    // Wire up the quote service if an endpoint is configured.
    let (quote_tx, quote_rx) = match config.quote_endpoint.clone() {
        Some(endpoint) => {
            let quote_config = QuoteConfig {
                endpoint,
                request_timeout: config.quote_timeout,
                channel_capacity: config.quote_channel_capacity,
            };
            match quote::spawn_quote(quote_config) {
                Ok((tx, rx)) => (Some(tx), Some(rx)),
                Err(e) => {
                    tracing::warn!(error = %e, "quote service unavailable");
                    app.status_message = Some("Quote service unavailable".to_string());
                    (None, None)
                }
            }
        }
        None => (None, None),
    };

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app.
    let result = run_app(&mut terminal, app, &config, quote_tx, quote_rx).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("focusdeck exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the
/// terminal). Returns a [`WorkerGuard`] that must be held until shutdown to
/// ensure all buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("focusdeck.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
///
/// Each iteration draws a frame, drains quote events, advances the engine
/// clock, and polls for one input event. The engine is ticked at roughly
/// one-second cadence; when the observed gap between iterations exceeds the
/// resync threshold (terminal suspended, machine asleep), the engine is
/// resynced instead — same recomputation, logged as the recovery it is.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<FileStore>,
    config: &AppConfig,
    quote_tx: Option<mpsc::Sender<QuoteCommand>>,
    mut quote_rx: Option<mpsc::Receiver<QuoteEvent>>,
) -> io::Result<()> {
    let resync_threshold_ms = u64::try_from(config.resync_threshold.as_millis()).unwrap_or(u64::MAX);
    let mut last_tick_ms = now_ms();
    let mut last_seen_ms = last_tick_ms;

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Fire the pending audio/visual cue (terminal bell).
        if app.bell_pending {
            app.bell_pending = false;
            let mut out = io::stdout();
            out.write_all(b"\x07")?;
            out.flush()?;
        }

        // Step 3: Drain all pending quote events (non-blocking).
        if let Some(ref mut rx) = quote_rx {
            while let Ok(event) = rx.try_recv() {
                app.apply_quote_event(event);
            }
        }

        // Step 4: Advance the engine clock.
        let now = now_ms();
        let completion = if now.saturating_sub(last_seen_ms) >= resync_threshold_ms {
            last_tick_ms = now;
            app.engine.resync(now)
        } else if now.saturating_sub(last_tick_ms) >= TICK_INTERVAL_MS {
            last_tick_ms = now;
            app.engine.tick(now)
        } else {
            None
        };
        last_seen_ms = now;
        if let Some(completion) = completion {
            app.apply_completion(&completion);
        }

        // Step 5: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            // handle_key_event returns Some(AppCommand) when a user action
            // needs work the main loop owns (quote dispatch).
            if let Some(AppCommand::RefreshQuote) = app.handle_key_event(key, now_ms()) {
                match quote_tx {
                    Some(ref tx) => match tx.try_send(QuoteCommand::Refresh) {
                        Ok(()) => {}
                        Err(mpsc::error::TrySendError::Full(_)) => {
                            app.status_message = Some("Quote request already queued".to_string());
                            app.quote_loading = false;
                        }
                        Err(mpsc::error::TrySendError::Closed(_)) => {
                            app.status_message = Some("Quote service stopped".to_string());
                            app.quote_loading = false;
                        }
                    },
                    None => {
                        app.status_message = Some("Quote service not configured".to_string());
                        app.quote_loading = false;
                    }
                }
            }
        }

        if app.should_quit {
            // Send shutdown command to the quote task.
            if let Some(ref tx) = quote_tx {
                let _ = tx.try_send(QuoteCommand::Shutdown);
            }
            return Ok(());
        }
    }
}
