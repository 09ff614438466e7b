//! libdesk - a terminal client for the campus library service.
//!
//! Signs in on the plain terminal, then switches to a tabbed ratatui view
//! whose tabs depend on the signed-in user's role.

mod app;
mod ui;

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use libdesk_core::api::HttpTransport;
use libdesk_core::dispatch::{CommandRunner, Dispatcher, UiContext};
use libdesk_core::session::login;
use libdesk_core::{Config, TabController};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

const ENV_SERVER_URL: &str = "LIBDESK_SERVER_URL";
const ENV_USERNAME: &str = "LIBDESK_USERNAME";
const ENV_PASSWORD: &str = "LIBDESK_PASSWORD";

/// Log to a daily file under the cache dir; the terminal belongs to the UI.
/// Use RUST_LOG to control the level (e.g. RUST_LOG=libdesk_core=debug).
fn init_tracing() -> Result<WorkerGuard> {
    let log_dir = Config::cache_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, "libdesk.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .with(filter)
        .init();

    Ok(guard)
}

fn prompt_username(default: Option<&str>) -> Result<String> {
    match default {
        Some(name) => print!("Username [{}]: ", name),
        None => print!("Username: "),
    }
    io::stdout().flush()?;

    let mut username = String::new();
    io::stdin().read_line(&mut username)?;
    let username = username.trim();
    Ok(match (username.is_empty(), default) {
        (true, Some(name)) => name.to_string(),
        _ => username.to_string(),
    })
}

/// Username and password from the environment, falling back to prompts.
fn credentials(config: &Config) -> Result<(String, String)> {
    let username = match std::env::var(ENV_USERNAME) {
        Ok(name) if !name.trim().is_empty() => name,
        _ => prompt_username(config.last_username.as_deref())?,
    };
    if username.is_empty() {
        anyhow::bail!("Username required");
    }

    let password = match std::env::var(ENV_PASSWORD) {
        Ok(password) if !password.is_empty() => password,
        _ => rpassword::prompt_password("Password: ")?,
    };
    Ok((username, password))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing()?;
    info!("libdesk starting");

    let mut config = Config::load().unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        Config::default()
    });

    let server_url = std::env::var(ENV_SERVER_URL)
        .ok()
        .or_else(|| config.server_url.clone())
        .with_context(|| {
            format!(
                "No server configured; set {} or server_url in the config file",
                ENV_SERVER_URL
            )
        })?;

    let transport = HttpTransport::new(server_url, config.request_timeout())?;
    let runner = CommandRunner::new(Arc::new(transport))
        .with_timeout(config.request_timeout())
        .with_max_concurrent(config.max_concurrent_requests);

    let (username, password) = credentials(&config)?;
    let session = login(&runner, &username, &password).await?;
    println!("Signed in as {}", session.user_name);

    config.last_username = Some(username);
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }

    let ui = UiContext::new();
    let dispatcher = Dispatcher::new(runner, ui.handle(), Handle::current());
    let tabs = TabController::new(&session, dispatcher);
    tabs.start();
    let mut app = App::new(tabs, ui, config.export_dir());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("libdesk shutting down");
    Ok(())
}

/// One iteration: handle at most one input event, draw, then run whatever the
/// UI context has queued. A refresh posted by a tab switch therefore runs
/// after the switched-to tab has been drawn.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    terminal.draw(|f| render(f, app))?;

    loop {
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    // Ctrl+C to quit
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL)
                    {
                        app.quit();
                        return Ok(());
                    }

                    if handle_input(app, key) {
                        return Ok(());
                    }
                }
            }
        }

        terminal.draw(|f| render(f, app))?;

        app.drain();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
