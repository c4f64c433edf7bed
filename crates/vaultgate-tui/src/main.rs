//! vaultgate - a password gate for a private notes file, in the terminal.
//!
//! The vault content stays hidden behind a login dialog until the correct
//! password is entered. A successful login is remembered for 30 minutes
//! across runs.

mod app;
mod config;
mod ui;

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vaultgate_core::{
    compute_hash, Clock, FileStorage, GateStatus, Readiness, SessionStorage, VaultGate,
};

use app::{App, AppState};
use config::Config;
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Log file name prefix inside the log directory
const LOG_FILE: &str = "vaultgate.log";

/// Fragments the terminal page waits for before the gate renders
const TERMINAL_FRAGMENT: &str = "terminal";
const CONTENT_FRAGMENT: &str = "vault-content";

const USAGE: &str = "\
Usage: vaultgate [COMMAND]

Commands:
  (none)            Open the vault
  hash [PASSWORD]   Print the SHA-256 digest to use as the vault credential
  status            Show whether a vault session is active
  logout            End the current vault session
  help              Show this message";

/// Initialize the tracing subscriber. The TUI owns the terminal, so it logs
/// to a daily file; CLI commands log to stderr.
fn init_tracing(log_dir: Option<PathBuf>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

fn load_config() -> Config {
    match Config::load() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "Failed to load config, using defaults");
            Config::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str);

    if command.is_some() {
        let _ = init_tracing(None);
    }

    match command {
        None => {}
        Some("hash") => return hash_command(args.get(2).cloned()),
        Some("status") => return status_command(&load_config()),
        Some("logout") => return logout_command(&load_config()),
        Some("help" | "-h" | "--help") => {
            println!("{USAGE}");
            return Ok(());
        }
        Some(other) => {
            eprintln!("Unknown command: {other}\n\n{USAGE}");
            std::process::exit(2);
        }
    }

    let _guard = init_tracing(Config::log_dir().ok());
    info!("vaultgate starting");

    let config = load_config();
    let storage = FileStorage::new(config.session_dir()?);
    let gate = VaultGate::new(storage);

    let mut readiness = Readiness::new();
    let mut waiter = readiness.subscribe();
    readiness.register(TERMINAL_FRAGMENT);
    readiness.register(CONTENT_FRAGMENT);

    let content = App::load_content(config.content_path().as_deref())?;
    let mut app = App::new(Some(content));
    readiness.complete(CONTENT_FRAGMENT);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    readiness.complete(TERMINAL_FRAGMENT);

    gate.init(&mut app, &mut waiter).await;
    app.session_status = gate.status();

    // Main loop
    let result = run_app(&mut terminal, &mut app, &gate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("vaultgate shutting down");
    Ok(())
}

/// Print the digest for a password, prompting when none was given
fn hash_command(password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };
    println!("{}", compute_hash(&password));
    Ok(())
}

fn status_command(config: &Config) -> Result<()> {
    let gate = VaultGate::new(FileStorage::new(config.session_dir()?));
    match gate.status() {
        GateStatus::Authenticated { issued_at, expires_in } => println!(
            "Vault unlocked at {}, expires in {} min",
            issued_at.with_timezone(&chrono::Local).format("%H:%M"),
            expires_in.num_minutes().max(0)
        ),
        GateStatus::Unauthenticated => println!("Vault locked"),
    }
    Ok(())
}

fn logout_command(config: &Config) -> Result<()> {
    let gate = VaultGate::new(FileStorage::new(config.session_dir()?));
    gate.clear();
    println!("Vault locked");
    Ok(())
}

fn run_app<S: SessionStorage, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    gate: &VaultGate<S, C>,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }

                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, gate, key) {
                    return Ok(());
                }
            }
        }

        // The gate re-evaluates the session on every reload, which is also
        // where an expired session is noticed
        if app.take_reload() {
            gate.render(app);
            app.session_status = gate.status();
        }

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
