//! Papo TUI Entry Point
//!
//! Usage:
//!   papo-tui [OPTIONS]
//!
//! Options:
//!   --relay-url <URL>          Relay endpoint (env: CHAT_RELAY_URL)
//!   --username <NAME>          Initial display name (env: CHAT_USERNAME)
//!   --connect-timeout-ms <MS>  Connection timeout
//!   --plain                    Line mode instead of full screen
//!   --log-file <PATH>          Log file for full-screen mode (env: CHAT_LOG_FILE)

use std::fs::File;
use std::io::{self, IsTerminal};
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use papo_core::ClientConfig;
use papo_tui::{plain, App};

/// Papo - terminal client for the relay chat
#[derive(Parser, Debug)]
#[command(name = "papo-tui")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay WebSocket endpoint
    #[arg(short = 'r', long, env = "CHAT_RELAY_URL", value_name = "URL")]
    relay_url: Option<String>,

    /// Display name announced when the connection opens
    #[arg(short = 'u', long, env = "CHAT_USERNAME", value_name = "NAME")]
    username: Option<String>,

    /// Connection timeout in milliseconds
    #[arg(long, value_name = "MS")]
    connect_timeout_ms: Option<u64>,

    /// Line mode: read stdin, print lines to stdout
    #[arg(long)]
    plain: bool,

    /// Log file (full-screen mode logs here instead of the terminal)
    #[arg(long, env = "CHAT_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, env = "CHAT_LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl Args {
    /// Environment configuration with command-line overrides
    fn client_config(&self) -> Result<ClientConfig> {
        let config = ClientConfig::from_env().with_overrides(
            self.relay_url.clone(),
            self.username.clone(),
            self.connect_timeout_ms,
        );

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

fn default_log_path() -> PathBuf {
    std::env::temp_dir().join("papo-tui.log")
}

/// Initialize logging; full-screen mode must not write to the terminal
fn init_logging(args: &Args, to_file: bool) -> Result<()> {
    let level = &args.log_level;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("papo_tui={level},papo_core={level}"))
    });

    if to_file {
        let path = args.log_file.clone().unwrap_or_else(default_log_path);
        let file = File::create(&path)
            .with_context(|| format!("Failed to create log file: {path:?}"))?;

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let interactive = io::stdin().is_terminal() && io::stdout().is_terminal();
    let plain_mode = args.plain || !interactive;

    init_logging(&args, !plain_mode)?;
    let config = args.client_config()?;

    tracing::info!(
        relay_url = %config.relay_url,
        username = %config.username,
        plain = plain_mode,
        "Starting papo"
    );

    if plain_mode {
        return plain::run(&config).await;
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &config).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Ok(username) = &result {
        println!("\nAté logo, {username}!\n");
    }

    // Propagate any errors
    result.map(|_| ())
}

/// Run the full-screen app; returns the final display name
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &ClientConfig,
) -> Result<String> {
    let mut app = App::new(config).await?;
    app.run(terminal).await?;

    Ok(app.display().username.clone())
}
