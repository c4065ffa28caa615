use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod app;
mod avatar;
mod chat;
mod composer;
mod config;
mod handler;
mod history;
mod message_list;
mod presence;
mod scroll;
mod tui;
mod ui;

use app::App;
use config::{Config, DEFAULT_LOG_LEVEL};

#[derive(Parser, Debug)]
#[command(name = "chatter-cave")]
#[command(about = "A chat room in your terminal", version)]
struct Cli {
    /// Config file to read instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Name shown on your own messages
    #[arg(short, long)]
    name: Option<String>,
    /// Directory avatar images are looked up in
    #[arg(long)]
    assets_dir: Option<PathBuf>,
    /// Log filter, e.g. "debug" or "chatter_cave=trace"
    #[arg(long)]
    log_level: Option<String>,
    /// Where to write the log
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(name) = &self.name {
            config.display_name = Some(name.clone());
        }
        if let Some(dir) = &self.assets_dir {
            config.assets_dir = Some(dir.clone());
        }
        if let Some(path) = &self.log_file {
            config.log_file = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A broken file at the default location is not fatal; an explicitly named one is.
    let (mut config, config_error) = match &cli.config {
        Some(path) => (Config::load_from(path)?, None),
        None => match Config::load() {
            Ok(config) => (config, None),
            Err(err) => (Config::new(), Some(err)),
        },
    };
    cli.apply(&mut config);

    init_logging(&config, cli.log_level.as_deref())?;
    if let Some(err) = config_error {
        tracing::warn!(error = %err, "could not load config, using defaults");
    }

    let mut app = App::new(&config);

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;

    tracing::info!(
        messages = app.store.len(),
        auto_scrolls = app.auto_scroll_runs(),
        "chat page closed"
    );
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    let mut events = tui::EventHandler::new();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        // Effects see the layout of the frame that was just drawn.
        if app.run_effects() {
            terminal.draw(|frame| ui::render(app, frame))?;
        }

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }
    }

    Ok(())
}

/// Log to a file: the terminal is owned by the UI.
///
/// Filter precedence is `--log-level`, then `RUST_LOG`, then the config file.
fn init_logging(config: &Config, cli_level: Option<&str>) -> Result<()> {
    let path = config.log_file()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = match cli_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env().or_else(|_| {
            EnvFilter::try_new(config.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))
        })?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
