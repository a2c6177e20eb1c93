//! `lanscope` — terminal dashboard for a LAN device inventory backend.
//!
//! Shows the reconciled device list with live search and filtering,
//! summary stats, and scan/authorize controls. Data flows from
//! `lanscope-core`'s [`InventoryStore`](lanscope_core::InventoryStore)
//! through a background bridge task into the TUI action loop.
//!
//! Logs are written to a file (default `/tmp/lanscope.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod data_bridge;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use lanscope_core::InventoryStore;

use crate::app::App;

/// Terminal dashboard for monitoring and authorizing LAN devices.
#[derive(Parser, Debug)]
#[command(name = "lanscope", version, about)]
struct Cli {
    /// Backend base URL (e.g., http://localhost:8080). Overrides the config file.
    #[arg(short = 'b', long, env = "LANSCOPE_BACKEND")]
    backend: Option<String>,

    /// Config profile to use (defaults to the file's default_profile)
    #[arg(short = 'p', long)]
    profile: Option<String>,

    /// Config file path (defaults to the platform config directory)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Log file path
    #[arg(long, default_value = "/tmp/lanscope.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that would
/// corrupt the TUI output. Returns a guard that must be held for the
/// lifetime of the application to ensure logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lanscope={log_level},lanscope_core={log_level},lanscope_api={log_level}"
        ))
    });

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("lanscope.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the backend connection from CLI flags, env, and the config file.
/// Precedence: `--backend` flag > named/default profile from the file.
fn resolve_store(cli: &Cli) -> Result<InventoryStore> {
    let config = match &cli.config {
        Some(path) => lanscope_config::load_from(path)?,
        None => lanscope_config::load()?,
    };

    let store_config = match &cli.backend {
        Some(raw) => config.resolve_url(raw)?,
        None => config.resolve(cli.profile.as_deref()).map_err(|e| {
            eyre!(
                "{e}\n\nPass --backend <URL> or add a profile to {}",
                lanscope_config::config_path().display()
            )
        })?,
    };

    Ok(InventoryStore::connect(&store_config)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let store = resolve_store(&cli)?;
    info!("starting lanscope");

    let mut app = App::new(store);
    app.run().await?;

    Ok(())
}
