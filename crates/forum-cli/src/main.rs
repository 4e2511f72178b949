//! forum - command line client for the Network Demo forum.
//!
//! Signs in against the forum API, keeps the session in local storage
//! between runs, and lists, reads and edits articles.

mod commands;
mod format;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use forum_core::{App, Config};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::Command;

/// Log file name prefix inside `--log-dir`
const LOG_FILE_PREFIX: &str = "forum.log";

#[derive(Debug, Parser)]
#[command(name = "forum", version, about = "Command line client for the Network Demo forum")]
struct Cli {
    /// API base address, e.g. http://localhost:7777/api
    #[arg(long, global = true, env = "FORUM_API_BASE_URL")]
    base_url: Option<String>,

    /// Also write logs to a daily file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Initialize the tracing subscriber for logging.
///
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer().with_writer(io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(stderr_layer)
                .with(filter)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let _log_guard = init_tracing(cli.log_dir.as_deref());

    let mut config = Config::load()?;
    if let Some(url) = cli.base_url {
        config.api_base_url = url;
    }
    info!(base_url = %config.api_base_url, "forum starting");

    let app = App::new(config)?;
    commands::run(&app, cli.command).await
}
