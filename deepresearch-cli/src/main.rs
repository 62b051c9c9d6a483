//! Deep Research Orchestrator CLI.
//!
//! Runs the interactive terminal UI by default, or a single headless run with
//! `deepresearch run <TOPIC>`.

mod commands;
mod tui;

use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Deep Research Orchestrator: simulated multi-phase research reports
#[derive(Parser, Debug)]
#[command(name = "deepresearch", version, about, long_about = None)]
struct Cli {
    /// Workspace directory (holds `.deepresearch/config.toml`)
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Configuration file path (replaces the layered lookup)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long)]
    quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Run one research session without the TUI and print the report
    Run {
        /// Research topic
        topic: String,

        /// Additional context (accepted but not used by the simulation)
        #[arg(long)]
        context: Option<String>,

        /// Output format: markdown or json
        #[arg(short, long, default_value = "markdown")]
        format: String,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip all phase delays
        #[arg(long)]
        instant: bool,

        /// Seed for the source and gap selection
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create a default workspace configuration file
    Init,
    /// Show the effective configuration
    Show,
    /// Print the configuration and log locations
    Path,
}

/// Daily rolling log file under `log_dir`, creating the directory first.
fn file_log_appender(log_dir: &Path) -> anyhow::Result<RollingFileAppender> {
    std::fs::create_dir_all(log_dir)?;
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("deepresearch.log")
        .build(log_dir)?;
    Ok(appender)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The TUI owns the terminal, so stderr logging drops to errors only.
    let tui_mode = cli.command.is_none();
    let filter = match cli.verbose {
        _ if tui_mode => "error",
        0 if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::new(filter));

    // A missing or read-only data dir only costs the log file.
    let log_dir = deepresearch_core::config::log_dir();
    let (json_layer, _guard, log_error) = match file_log_appender(&log_dir) {
        Ok(appender) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(EnvFilter::new("debug"));
            (Some(layer), Some(guard), None)
        }
        Err(e) => (None, None, Some(e)),
    };

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    if let Some(e) = log_error {
        tracing::warn!(dir = %log_dir.display(), error = %e, "file logging disabled");
    }

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    match cli.command {
        Some(command) => {
            commands::handle_command(command, &workspace, cli.config.as_deref(), cli.quiet).await
        }
        None => {
            let config = commands::load_effective_config(&workspace, cli.config.as_deref())?;
            tui::run(config).await
        }
    }
}
