//! Magnetar CLI - Command-line interface
//!
//! Runs the HTTP gateway or a single search from the terminal.

mod commands;

use std::path::PathBuf;

use clap::Parser;
use magnetar_core::{CliLogLevel, MagnetarConfig, init_tracing};

#[derive(Parser)]
#[command(name = "magnetar")]
#[command(about = "A torrent metasearch gateway")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: commands::Commands,

    /// Console log level (RUST_LOG takes precedence)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Info, global = true)]
    log_level: CliLogLevel,

    /// Directory for a full debug log of the last run
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref())?;

    let config = MagnetarConfig::from_env();
    if let Err(e) = commands::handle_command(cli.command, config).await {
        tracing::debug!(error = %e, "Command failed");
        anyhow::bail!(e.user_message());
    }

    Ok(())
}
