mod adapters;
mod bootstrap;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use adapters::ConsoleUi;

/// Clipboard history with encrypted save/load and hotkey replay.
#[derive(Parser, Debug)]
#[command(name = "clipstash", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for the dataset, settings and logs
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = bootstrap::load_or_default(cli.config.as_deref())?;
    let data_dir = bootstrap::resolve_data_dir(cli.data_dir, &config)?;

    bootstrap::init_tracing_subscriber(&data_dir).context("Failed to initialize tracing")?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "clipstash starting");

    let wired = bootstrap::wire_dependencies(&config, data_dir, Arc::new(ConsoleUi::new()))
        .context("Failed to assemble application")?;

    bootstrap::run(wired).await
}
