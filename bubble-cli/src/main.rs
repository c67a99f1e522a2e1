//! Bubble CLI
//!
//! Command-line front-end for a Bubble master: manage jobs and their cron
//! triggers, inspect runners, and follow logs as they are produced.

mod commands;
mod config;

use anyhow::{Context, Result};
use bubble_portal::PortalConfig;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bubble")]
#[command(about = "Bubble job master CLI", long_about = None)]
struct Cli {
    /// Master URL
    #[arg(long, env = "BUBBLE_MASTER_URL", default_value = "http://localhost:8080")]
    master_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bubble_client=warn,bubble_portal=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        master_url: cli.master_url,
        portal: PortalConfig::from_env().context("Invalid portal configuration")?,
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
