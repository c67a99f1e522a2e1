//! Cron command handlers
//!
//! Lists and edits the cron triggers of a job through a [`CronRegistry`].

use anyhow::{Result, anyhow};
use bubble_client::{JobApi, MasterClient};
use bubble_core::domain::cron::CronType;
use bubble_portal::{CronRegistry, LoadState};
use clap::Subcommand;
use colored::*;
use std::sync::Arc;

use crate::config::Config;

/// Cron subcommands
#[derive(Subcommand)]
pub enum CronCommands {
    /// List the cron triggers of a job
    List {
        /// Job name
        job: String,
    },
    /// Add a cron trigger
    Add {
        /// Job name
        job: String,
        /// quarter-hourly, hourly, daily, weekly, monthly, or a numeric code
        kind: CronType,
    },
    /// Remove a cron trigger by id
    Remove {
        /// Job name
        job: String,
        /// Trigger id
        id: String,
    },
}

/// Handle cron commands
pub async fn handle_cron_command(command: CronCommands, config: &Config) -> Result<()> {
    let api: Arc<dyn JobApi> = Arc::new(MasterClient::new(&config.master_url));

    match command {
        CronCommands::List { job } => {
            let registry = load_registry(api, &job).await?;
            print_crons(&registry);
            Ok(())
        }
        CronCommands::Add { job, kind } => {
            let registry = CronRegistry::new(api, &job);
            let entry = registry
                .add(kind)
                .await
                .ok_or_else(|| anyhow!("Master refused to add a {} cron to {}", kind, job))?;
            println!(
                "{} {} ({}) to {}",
                "Added cron".green(),
                entry.id.bold(),
                entry.kind,
                job
            );
            Ok(())
        }
        CronCommands::Remove { job, id } => {
            let registry = load_registry(api, &job).await?;
            if registry.remove(&id).await {
                println!("{} {} from {}", "Removed cron".green(), id.bold(), job);
                Ok(())
            } else {
                Err(anyhow!("Cron {} of {} was not removed", id, job))
            }
        }
    }
}

async fn load_registry(api: Arc<dyn JobApi>, job: &str) -> Result<CronRegistry> {
    let registry = CronRegistry::new(api, job);
    registry.reload().await;

    match registry.load_state() {
        LoadState::Failed(message) => Err(anyhow!("Failed to list crons of {}: {}", job, message)),
        _ => Ok(registry),
    }
}

fn print_crons(registry: &CronRegistry) {
    let items = registry.items();

    if items.is_empty() {
        println!("{}", format!("No crons on {}.", registry.job()).yellow());
        return;
    }

    println!(
        "{}",
        format!("{} cron(s) on {}:", items.len(), registry.job()).bold()
    );
    for entry in items {
        println!("  {} {:<8} {}", "▸".cyan(), entry.id, entry.kind);
    }
}
