//! Worker monitor command

use anyhow::Result;
use bubble_client::MasterClient;
use colored::*;

use crate::config::Config;

/// List connected workers
pub async fn list_workers(config: &Config) -> Result<()> {
    let client = MasterClient::new(&config.master_url);
    let workers = client.monitor_workers().await?;

    if workers.is_empty() {
        println!("{}", "No workers connected.".yellow());
        return Ok(());
    }

    println!("{}", format!("{} worker(s):", workers.len()).bold());
    for worker in workers {
        println!("  {} {:<20} load {}", "▸".cyan(), worker.id, worker.workload);
    }

    Ok(())
}
