//! Runner command handlers
//!
//! Lists a job's runner history page by page and cancels runners.

use anyhow::{Result, anyhow};
use bubble_client::{JobApi, MasterClient};
use bubble_portal::{JobMonitor, LoadState, RunnerState};
use clap::Subcommand;
use colored::*;
use std::sync::Arc;

use super::colorize_status;
use crate::config::Config;

/// Runner subcommands
#[derive(Subcommand)]
pub enum RunnerCommands {
    /// List one page of a job's runners
    List {
        /// Job name
        job: String,
        /// One-based page
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Cancel a running or pending runner
    Cancel {
        /// Job name
        job: String,
        /// Runner id
        runner: String,
    },
}

/// Handle runner commands
pub async fn handle_runner_command(command: RunnerCommands, config: &Config) -> Result<()> {
    match command {
        RunnerCommands::List { job, page } => {
            let monitor = open_monitor(config, &job, page).await?;
            print_page(&monitor);
            Ok(())
        }
        RunnerCommands::Cancel { job, runner } => {
            let client = MasterClient::new(&config.master_url);
            client.cancel_runner(&job, &runner).await?;
            println!(
                "{} {} of {}",
                "Requested cancellation of runner".green(),
                runner.bold(),
                job
            );
            Ok(())
        }
    }
}

/// Bind a monitor to `job` and load `page` once
pub(crate) async fn open_monitor(config: &Config, job: &str, page: usize) -> Result<JobMonitor> {
    let api: Arc<dyn JobApi> = Arc::new(MasterClient::new(&config.master_url));
    let monitor = JobMonitor::new(api, config.portal.clone());

    monitor.bind(job);
    monitor.set_index(page);
    monitor.navigate().await;

    if let LoadState::Failed(message) = monitor.load_state() {
        return Err(anyhow!("Failed to list runners of {}: {}", job, message));
    }

    Ok(monitor)
}

/// Find a runner by id, walking pages from the first
///
/// Leaves the monitor on the page where the runner was found, so timer
/// refreshes keep it up to date.
pub(crate) async fn find_runner(monitor: &JobMonitor, id: &str) -> Result<Arc<RunnerState>> {
    let mut page = 1;

    loop {
        if let Some(runner) = monitor.get_runner(id) {
            return Ok(runner);
        }

        page += 1;
        if page > monitor.page_count() {
            return Err(anyhow!("No runner {} found", id));
        }

        monitor.set_index(page);
        monitor.navigate().await;
    }
}

/// Print the monitor's current page
pub(crate) fn print_page(monitor: &JobMonitor) {
    let runners = monitor.runners();
    let job = monitor.target().unwrap_or_default();

    println!(
        "{}",
        format!(
            "Job {} - page {}/{} ({} runner(s) total)",
            job,
            monitor.index(),
            monitor.page_count().max(1),
            monitor.total()
        )
        .bold()
    );

    if runners.is_empty() {
        println!("{}", "No runners on this page.".yellow());
        return;
    }

    println!();
    for runner in runners {
        print_runner(&runner);
    }
}

fn print_runner(runner: &RunnerState) {
    let cancel_hint = if runner.cancelable() {
        " (cancelable)".dimmed().to_string()
    } else {
        String::new()
    };

    println!(
        "  {} Runner {}  {}{}",
        "▸".cyan(),
        runner.id().bold(),
        colorize_status(runner.status()),
        cancel_hint
    );

    for cmd in runner.cmds() {
        println!(
            "    {:>2}. {:<17} {:<12} {}",
            cmd.index(),
            cmd.alias(),
            colorize_status(cmd.status()),
            format!("measure {}", cmd.measure()).dimmed()
        );
    }
    println!();
}
