//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod cron;
mod job;
mod log;
mod runner;
mod watch;
mod worker;

pub use cron::CronCommands;
pub use job::JobCommands;
pub use runner::RunnerCommands;

use anyhow::Result;
use bubble_core::domain::status::Status;
use clap::Subcommand;
use colored::*;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
    /// Cron trigger management
    Cron {
        #[command(subcommand)]
        command: CronCommands,
    },
    /// Runner history and cancellation
    Runner {
        #[command(subcommand)]
        command: RunnerCommands,
    },
    /// Print the log of one command step
    Log {
        /// Job name
        job: String,
        /// Runner id
        runner: String,
        /// Zero-based command step
        step: usize,
        /// Fetch the whole log instead of its tail
        #[arg(long)]
        full: bool,
        /// Keep printing while the step is running
        #[arg(short, long)]
        follow: bool,
    },
    /// Watch a job's runners, refreshing until Ctrl-C
    Watch {
        /// Job name
        job: String,
        /// One-based page
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Show connected workers and their workload
    Workers,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Job { command } => job::handle_job_command(command, config).await,
        Commands::Cron { command } => cron::handle_cron_command(command, config).await,
        Commands::Runner { command } => runner::handle_runner_command(command, config).await,
        Commands::Log {
            job,
            runner,
            step,
            full,
            follow,
        } => log::show_log(config, &job, &runner, step, full, follow).await,
        Commands::Watch { job, page } => watch::watch_job(config, &job, page).await,
        Commands::Workers => worker::list_workers(config).await,
    }
}

/// Colorize a runner or command status for display
pub(crate) fn colorize_status(status: Status) -> ColoredString {
    let status_str = status.to_string();
    match status {
        Status::Success => status_str.green(),
        Status::Ongoing => status_str.cyan(),
        Status::Pending => status_str.yellow(),
        Status::Failure | Status::Interrupt => status_str.red(),
        Status::Cancel | Status::NotStart => status_str.dimmed(),
        Status::Other(_) => status_str.normal(),
    }
}
