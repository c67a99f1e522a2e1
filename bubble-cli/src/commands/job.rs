//! Job command handlers
//!
//! Handles job-level CLI commands: listing, creating, deleting, triggering
//! and editing the job script.

use anyhow::{Context, Result};
use bubble_client::MasterClient;
use clap::Subcommand;
use colored::*;
use std::path::PathBuf;

use crate::config::Config;

/// Job subcommands
#[derive(Subcommand)]
pub enum JobCommands {
    /// List all jobs
    List,
    /// Create an empty job
    Create {
        /// Job name
        job: String,
    },
    /// Delete a job and its history
    Delete {
        /// Job name
        job: String,
    },
    /// Start a runner for a job now
    Trigger {
        /// Job name
        job: String,
    },
    /// Print the job script
    Script {
        /// Job name
        job: String,
    },
    /// Replace the job script with the contents of a file
    SetScript {
        /// Job name
        job: String,
        /// Path to the script file
        file: PathBuf,
    },
}

/// Handle job commands
///
/// Routes job subcommands to their respective handlers.
pub async fn handle_job_command(command: JobCommands, config: &Config) -> Result<()> {
    let client = MasterClient::new(&config.master_url);

    match command {
        JobCommands::List => list_jobs(&client).await,
        JobCommands::Create { job } => {
            client.create_job(&job).await?;
            println!("{} {}", "Created job".green(), job.bold());
            Ok(())
        }
        JobCommands::Delete { job } => {
            client.delete_job(&job).await?;
            println!("{} {}", "Deleted job".green(), job.bold());
            Ok(())
        }
        JobCommands::Trigger { job } => {
            client.trigger_job(&job).await?;
            println!("{} {}", "Triggered job".green(), job.bold());
            Ok(())
        }
        JobCommands::Script { job } => {
            let script = client.job_script(&job).await?;
            print!("{}", script);
            Ok(())
        }
        JobCommands::SetScript { job, file } => set_script(&client, &job, &file).await,
    }
}

/// List all jobs
async fn list_jobs(client: &MasterClient) -> Result<()> {
    let jobs = client.list_jobs().await?;

    if jobs.is_empty() {
        println!("{}", "No jobs found.".yellow());
    } else {
        println!("{}", format!("Found {} job(s):", jobs.len()).bold());
        println!();
        for job in jobs {
            println!("  {} {}", "▸".cyan(), job);
        }
    }

    Ok(())
}

/// Upload a script file
async fn set_script(client: &MasterClient, job: &str, file: &PathBuf) -> Result<()> {
    let script = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read script file {}", file.display()))?;

    client.set_job_script(job, &script).await?;

    println!(
        "{} {} ({} bytes)",
        "Updated script of".green(),
        job.bold(),
        script.len()
    );

    Ok(())
}
