//! Command log display

use anyhow::{Result, anyhow};
use bubble_portal::{CommandState, LoadState};
use colored::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use super::runner::{find_runner, open_monitor};
use crate::config::Config;

/// Print the log of one command step, optionally following it
pub async fn show_log(
    config: &Config,
    job: &str,
    runner_id: &str,
    step: usize,
    full: bool,
    follow: bool,
) -> Result<()> {
    let monitor = open_monitor(config, job, 1).await?;
    let runner = find_runner(&monitor, runner_id).await?;
    let cmd = runner
        .get_cmd(step)
        .ok_or_else(|| anyhow!("Runner {} has no step {}", runner_id, step))?;

    eprintln!(
        "{}",
        format!("{} / {} / {}. {}", job, runner_id, step, cmd.name()).dimmed()
    );

    if full {
        cmd.quest_full().await;
    } else {
        cmd.load();
    }
    wait_first_fetch(&cmd, config).await?;

    let mut printed = String::new();
    print_new(&cmd, &mut printed);

    if !follow {
        cmd.reset();
        if !cmd.log_is_full() {
            eprintln!("{}", "(tail only, pass --full for the whole log)".dimmed());
        }
        monitor.destroy();
        return Ok(());
    }

    let mut ticker = time::interval(config.portal.log_poll_interval);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                print_new(&cmd, &mut printed);
                if !cmd.is_polling() {
                    // The last fetch may have landed after the print above
                    print_new(&cmd, &mut printed);
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    cmd.reset();
    monitor.destroy();
    eprintln!("{}", format!("step finished: {}", cmd.status()).dimmed());
    Ok(())
}

async fn wait_first_fetch(cmd: &Arc<CommandState>, config: &Config) -> Result<()> {
    let step = (config.portal.log_poll_interval / 10).max(Duration::from_millis(10));
    let mut ticker = time::interval(step);

    while cmd.is_loading() {
        if let LoadState::Failed(message) = cmd.load_state() {
            return Err(anyhow!("Failed to fetch log: {}", message));
        }
        ticker.tick().await;
    }

    Ok(())
}

/// Print whatever the log gained since the last call
///
/// A tail log slides instead of growing; when the new text no longer
/// extends what was printed, it is printed again in full.
fn print_new(cmd: &CommandState, printed: &mut String) {
    let Some(logs) = cmd.logs() else {
        return;
    };

    if let Some(rest) = logs.strip_prefix(printed.as_str()) {
        print!("{}", rest);
    } else {
        println!("{}", "--- log window moved ---".dimmed());
        print!("{}", logs);
    }
    *printed = logs;
}
