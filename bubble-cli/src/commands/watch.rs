//! Live view of a job's runners

use anyhow::Result;
use bubble_portal::{JobMonitor, LoadState};
use tokio::time;

use super::runner::{open_monitor, print_page};
use crate::config::Config;

/// Redraw the runner page after every refresh interval until Ctrl-C
pub async fn watch_job(config: &Config, job: &str, page: usize) -> Result<()> {
    let monitor = open_monitor(config, job, page).await?;
    let mut ticker = time::interval(config.portal.refresh_interval);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Clear the terminal and home the cursor
                print!("\x1B[2J\x1B[H");
                print_page(&monitor);
                if let Some(message) = failure_of(&monitor) {
                    eprintln!("last refresh failed: {}", message);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    monitor.destroy();
    Ok(())
}

fn failure_of(monitor: &JobMonitor) -> Option<String> {
    match monitor.load_state() {
        LoadState::Failed(message) => Some(message),
        _ => None,
    }
}
