//! Bubble Portal
//!
//! Client-side state for watching jobs on a Bubble master.
//!
//! The containers here poll the master and keep a reconciled view of what
//! they fetched, ready for a front-end to render:
//! - [`CronRegistry`]: the cron triggers of one job
//! - [`JobMonitor`]: a page of a job's runners, refreshed on a timer
//! - [`RunnerState`] / [`CommandState`]: one runner and its command steps,
//!   with per-command log tailing
//!
//! Remote failures never surface as errors. They are logged, recorded as
//! [`LoadState::Failed`], and retried by the next poll.

mod command;
mod config;
mod cron;
mod monitor;
mod runner;
mod state;

#[cfg(test)]
mod testing;

pub use command::CommandState;
pub use config::PortalConfig;
pub use cron::CronRegistry;
pub use monitor::JobMonitor;
pub use runner::RunnerState;
pub use state::LoadState;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Locks a mutex, recovering the data if a previous holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
