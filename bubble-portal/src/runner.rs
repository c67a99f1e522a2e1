//! Runner state

use std::sync::{Arc, Mutex};

use bubble_client::JobApi;
use bubble_core::domain::status::Status;
use bubble_core::dto::runner::RunnerRecord;
use tracing::{debug, info, warn};

use crate::command::CommandState;
use crate::config::PortalConfig;
use crate::lock;

/// One execution attempt of a job
///
/// The command list is fixed at construction; refreshes update each step in
/// place by position so log state loaded into a step survives polling.
pub struct RunnerState {
    id: String,
    target: String,
    api: Arc<dyn JobApi>,
    status: Mutex<Status>,
    cmds: Vec<Arc<CommandState>>,
}

impl RunnerState {
    pub(crate) fn new(
        api: Arc<dyn JobApi>,
        target: &str,
        record: &RunnerRecord,
        config: &PortalConfig,
    ) -> Self {
        let cmds = record
            .cmds
            .iter()
            .map(|cmd| {
                Arc::new(CommandState::new(
                    Arc::clone(&api),
                    target,
                    &record.id,
                    cmd,
                    config,
                ))
            })
            .collect();

        Self {
            id: record.id.clone(),
            target: target.to_string(),
            api,
            status: Mutex::new(record.status),
            cmds,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Job this runner belongs to
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn status(&self) -> Status {
        *lock(&self.status)
    }

    pub fn cmds(&self) -> &[Arc<CommandState>] {
        &self.cmds
    }

    /// Command at `step`, or `None` when out of range
    pub fn get_cmd(&self, step: usize) -> Option<Arc<CommandState>> {
        self.cmds.get(step).cloned()
    }

    /// Applies a fresh record of this runner
    ///
    /// Commands are matched by position. The master never changes a
    /// runner's command list, so a length mismatch only updates the
    /// common prefix.
    pub fn refresh(&self, record: &RunnerRecord) {
        *lock(&self.status) = record.status;

        if record.cmds.len() != self.cmds.len() {
            debug!(
                "Runner {} reported {} commands, tracking {}",
                self.id,
                record.cmds.len(),
                self.cmds.len()
            );
        }

        for (cmd, fresh) in self.cmds.iter().zip(&record.cmds) {
            cmd.refresh(fresh);
        }
    }

    /// Whether the runner can still be cancelled
    ///
    /// Pending counts as cancelable as well as Ongoing; the master cancels
    /// a runner that has not reached a worker yet.
    pub fn cancelable(&self) -> bool {
        self.status().is_active()
    }

    /// Asks the master to cancel this runner
    ///
    /// The local status is left alone; the next refresh reports the outcome.
    pub async fn cancel(&self) {
        match self.api.cancel_runner(&self.target, &self.id).await {
            Ok(()) => info!(
                "Requested cancellation of runner {} of job {}",
                self.id, self.target
            ),
            Err(e) => warn!(
                "Failed to cancel runner {} of job {}: {}",
                self.id, self.target, e
            ),
        }
    }
}

impl std::fmt::Debug for RunnerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunnerState")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("status", &self.status())
            .field("cmds", &self.cmds.len())
            .finish()
    }
}
