//! The polling surface used by portal state containers
//!
//! Kept as a trait so state containers can be driven by a fake master in
//! tests. [`MasterClient`] is the production implementation.

use async_trait::async_trait;
use bubble_core::domain::cron::CronType;
use bubble_core::dto::cron::CronEntry;
use bubble_core::dto::log::LogChunk;
use bubble_core::dto::runner::RunnerPage;

use crate::MasterClient;
use crate::error::Result;

/// Remote operations the portal performs against the master
#[async_trait]
pub trait JobApi: Send + Sync {
    /// List the cron triggers of a job
    async fn list_crons(&self, job: &str) -> Result<Vec<CronEntry>>;

    /// Attach a cron trigger to a job
    async fn add_cron(&self, job: &str, kind: CronType) -> Result<CronEntry>;

    /// Remove a cron trigger by id
    async fn remove_cron(&self, job: &str, id: &str) -> Result<()>;

    /// List one zero-based page of a job's runners
    async fn list_runners(&self, job: &str, page: usize) -> Result<RunnerPage>;

    /// Request cancellation of a runner
    async fn cancel_runner(&self, job: &str, runner: &str) -> Result<()>;

    /// Fetch the log of one command step
    async fn command_log(&self, job: &str, runner: &str, step: usize, full: bool)
    -> Result<LogChunk>;
}

#[async_trait]
impl JobApi for MasterClient {
    async fn list_crons(&self, job: &str) -> Result<Vec<CronEntry>> {
        MasterClient::list_crons(self, job).await
    }

    async fn add_cron(&self, job: &str, kind: CronType) -> Result<CronEntry> {
        MasterClient::add_cron(self, job, kind).await
    }

    async fn remove_cron(&self, job: &str, id: &str) -> Result<()> {
        MasterClient::remove_cron(self, job, id).await
    }

    async fn list_runners(&self, job: &str, page: usize) -> Result<RunnerPage> {
        MasterClient::list_runners(self, job, page).await
    }

    async fn cancel_runner(&self, job: &str, runner: &str) -> Result<()> {
        MasterClient::cancel_runner(self, job, runner).await
    }

    async fn command_log(
        &self,
        job: &str,
        runner: &str,
        step: usize,
        full: bool,
    ) -> Result<LogChunk> {
        MasterClient::command_log(self, job, runner, step, full).await
    }
}
