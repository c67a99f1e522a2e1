//! Job-related API endpoints

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use bubble_core::dto::log::LogChunk;
use bubble_core::dto::runner::RunnerPage;

use crate::MasterClient;
use crate::error::{ClientError, Result};

impl MasterClient {
    // =============================================================================
    // Job Management
    // =============================================================================

    /// List the names of all jobs known to the master
    pub async fn list_jobs(&self) -> Result<Vec<String>> {
        let response = self.client.get(self.url("jobs/list")).send().await?;

        self.handle_envelope(response).await
    }

    /// Create an empty job
    ///
    /// # Arguments
    /// * `job` - Name of the job to create
    pub async fn create_job(&self, job: &str) -> Result<()> {
        let url = self.url(&format!("jobs/create/{}", job));
        let response = self.client.get(&url).send().await?;

        self.handle_empty_envelope(response).await
    }

    /// Delete a job and its history
    ///
    /// # Arguments
    /// * `job` - Name of the job to delete
    pub async fn delete_job(&self, job: &str) -> Result<()> {
        let url = self.url(&format!("jobs/delete/{}", job));
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_envelope(response).await
    }

    /// Fetch the script of a job
    ///
    /// The master transports scripts base64-encoded; this returns the
    /// decoded text.
    pub async fn job_script(&self, job: &str) -> Result<String> {
        let url = self.url(&format!("jobs/{}/script", job));
        let response = self.client.get(&url).send().await?;

        let encoded: String = self.handle_envelope(response).await?;
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| ClientError::DecodeError(e.to_string()))?;

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Replace the script of a job
    ///
    /// # Arguments
    /// * `job` - Name of the job
    /// * `script` - Plain script text; it is base64-encoded for transport
    pub async fn set_job_script(&self, job: &str, script: &str) -> Result<()> {
        let url = self.url(&format!("jobs/{}/script", job));
        let response = self
            .client
            .post(&url)
            .body(STANDARD.encode(script))
            .send()
            .await?;

        self.handle_empty_envelope(response).await
    }

    /// Start a new runner for a job right away
    pub async fn trigger_job(&self, job: &str) -> Result<()> {
        let url = self.url(&format!("jobs/{}/trigger", job));
        let response = self.client.get(&url).send().await?;

        self.handle_empty_envelope(response).await
    }

    // =============================================================================
    // Runners
    // =============================================================================

    /// List one page of a job's runners
    ///
    /// # Arguments
    /// * `job` - Name of the job
    /// * `page` - Zero-based page index
    pub async fn list_runners(&self, job: &str, page: usize) -> Result<RunnerPage> {
        let url = self.url(&format!("jobs/{}/list/{}", job, page));
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// Ask the master to cancel a runner
    ///
    /// Only the acknowledgement is returned; the new status shows up in a
    /// later [`list_runners`](Self::list_runners) call.
    pub async fn cancel_runner(&self, job: &str, runner: &str) -> Result<()> {
        let url = self.url(&format!("jobs/{}/cancel/{}", job, runner));
        let response = self.client.get(&url).send().await?;

        self.handle_empty_envelope(response).await
    }

    /// Fetch the log of one command step
    ///
    /// # Arguments
    /// * `job` - Name of the job
    /// * `runner` - Runner id
    /// * `step` - Position of the command within the runner
    /// * `full` - Request the whole log instead of its tail
    pub async fn command_log(
        &self,
        job: &str,
        runner: &str,
        step: usize,
        full: bool,
    ) -> Result<LogChunk> {
        let url = self.url(&format!("jobs/{}/log/{}/{}/{}", job, runner, step, full));
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }
}
