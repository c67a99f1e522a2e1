//! Worker monitor endpoint

use bubble_core::dto::worker::WorkerLoad;

use crate::MasterClient;
use crate::error::Result;

impl MasterClient {
    /// List connected workers and their current workload
    pub async fn monitor_workers(&self) -> Result<Vec<WorkerLoad>> {
        let response = self.client.get(self.url("workers/monitor")).send().await?;

        self.handle_envelope(response).await
    }
}
