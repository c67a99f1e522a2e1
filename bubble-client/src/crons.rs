//! Cron trigger API endpoints

use bubble_core::domain::cron::CronType;
use bubble_core::dto::cron::CronEntry;

use crate::MasterClient;
use crate::error::Result;

impl MasterClient {
    /// List the cron triggers of a job, in the master's order
    pub async fn list_crons(&self, job: &str) -> Result<Vec<CronEntry>> {
        let url = self.url(&format!("jobs/{}/crons/list", job));
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// Attach a new cron trigger to a job
    ///
    /// # Returns
    /// The created trigger, including the id the master assigned
    pub async fn add_cron(&self, job: &str, kind: CronType) -> Result<CronEntry> {
        let url = self.url(&format!("jobs/{}/crons/add/{}", job, kind.code()));
        let response = self.client.get(&url).send().await?;

        self.handle_envelope(response).await
    }

    /// Remove a cron trigger by id
    pub async fn remove_cron(&self, job: &str, id: &str) -> Result<()> {
        let url = self.url(&format!("jobs/{}/crons/remove/{}", job, id));
        let response = self.client.delete(&url).send().await?;

        self.handle_empty_envelope(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_add_cron_uses_type_code() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/jobs/nightly/crons/add/3")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":0,"data":{"id":"7f","type":3}}"#)
            .create_async()
            .await;

        let client = MasterClient::new(server.url());
        let entry = client.add_cron("nightly", CronType::Daily).await.unwrap();

        mock.assert_async().await;
        assert_eq!(entry.id, "7f");
        assert_eq!(entry.kind, CronType::Daily);
    }

    #[tokio::test]
    async fn test_remove_cron_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("DELETE", "/api/v1/jobs/nightly/crons/remove/7f")
            .with_body(r#"{"status":-1,"data":"trigger not found"}"#)
            .create_async()
            .await;

        let client = MasterClient::new(server.url());
        let err = client.remove_cron("nightly", "7f").await.unwrap_err();

        assert!(err.is_rejected());
    }
}
