//! Bubble HTTP Client
//!
//! A small, type-safe HTTP client for the Bubble master web API.
//!
//! Every endpoint answers with a `{status, data}` envelope; this crate
//! unwraps it so callers only ever see the typed payload or a
//! [`ClientError`]. The [`JobApi`] trait exposes the subset the portal state
//! containers poll, so they can run against a fake in tests.
//!
//! # Example
//!
//! ```no_run
//! use bubble_client::MasterClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = MasterClient::new("http://localhost:8080");
//!
//!     for job in client.list_jobs().await? {
//!         println!("{}", job);
//!     }
//!     Ok(())
//! }
//! ```

mod api;
mod crons;
pub mod error;
mod jobs;
mod workers;

// Re-export commonly used types
pub use api::JobApi;
pub use error::{ClientError, Result};

use bubble_core::dto::Envelope;
use reqwest::Client;
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::debug;

/// Path prefix of every master endpoint
pub const API_PREFIX: &str = "/api/v1/";

/// HTTP client for the Bubble master API
///
/// Methods are organized into logical groups:
/// - Job management (list, create, delete, script, trigger)
/// - Runner history, cancellation and logs
/// - Cron triggers
/// - Worker monitoring
#[derive(Debug, Clone)]
pub struct MasterClient {
    /// Base URL of the master (e.g., "http://localhost:8080")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl MasterClient {
    /// Create a new master client
    ///
    /// # Arguments
    /// * `base_url` - The base URL of the master (e.g., "http://localhost:8080")
    ///
    /// # Example
    /// ```
    /// use bubble_client::MasterClient;
    ///
    /// let client = MasterClient::new("http://localhost:8080");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new master client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    ///
    /// # Example
    /// ```
    /// use bubble_client::MasterClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(10))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = MasterClient::with_client("http://localhost:8080", http_client);
    /// ```
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Get the base URL of the master
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of an API path relative to `/api/v1/`
    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Unwrap the envelope of a response and deserialize its `data`
    ///
    /// HTTP failures become [`ClientError::ApiError`], a non-zero envelope
    /// status becomes [`ClientError::Rejected`].
    async fn handle_envelope<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let envelope = self.read_envelope(response).await?;
        Ok(envelope.into_data()?)
    }

    /// Unwrap the envelope of a response whose `data` carries nothing useful
    async fn handle_empty_envelope(&self, response: reqwest::Response) -> Result<()> {
        let envelope = self.read_envelope(response).await?;
        envelope.into_data::<IgnoredAny>()?;
        Ok(())
    }

    async fn read_envelope(&self, response: reqwest::Response) -> Result<Envelope> {
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let envelope: Envelope = response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))?;

        debug!("{} -> status {}", url, envelope.status);
        Ok(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = MasterClient::new("http://localhost:8080");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let client = MasterClient::new("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.url("jobs/list"),
            "http://localhost:8080/api/v1/jobs/list"
        );
    }

    #[test]
    fn test_client_with_custom_client() {
        let http_client = Client::new();
        let client = MasterClient::with_client("http://localhost:8080", http_client);
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_rejected_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/jobs/list")
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":-1,"data":"master is busy"}"#)
            .create_async()
            .await;

        let client = MasterClient::new(server.url());
        let err = client.list_jobs().await.unwrap_err();

        mock.assert_async().await;
        assert!(err.is_rejected());
        assert!(err.to_string().contains("master is busy"));
    }

    #[tokio::test]
    async fn test_http_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/jobs/list")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = MasterClient::new(server.url());
        let err = client.list_jobs().await.unwrap_err();

        assert!(err.is_server_error());
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v1/jobs/list")
            .with_body("<html>")
            .create_async()
            .await;

        let client = MasterClient::new(server.url());
        let err = client.list_jobs().await.unwrap_err();

        assert!(matches!(err, ClientError::ParseError(_)));
    }
}
