//! Data Transfer Objects for the master web API
//!
//! Every endpoint answers with an [`Envelope`]; the records in the
//! submodules are what its `data` field carries on success.

pub mod cron;
pub mod log;
pub mod runner;
pub mod worker;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// The `{status, data}` wrapper returned by every master endpoint
///
/// `status == 0` means success. On failure the master puts its error
/// string in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: i64,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Envelope {
    /// Whether the master accepted the request
    pub fn is_ok(&self) -> bool {
        self.status == 0
    }

    /// Human-readable rendering of `data`, used as the failure message
    pub fn message(&self) -> String {
        match &self.data {
            serde_json::Value::Null => "no detail".to_string(),
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// Unwraps the payload
    ///
    /// A non-zero status becomes [`EnvelopeError::Rejected`] carrying
    /// [`message`](Self::message); otherwise `data` is decoded as `T`.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, EnvelopeError> {
        if !self.is_ok() {
            return Err(EnvelopeError::Rejected {
                status: self.status,
                message: self.message(),
            });
        }

        Ok(serde_json::from_value(self.data)?)
    }
}

/// Why an [`Envelope`] did not yield its payload
#[derive(Debug, Error)]
pub enum EnvelopeError {
    /// The master refused the request
    #[error("Request rejected (status {status}): {message}")]
    Rejected { status: i64, message: String },

    /// `data` did not have the expected shape
    #[error("Failed to parse envelope data: {0}")]
    Data(#[from] serde_json::Error),
}

/// Deserializes an identifier that may arrive as a string or a number
///
/// The master formats ids as hex strings, but numeric ids are accepted and
/// rendered in decimal so callers always key on a `String`.
pub fn id_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_failure_message() {
        let env: Envelope =
            serde_json::from_str(r#"{"status":-1,"data":"job [x] is not exist"}"#).unwrap();
        assert!(!env.is_ok());
        assert_eq!(env.message(), "job [x] is not exist");
    }

    #[test]
    fn test_envelope_without_data() {
        let env: Envelope = serde_json::from_str(r#"{"status":0}"#).unwrap();
        assert!(env.is_ok());
        assert!(env.data.is_null());
    }

    #[test]
    fn test_into_data_ok() {
        let env: Envelope =
            serde_json::from_str(r#"{"status":0,"data":["build","deploy"]}"#).unwrap();
        let jobs: Vec<String> = env.into_data().unwrap();
        assert_eq!(jobs, vec!["build".to_string(), "deploy".to_string()]);
    }

    #[test]
    fn test_into_data_rejected() {
        let env: Envelope =
            serde_json::from_str(r#"{"status":-1,"data":"job [x] is not exist"}"#).unwrap();
        match env.into_data::<Vec<String>>() {
            Err(EnvelopeError::Rejected { status, message }) => {
                assert_eq!(status, -1);
                assert_eq!(message, "job [x] is not exist");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_into_data_wrong_shape() {
        let env: Envelope = serde_json::from_str(r#"{"status":0,"data":"oops"}"#).unwrap();
        assert!(matches!(
            env.into_data::<Vec<String>>(),
            Err(EnvelopeError::Data(_))
        ));
    }
}
