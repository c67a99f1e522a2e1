//! Error types for the Bubble master client

use bubble_core::dto::EnvelopeError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Bubble master client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Master answered with a non-success HTTP status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Master answered but the envelope status was non-zero
    #[error("Request rejected (status {status}): {message}")]
    Rejected {
        /// Envelope status code
        status: i64,
        /// Error detail the master put in `data`
        message: String,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// A base64 payload could not be decoded
    #[error("Failed to decode payload: {0}")]
    DecodeError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Create a rejection from an envelope status and its detail
    pub fn rejected(status: i64, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Check if the master refused the request at the application level
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Check if the request never produced a response
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::RequestFailed(_))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

impl From<EnvelopeError> for ClientError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Rejected { status, message } => Self::rejected(status, message),
            EnvelopeError::Data(e) => {
                Self::ParseError(format!("Failed to parse envelope data: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(ClientError::rejected(-1, "nope").is_rejected());
        assert!(!ClientError::rejected(-1, "nope").is_server_error());
        assert!(ClientError::api_error(502, "bad gateway").is_server_error());
        assert!(!ClientError::api_error(404, "missing").is_server_error());
    }

    #[test]
    fn test_display() {
        let err = ClientError::rejected(-1, "job [x] is not exist");
        assert_eq!(
            err.to_string(),
            "Request rejected (status -1): job [x] is not exist"
        );
    }

    #[test]
    fn test_from_envelope_error() {
        let rejected = EnvelopeError::Rejected {
            status: -1,
            message: "master is busy".to_string(),
        };
        assert!(ClientError::from(rejected).is_rejected());

        let bad = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        assert!(matches!(
            ClientError::from(EnvelopeError::Data(bad)),
            ClientError::ParseError(_)
        ));
    }
}
