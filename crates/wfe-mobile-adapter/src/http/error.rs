/*
[INPUT]:  Error sources (HTTP transport, non-2xx responses, serialization, auth, config)
[OUTPUT]: Structured error types with status and body context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the workflow engine adapter
#[derive(Error, Debug)]
pub enum WfeError {
    /// Any non-2xx response or transport failure; `status` is absent for transport errors
    #[error("Request failed (status {}): {body}", display_status(.status))]
    RequestFailure { status: Option<u16>, body: String },

    /// Authentication failed
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Invalid response from server
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for WfeError {
    fn from(err: reqwest::Error) -> Self {
        WfeError::RequestFailure {
            status: err.status().map(|s| s.as_u16()),
            body: err.to_string(),
        }
    }
}

impl WfeError {
    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        matches!(self, WfeError::Authentication { .. })
    }

    /// HTTP status of a failed request, if the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            WfeError::RequestFailure { status, .. } => *status,
            _ => None,
        }
    }

    /// Create a request failure from status code and response body
    pub fn request_failure(status: StatusCode, body: impl Into<String>) -> Self {
        WfeError::RequestFailure {
            status: Some(status.as_u16()),
            body: body.into(),
        }
    }

    /// Create an authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        WfeError::Authentication {
            message: message.into(),
        }
    }
}

fn display_status(status: &Option<u16>) -> String {
    status.map_or_else(|| "n/a".to_string(), |s| s.to_string())
}

/// Result type alias for adapter operations
pub type Result<T> = std::result::Result<T, WfeError>;
