use reqwest::StatusCode;
use thiserror::Error;

/// Failure talking to the booking API
#[derive(Error, Debug)]
pub enum ApiError {
    /// Connection, timeout or TLS failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned {status}{}", .message.as_deref().map(|m| format!(": {}", m)).unwrap_or_default())]
    Status {
        status: StatusCode,
        message: Option<String>,
    },

    /// Body did not have the expected shape
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    /// Message supplied by the server in its error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
