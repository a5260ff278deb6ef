//! Error types for the Tether client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Tether client
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the API
        message: String,
    },

    /// API refused the request and explained why in a message list
    #[error("Request rejected (status {status}): {}", .messages.join("; "))]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Messages returned by the API, in order
        messages: Vec<String>,
    },

    /// Failed to parse response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Resource not found
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Server-provided messages attached to this error
    pub fn messages(&self) -> &[String] {
        match self {
            Self::Rejected { messages, .. } => messages,
            _ => &[],
        }
    }

    /// Check if this error is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
            || matches!(self, Self::ApiError { status: 404, .. })
            || matches!(self, Self::Rejected { status: 404, .. })
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        match self {
            Self::ApiError { status, .. } | Self::Rejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
