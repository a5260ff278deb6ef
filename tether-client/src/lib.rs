//! Tether HTTP Client
//!
//! A type-safe HTTP client for the CI/CD control plane API.
//!
//! The reconciler in the CLI only depends on the [`ControlPlane`] trait, so the
//! HTTP implementation can be swapped for a scripted one in tests.
//!
//! # Example
//!
//! ```no_run
//! use tether_client::ControlPlaneClient;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = ControlPlaneClient::new("http://localhost:8081");
//!
//!     let project = client.get_project("MYPROJ").await?;
//!     println!("Project {} has {} key(s)", project.name, project.keys.len());
//!     Ok(())
//! }
//! ```

mod applications;
mod control_plane;
pub mod error;
mod operations;
mod projects;
mod workflows;

// Re-export commonly used types
pub use control_plane::ControlPlane;
pub use error::{ClientError, Result};
pub use tether_core::dto::workflow::PushResponse;

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// HTTP client for the control plane API
///
/// Endpoints are organized into logical groups:
/// - Projects, repositories managers and their repositories
/// - Applications, pipelines and application keys
/// - Workflow-as-code operations (start, status, perform)
/// - Workflow archive push and pull
#[derive(Debug, Clone)]
pub struct ControlPlaneClient {
    /// Base URL of the control plane API (e.g., "http://localhost:8081")
    base_url: String,
    /// HTTP client instance
    client: Client,
}

impl ControlPlaneClient {
    /// Create a new control plane client
    ///
    /// # Example
    /// ```
    /// use tether_client::ControlPlaneClient;
    ///
    /// let client = ControlPlaneClient::new("http://localhost:8081");
    /// ```
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    /// Create a new control plane client with a custom HTTP client
    ///
    /// This allows you to configure timeouts, proxies, TLS settings, etc.
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    /// Create a client that authenticates every request with a session token
    pub fn with_token(base_url: impl Into<String>, token: &str) -> Result<Self> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ClientError::InvalidRequest(format!("Invalid token: {}", e)))?;
        value.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value);

        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Get the base URL of the control plane
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            if status.as_u16() == 404 {
                return Err(ClientError::NotFound(error_text));
            }
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }

    /// Handle an API response whose body is a message list
    ///
    /// Messages are kept on failure so callers can show server diagnostics.
    async fn handle_messages_response(&self, response: reqwest::Response) -> Result<Vec<String>> {
        let status = response.status();
        let body = response.text().await?;
        let messages = parse_messages(&body);

        if !status.is_success() {
            return Err(ClientError::Rejected {
                status: status.as_u16(),
                messages,
            });
        }

        Ok(messages)
    }
}

/// Extract a message list from a response body
///
/// Accepts a JSON array of strings, a JSON error object, or plain text.
pub(crate) fn parse_messages(body: &str) -> Vec<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        error: Option<String>,
    }

    if let Ok(messages) = serde_json::from_str::<Vec<String>>(body) {
        return messages;
    }

    if let Ok(ErrorBody { message, error }) = serde_json::from_str::<ErrorBody>(body) {
        return message.or(error).into_iter().collect();
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}
