//! Configuration module
//!
//! Handles CLI configuration: control plane connection and operation polling.

use std::time::Duration;

/// Upper bound for the delay between two operation status queries
pub const MAX_POLL_DELAY: Duration = Duration::from_secs(5);

/// Upper bound accepted for the operation poll timeout
pub const MAX_POLL_TIMEOUT: Duration = Duration::from_secs(24 * 60 * 60);

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the control plane API
    pub api_url: String,

    /// Session token sent as a bearer token, if any
    pub token: Option<String>,

    /// Delay before the first operation status re-query
    pub poll_interval: Duration,

    /// Maximum time to wait for a remote operation to finish
    pub poll_timeout: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            token: None,
            poll_interval: Duration::from_millis(500),
            poll_timeout: Duration::from_secs(300),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_url.is_empty() {
            anyhow::bail!("api_url cannot be empty");
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            anyhow::bail!("api_url must start with http:// or https://");
        }

        if self.poll_timeout.is_zero() {
            anyhow::bail!("poll_timeout must be greater than 0");
        }

        if self.poll_timeout > MAX_POLL_TIMEOUT {
            anyhow::bail!("poll_timeout cannot exceed {:?}", MAX_POLL_TIMEOUT);
        }

        if self.poll_interval > self.poll_timeout {
            anyhow::bail!("poll_interval cannot exceed poll_timeout");
        }

        if self.token.as_deref().is_some_and(str::is_empty) {
            anyhow::bail!("token cannot be empty when provided");
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new("http://localhost:8081".to_string())
    }
}
