//! Client configuration.

use std::time::Duration;

use thiserror::Error;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors raised while reading the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("{0} environment variable must be set")]
    MissingVar(&'static str),

    /// An environment variable holds an unparseable value.
    #[error("{name} must be a positive integer: {value}")]
    InvalidVar {
        /// Variable name.
        name: &'static str,
        /// The offending value.
        value: String,
    },
}

/// Connection settings for the marketplace API.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a config for the given base URL with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads configuration from the environment: `WAYFARE_API_URL`
    /// (required) and `WAYFARE_API_TIMEOUT_SECS` (optional).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when the URL is absent or the timeout value
    /// does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("WAYFARE_API_URL")
            .map_err(|_| ConfigError::MissingVar("WAYFARE_API_URL"))?;
        let mut config = Self::new(base_url);
        if let Ok(value) = std::env::var("WAYFARE_API_TIMEOUT_SECS") {
            let secs: u64 = value.parse().map_err(|_| ConfigError::InvalidVar {
                name: "WAYFARE_API_TIMEOUT_SECS",
                value,
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// The base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}
