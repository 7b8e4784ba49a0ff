//! Configuration for the cloud monitoring client.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// API version segment baked into every request URL.
const API_VERSION: &str = "v1.0";

/// Client configuration: where the service lives and how to talk to it.
/// Treated as immutable for the lifetime of a client instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Service endpoint, e.g. "https://monitoring.example.com"
    pub endpoint: String,

    /// Account identifier scoped into every request path.
    pub account_id: String,

    /// Static account token sent as the auth header on every request.
    pub token: String,

    /// Enable debug logging of requests and responses.
    #[serde(default)]
    pub debug: bool,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// Create a configuration with default timeout and no debug logging.
    pub fn new(
        endpoint: impl Into<String>,
        account_id: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            account_id: account_id.into(),
            token: token.into(),
            debug: false,
            timeout_seconds: default_timeout(),
        }
    }

    /// Load configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::MissingField("endpoint".into()));
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "endpoint '{}' must be an http(s) URL",
                self.endpoint
            )));
        }
        if self.account_id.is_empty() {
            return Err(ConfigError::MissingField("account_id".into()));
        }
        if self.token.is_empty() {
            return Err(ConfigError::MissingField("token".into()));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(
                "timeout_seconds must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Account-scoped API base URL; every resource URI is appended to this.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.endpoint.trim_end_matches('/'),
            API_VERSION,
            self.account_id
        )
    }

    /// Get timeout as Duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}
