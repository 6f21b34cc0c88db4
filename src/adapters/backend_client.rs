//! Shared HTTP settings for the analysis backend.
//!
//! The classifier and the profile sync talk to the same service and share
//! its base URL, request timeout and bearer token.

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use std::time::Duration;

use crate::config::BackendConfig;

/// Connection settings for the backend.
#[derive(Debug, Clone)]
pub struct BackendClientConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    auth_token: Option<Secret<String>>,
}

impl BackendClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(15),
            auth_token: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(Secret::new(token.into()));
        self
    }

    /// Joins `path` onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// `Authorization` header value, when a token is configured.
    pub(crate) fn bearer(&self) -> Option<String> {
        self.auth_token
            .as_ref()
            .map(|token| format!("Bearer {}", token.expose_secret()))
    }

    pub(crate) fn build_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.timeout).build()
    }
}

impl From<&BackendConfig> for BackendClientConfig {
    fn from(config: &BackendConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout: config.timeout(),
            auth_token: config.auth_token.clone(),
        }
    }
}

/// Pulls the `detail` message out of an error body, falling back to the status.
pub(crate) fn error_detail(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {}", status))
}
