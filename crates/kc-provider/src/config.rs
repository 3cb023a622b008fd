//! Provider configuration.
//!
//! Configuration comes from a TOML/serde source with environment variable
//! overrides applied on top.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ProviderResult, ValidationErrors};

/// Connection settings for the management API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Server URL (e.g., http://localhost:8080).
    #[serde(default = "default_server_url")]
    pub server_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token attached to every request.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,
}

fn default_server_url() -> String {
    "http://localhost:8080".to_string()
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
            access_token: None,
        }
    }
}

impl ProviderConfig {
    /// Creates a configuration pointing at the given server.
    #[must_use]
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Applies `KC_SERVER_URL`, `KC_TIMEOUT_SECS` and `KC_ACCESS_TOKEN` on top.
    #[must_use]
    pub fn from_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Applies overrides from an arbitrary key lookup.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup("KC_SERVER_URL") {
            self.server_url = url;
        }
        if let Some(timeout) = lookup("KC_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = timeout;
        }
        if let Some(token) = lookup("KC_ACCESS_TOKEN").filter(|t| !t.is_empty()) {
            self.access_token = Some(token);
        }
        self
    }

    /// Request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Server URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.server_url.trim_end_matches('/')
    }

    /// Checks that the settings are usable.
    pub fn validate(&self) -> ProviderResult<()> {
        let mut errors = ValidationErrors::new();

        match url::Url::parse(&self.server_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(
                "server_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ),
            Err(e) => errors.push("server_url", e.to_string()),
        }
        if self.timeout_secs == 0 {
            errors.push("timeout_secs", "must be greater than zero");
        }

        errors.into_result()
    }
}
