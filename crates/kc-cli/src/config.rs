//! CLI configuration.

use std::path::{Path, PathBuf};

use kc_provider::ProviderConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Connection settings for the management API.
    #[serde(flatten)]
    pub provider: ProviderConfig,

    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

impl CliConfig {
    /// Loads configuration and applies environment overrides.
    ///
    /// An explicit path must exist. Without one, `~/.keycloak/kc.toml` is
    /// read if present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> crate::CliResult<Self> {
        let config = match path {
            Some(path) => Self::read(path)?,
            None => {
                let default_path = Self::config_path()?;
                if default_path.exists() {
                    Self::read(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(Self {
            provider: config.provider.from_env(),
            ..config
        })
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> crate::CliResult<Self> {
        toml::from_str(content)
            .map_err(|e| crate::CliError::Config(format!("failed to parse config: {e}")))
    }

    /// Replaces the server URL if one was given on the command line.
    #[must_use]
    pub fn with_server(mut self, server: Option<&str>) -> Self {
        if let Some(server) = server {
            self.provider.server_url = server.to_string();
        }
        self
    }

    /// Gets the configuration file path.
    pub fn config_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| crate::CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".keycloak").join("kc.toml"))
    }

    fn read(path: &Path) -> crate::CliResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::CliError::file(path, e.to_string()))?;
        Self::from_toml(&content)
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable summary and tables.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// YAML format.
    Yaml,
    /// Quiet (minimal output).
    Quiet,
}
