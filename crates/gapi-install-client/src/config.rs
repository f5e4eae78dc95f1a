//! Client configuration.
//!
//! Settings live in an optional `config.toml`, by default at
//! `~/.config/gapi-install/config.toml`. Every setting has a built-in
//! default, and CLI flags (or their environment variables) take precedence
//! over the file. Relative paths are resolved against the working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use gapi_install_auth::{AuthPaths, default_scopes};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{ClientError, ClientResult};
use crate::tracing::TracingOutputFormat;

/// Configuration for the gapi-install client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug logging.
    pub debug: bool,

    /// Log line format.
    pub log_format: TracingOutputFormat,

    /// Filter directive replacing the level presets, e.g.
    /// `"gapi_install_auth=trace"`. `RUST_LOG` is ignored when set.
    pub log_filter: Option<String>,

    /// File locations.
    pub paths: PathSettings,

    /// OAuth request settings.
    pub oauth: OAuthSettings,
}

/// File locations used by the authorization flow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    /// OAuth client secret JSON.
    pub credentials: Option<PathBuf>,

    /// Token output file.
    pub token: Option<PathBuf>,

    /// Authorization code input file.
    pub auth_code: Option<PathBuf>,
}

/// OAuth request settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthSettings {
    /// Scopes requested in the authorization URL.
    pub scopes: Vec<String>,

    /// Token exchange timeout in seconds.
    pub timeout: u64,

    /// Open the authorization URL in the default browser.
    pub open_browser: bool,
}

impl Default for OAuthSettings {
    fn default() -> Self {
        Self {
            scopes: default_scopes(),
            timeout: 30,
            open_browser: false,
        }
    }
}

impl OAuthSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}

impl ClientConfig {
    /// Loads configuration from the default path, if it exists.
    pub fn load() -> ClientResult<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path, which must exist.
    pub fn load_from(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::parse(&content).map_err(|e| match e {
            ClientError::Config(msg) => {
                ClientError::Config(format!("{} in {}", msg, path.display()))
            }
            other => other,
        })
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> ClientResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ClientError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ClientResult<()> {
        if self.oauth.scopes.is_empty() {
            return Err(ClientError::Config("oauth.scopes must not be empty".to_string()));
        }
        if self.oauth.timeout == 0 {
            return Err(ClientError::Config("oauth.timeout must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gapi-install")
            .join("config.toml")
    }

    /// Resolves file locations: CLI flag, then config file, then default.
    pub fn auth_paths(&self, cli: &Cli) -> AuthPaths {
        let defaults = AuthPaths::default();
        let pick = |flag: &Option<PathBuf>, file: &Option<PathBuf>, default: PathBuf| {
            flag.clone().or_else(|| file.clone()).unwrap_or(default)
        };

        AuthPaths {
            credentials: pick(
                &cli.credentials_file,
                &self.paths.credentials,
                defaults.credentials,
            ),
            token: pick(&cli.token_file, &self.paths.token, defaults.token),
            auth_code: pick(&cli.auth_code_file, &self.paths.auth_code, defaults.auth_code),
        }
    }
}
