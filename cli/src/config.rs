//! Configuration file handling for the CLI.
//!
//! Stores the server and token in `$XDG_CONFIG_HOME/outposts/config.toml`.
//! Precedence when resolving: command-line flags, then this file, then
//! `OUTPOSTS_*` environment variables, then built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use outposts_business::BusinessConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration stored on disk
#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
}

#[derive(Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    /// API token sent as a bearer token
    pub token: Option<String>,
}

impl CliConfig {
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Failed to determine config directory")?;
        Ok(config_dir.join("outposts").join("config.toml"))
    }

    /// Loads the config file, or defaults when it does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Writes the file, creating its directory if needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Applies file values and then flag values on top of `base`.
    pub fn resolve(
        &self,
        mut base: BusinessConfig,
        base_url: Option<&str>,
        token: Option<&str>,
    ) -> BusinessConfig {
        if let Some(url) = base_url.or(self.server.base_url.as_deref()) {
            base.api_base_url = BusinessConfig::new(url).api_base_url;
        }
        if let Some(token) = token.or(self.auth.token.as_deref()) {
            base = base.with_token(token);
        }
        base
    }
}
