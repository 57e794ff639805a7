//! Server configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    /// Overrides the Leptos `site_root` (where `/pkg` assets are served from).
    pub site_root: Option<PathBuf>,
}

impl ServerConfig {
    /// Build server config from environment variables.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `SITE_ROOT`: default from the Leptos configuration
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT").map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };
        let site_root = lookup("SITE_ROOT").filter(|v| !v.trim().is_empty()).map(PathBuf::from);
        Ok(Self { port, site_root })
    }
}
