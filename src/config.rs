//! Configuration Management
//!
//! Handles persistent configuration storage for the gapi CLI.

use crate::api::auth::AuthMode;
use crate::api::service::DEFAULT_SERVER;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable overriding the default server
pub const SERVER_ENV: &str = "GAPI_SERVER";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Base host for API calls
    #[serde(default)]
    pub server: Option<String>,
    /// Last used spec file
    #[serde(default)]
    pub spec: Option<PathBuf>,
    /// How the access token is attached
    #[serde(default)]
    pub auth_mode: Option<AuthMode>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("gapi"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;

        Ok(())
    }

    /// Get effective server (config > environment > default)
    pub fn effective_server(&self) -> String {
        self.server
            .clone()
            .or_else(|| std::env::var(SERVER_ENV).ok().filter(|s| !s.is_empty()))
            .unwrap_or_else(|| DEFAULT_SERVER.to_string())
    }

    /// Resolve the server for a run (CLI > spec file > config > environment > default)
    pub fn resolve_server(&self, cli: Option<String>, spec_file: Option<String>) -> String {
        cli.or(spec_file).unwrap_or_else(|| self.effective_server())
    }

    pub fn effective_auth_mode(&self) -> AuthMode {
        self.auth_mode.unwrap_or_default()
    }
}
