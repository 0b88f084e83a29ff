// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Stored in `$XDG_CONFIG_HOME/andaria/config.toml`. Every field is optional
//! in the file; missing fields take their defaults. Command-line flags and
//! `ANDARIA_TOKEN` take precedence over the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::channel::ChannelConfig;
use crate::error::{Error, Result};

const CONFIG_DIR_NAME: &str = "andaria";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Environment variable holding the bearer token.
pub const TOKEN_ENV: &str = "ANDARIA_TOKEN";

/// Client configuration stored in `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the REST API, including the version prefix.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Base URL of the WebSocket server.
    #[serde(default = "default_ws_base")]
    pub ws_base: String,
    /// Notifications requested per page (default: 20).
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Reconnect attempts before the channel gives up (default: 5).
    #[serde(default = "default_reconnect_max_attempts")]
    pub reconnect_max_attempts: u32,
    /// Backoff unit in milliseconds; attempt n waits n times this (default: 3000).
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
    /// Bearer token. Prefer `ANDARIA_TOKEN` over storing it here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

fn default_api_base() -> String {
    "http://localhost:5750/api/v1".to_string()
}

fn default_ws_base() -> String {
    "ws://localhost:5750".to_string()
}

fn default_page_size() -> u32 {
    20
}

fn default_reconnect_max_attempts() -> u32 {
    5
}

fn default_reconnect_base_delay_ms() -> u64 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base: default_api_base(),
            ws_base: default_ws_base(),
            page_size: default_page_size(),
            reconnect_max_attempts: default_reconnect_max_attempts(),
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
            token: None,
        }
    }
}

impl Config {
    /// Loads configuration from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Loads configuration from `path`, or the defaults if it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks values the file format alone cannot enforce.
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::Config("page_size must be at least 1".to_string()));
        }
        if !(self.ws_base.starts_with("ws://") || self.ws_base.starts_with("wss://")) {
            return Err(Error::Config(format!(
                "invalid ws_base '{}': must start with ws:// or wss://",
                self.ws_base
            )));
        }
        if !(self.api_base.starts_with("http://") || self.api_base.starts_with("https://")) {
            return Err(Error::Config(format!(
                "invalid api_base '{}': must start with http:// or https://",
                self.api_base
            )));
        }
        Ok(())
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Picks the token: explicit flag, then environment, then file.
    pub fn resolve_token(&self, flag: Option<String>, env: Option<String>) -> Option<String> {
        flag.or(env)
            .or_else(|| self.token.clone())
            .filter(|t| !t.trim().is_empty())
    }

    /// Channel settings derived from this configuration.
    pub fn channel(&self) -> ChannelConfig {
        ChannelConfig {
            ws_base: self.ws_base.clone(),
            max_reconnect_attempts: self.reconnect_max_attempts,
            base_delay: Duration::from_millis(self.reconnect_base_delay_ms),
        }
    }
}

/// Default location of the config file.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
