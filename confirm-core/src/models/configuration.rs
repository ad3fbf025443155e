//! Configuration data structures

use crate::models::{Color, DEFAULT_TIMEOUT_SECS};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `bot_token`
pub const TOKEN_ENV_VAR: &str = "DISCORD_TOKEN";

pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";
pub const DEFAULT_GATEWAY_URL: &str = "wss://gateway.discord.gg/?v=10&encoding=json";

/// Interaction tokens expire after 15 minutes, so no prompt may wait longer.
pub const MAX_TIMEOUT_SECS: u32 = 900;

/// Logging level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub enum LogLevel {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "warn")]
    Warn,
    #[serde(rename = "info")]
    #[default]
    Info,
    #[serde(rename = "debug")]
    Debug,
    #[serde(rename = "trace")]
    Trace,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Bot token; `DISCORD_TOKEN` takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bot_token: Option<String>,
    /// REST API base URL
    pub api_base_url: String,
    /// Websocket gateway URL
    pub gateway_url: String,
    /// Default seconds to wait for an answer
    pub timeout_seconds: u32,
    /// Default embed color
    pub default_color: u32,
    /// Leave the author line out of prompts by default
    pub hide_author: bool,
    /// Logging verbosity level
    pub log_level: LogLevel,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            bot_token: None,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS as u32,
            default_color: Color::BLACK.0,
            hide_author: false,
            log_level: LogLevel::Info,
        }
    }
}

impl Configuration {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Configuration = toml::from_str(&content)?;
            Ok(config)
        } else {
            // Return default configuration if file doesn't exist
            Ok(Configuration::default())
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the XDG config directory path
    pub fn default_config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        let config_dir = dirs::config_dir().ok_or("Could not determine config directory")?;
        Ok(config_dir.join("discord-confirm").join("config.toml"))
    }

    /// Token from the environment, falling back to the file value
    pub fn resolved_token(&self) -> Option<String> {
        std::env::var(TOKEN_ENV_VAR)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.bot_token.clone())
    }

    pub fn color(&self) -> Color {
        Color(self.default_color)
    }

    /// Copy safe to print: the token is masked
    pub fn redacted(&self) -> Self {
        Self {
            bot_token: self.bot_token.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.timeout_seconds == 0 {
            errors.push("timeout_seconds must be greater than 0".to_string());
        } else if self.timeout_seconds > MAX_TIMEOUT_SECS {
            errors.push(format!(
                "timeout_seconds cannot exceed {} (interaction token lifetime)",
                MAX_TIMEOUT_SECS
            ));
        }

        if self.default_color > Color::MAX {
            errors.push("default_color cannot exceed 0xFFFFFF".to_string());
        }

        if !has_scheme(&self.api_base_url, &["https", "http"]) {
            errors.push("api_base_url must be an http(s) URL".to_string());
        }

        if !has_scheme(&self.gateway_url, &["wss", "ws"]) {
            errors.push("gateway_url must be a ws(s) URL".to_string());
        }

        if let Some(token) = &self.bot_token {
            if token.trim().is_empty() {
                errors.push("bot_token must not be blank".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn has_scheme(raw: &str, schemes: &[&str]) -> bool {
    Url::parse(raw)
        .map(|url| schemes.contains(&url.scheme()))
        .unwrap_or(false)
}
