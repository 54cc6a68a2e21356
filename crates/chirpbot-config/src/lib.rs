use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default config filename, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "chirpbot.json5";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON5 parse error: {0}")]
    Json5(#[from] json5::Error),
    #[error("Config file not found: {0}")]
    NotFound(String),
}

/// IRC connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrcConfig {
    /// Server hostname.
    pub server: String,
    /// Server port.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Bot nick.
    #[serde(default = "default_nick")]
    pub nick: String,
    /// Channel to join and relay into (e.g. "#feeds").
    pub channel: String,
}

fn default_port() -> u16 {
    6667
}

fn default_nick() -> String {
    "twitterbot".to_string()
}

/// Feed API credentials and endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Account username for basic auth.
    pub username: String,
    /// Account password for basic auth.
    pub password: String,
    /// API base URL.
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

fn default_api_base() -> String {
    "https://api.twitter.com".to_string()
}

/// Top-level chirpbot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    pub irc: IrcConfig,
    pub feed: FeedConfig,
}

/// Load configuration from a JSON5 file.
///
/// A missing file or a missing required key fails startup; there is no
/// fall-back-to-defaults path.
pub fn load_config(path: &Path) -> Result<BotConfig, ConfigError> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: BotConfig = json5::from_str(&content)?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}
