//! Configuration module for the daypick bot.
//!
//! Loads configuration from environment variables (and `.env`).

use std::env;

use thiserror::Error;

/// Configuration errors. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Bot running mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BotMode {
    #[default]
    Polling,
    Webhook,
}

/// Which storage backend holds members and selections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StorageBackend {
    #[default]
    Mongodb,
    /// In-process maps. Single instance only, lost on restart.
    Memory,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    // Telegram
    pub bot_token: String,
    pub bot_mode: BotMode,
    pub webhook_url: Option<String>,
    pub webhook_port: u16,
    pub webhook_secret: Option<String>,

    /// Bot username (without @) used to match `/cmd@botname`.
    /// Optional - will be fetched via getMe if not set.
    pub bot_username: Option<String>,

    // Storage
    pub storage: StorageBackend,
    pub mongodb_uri: Option<String>,
    pub mongodb_database: String,

    /// Raises the default log level to debug.
    pub debug: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bot_token = var("BOT_TOKEN").ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let bot_mode = match var("BOT_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("polling") => BotMode::Polling,
            Some("webhook") => BotMode::Webhook,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "BOT_MODE",
                    value: other.to_string(),
                });
            }
        };

        let webhook_url = var("WEBHOOK_URL");
        if bot_mode == BotMode::Webhook && webhook_url.is_none() {
            return Err(ConfigError::Missing("WEBHOOK_URL"));
        }

        let webhook_port: u16 = match var("WEBHOOK_PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::Invalid {
                name: "WEBHOOK_PORT",
                value: port.clone(),
            })?,
            None => 8443,
        };

        // Strip @ if present
        let bot_username = var("BOT_USERNAME")
            .map(|s| s.trim_start_matches('@').to_string())
            .filter(|s| !s.is_empty());

        let storage = match var("STORAGE").map(|s| s.to_lowercase()).as_deref() {
            None | Some("mongodb") | Some("mongo") => StorageBackend::Mongodb,
            Some("memory") => StorageBackend::Memory,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "STORAGE",
                    value: other.to_string(),
                });
            }
        };

        let mongodb_uri = var("MONGODB_URI");
        if storage == StorageBackend::Mongodb && mongodb_uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        let debug = match var("DEBUG").map(|d| d.to_lowercase()).as_deref() {
            None | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: "DEBUG",
                    value: other.to_string(),
                });
            }
        };

        Ok(Self {
            bot_token,
            bot_mode,
            webhook_url,
            webhook_port,
            webhook_secret: var("WEBHOOK_SECRET"),
            bot_username,
            storage,
            mongodb_uri,
            mongodb_database: var("MONGODB_DATABASE").unwrap_or_else(|| "daypick".to_string()),
            debug,
        })
    }
}
