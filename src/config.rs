use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable holding the bot token. Takes precedence over the config file.
pub const TOKEN_ENV_VAR: &str = "TELEGRAM_TOKEN";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
}

impl Config {
    /// Load the config file if it exists, then apply the `TELEGRAM_TOKEN` override.
    pub fn load(path: &Path) -> Result<Self> {
        let content = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Some(content)
        } else {
            None
        };

        Self::from_sources(content.as_deref(), std::env::var(TOKEN_ENV_VAR).ok())
            .with_context(|| format!("Failed to load config from {}", path.display()))
    }

    /// Resolve the config from optional file content and an optional env token.
    pub fn from_sources(content: Option<&str>, env_token: Option<String>) -> Result<Self> {
        let mut config: Config = match content {
            Some(content) => toml::from_str(content).context("Failed to parse config file")?,
            None => Config::default(),
        };

        if let Some(token) = env_token.filter(|t| !t.trim().is_empty()) {
            config.telegram.bot_token = token;
        }

        config.telegram.bot_token = config.telegram.bot_token.trim().to_string();
        if config.telegram.bot_token.is_empty() {
            bail!(
                "Telegram bot token is not set: export {} or set [telegram] bot_token",
                TOKEN_ENV_VAR
            );
        }

        Ok(config)
    }
}
