mod bot;
mod config;
mod platform;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::Bot;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::bot::Responder;
use crate::config::Config;
use crate::platform::telegram::{self, TelegramSender};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,easyweather_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    info!("Loading configuration from: {}", config_path.display());
    let config = Config::load(&config_path).context("Bot is not configured")?;

    let bot = Bot::new(&config.telegram.bot_token);
    let responder = Arc::new(Responder::new(TelegramSender::new(bot.clone())));
    info!("  Commands: {:?}", responder.commands());

    info!("Bot is starting...");
    telegram::run(bot, responder).await?;

    Ok(())
}
