use std::collections::HashMap;

use anyhow::{Context, Result};
use reqwest::Url;
use tracing::{debug, info};

use crate::platform::{IncomingCommand, Reply, ReplyKeyboard, ReplySender, WebAppButton};

pub const WEBAPP_URL: &str = "https://easyweather.ru";
pub const GREETING: &str = "Привет! Жми на кнопку ниже, чтобы посмотреть погоду 👇";
pub const BUTTON_LABEL: &str = "Открыть EasyWeather 🌦️";

/// Builds the reply for one command
pub type CommandHandler = fn(&IncomingCommand) -> Result<Reply>;

/// Routes commands to their handlers and sends the resulting replies
pub struct Responder<S> {
    sender: S,
    handlers: HashMap<&'static str, CommandHandler>,
}

impl<S: ReplySender> Responder<S> {
    pub fn new(sender: S) -> Self {
        let mut handlers: HashMap<&'static str, CommandHandler> = HashMap::new();
        handlers.insert("start", start_reply);
        Self { sender, handlers }
    }

    /// Names of the commands that get a reply
    pub fn commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Handle one command. Returns `false` when no handler is registered for it.
    pub async fn handle(&self, cmd: &IncomingCommand) -> Result<bool> {
        let Some(handler) = self.handlers.get(cmd.name.as_str()) else {
            debug!("No handler for /{}, ignoring", cmd.name);
            return Ok(false);
        };

        let reply = handler(cmd)?;
        self.sender.send_reply(&reply).await.with_context(|| {
            format!("Failed to send /{} reply to chat {}", cmd.name, cmd.chat_id)
        })?;

        info!("Sent /{} reply to chat {}", cmd.name, cmd.chat_id);
        Ok(true)
    }
}

/// Greeting with a single button that opens the weather web app
pub fn start_reply(cmd: &IncomingCommand) -> Result<Reply> {
    let url = Url::parse(WEBAPP_URL)
        .with_context(|| format!("Invalid web app URL: {}", WEBAPP_URL))?;

    Ok(Reply {
        chat_id: cmd.chat_id,
        text: GREETING.to_string(),
        keyboard: Some(ReplyKeyboard {
            buttons: vec![WebAppButton {
                label: BUTTON_LABEL.to_string(),
                url,
            }],
            resize: true,
        }),
    })
}
