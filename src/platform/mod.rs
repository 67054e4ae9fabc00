pub mod telegram;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Url;
use teloxide::utils::command::parse_command;

/// A command received from the platform, reduced to the fields the bot reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingCommand {
    /// Chat the command was sent from
    pub chat_id: i64,
    /// Command name without the leading slash, e.g. "start"
    pub name: String,
    /// Whitespace-separated words after the command, e.g. a deep-link payload
    pub args: Vec<String>,
}

impl IncomingCommand {
    /// Parse message text as a command.
    ///
    /// A `@botname` suffix is accepted whatever bot it names. Returns `None`
    /// for plain text.
    pub fn parse(chat_id: i64, text: &str) -> Option<Self> {
        let mention = text
            .split_whitespace()
            .next()
            .and_then(|token| token.split_once('@'))
            .map(|(_, bot)| bot)
            .unwrap_or_default();

        let (name, args) = parse_command(text, mention)?;
        if name.is_empty() {
            return None;
        }

        Some(Self {
            chat_id,
            name: name.to_string(),
            args: args.into_iter().map(str::to_string).collect(),
        })
    }
}

/// A button that launches a web app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebAppButton {
    pub label: String,
    pub url: Url,
}

/// One-row reply keyboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub buttons: Vec<WebAppButton>,
    /// Ask the client to shrink the keyboard to fit its buttons
    pub resize: bool,
}

/// A single outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
    pub keyboard: Option<ReplyKeyboard>,
}

/// Delivers replies to the messaging platform
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_reply(&self, reply: &Reply) -> Result<()>;
}
