use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ButtonRequest, KeyboardButton, KeyboardMarkup, WebAppInfo};
use tracing::{debug, info};

use crate::bot::Responder;
use crate::platform::{IncomingCommand, Reply, ReplyKeyboard, ReplySender};

/// Sends replies through the Telegram Bot API
#[derive(Clone)]
pub struct TelegramSender {
    bot: Bot,
}

impl TelegramSender {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl ReplySender for TelegramSender {
    async fn send_reply(&self, reply: &Reply) -> Result<()> {
        let mut request = self.bot.send_message(ChatId(reply.chat_id), reply.text.clone());
        if let Some(keyboard) = &reply.keyboard {
            request = request.reply_markup(keyboard_markup(keyboard));
        }
        request.await?;
        Ok(())
    }
}

/// Convert a reply keyboard into Telegram's markup, one row of web app buttons
pub fn keyboard_markup(keyboard: &ReplyKeyboard) -> KeyboardMarkup {
    let row: Vec<_> = keyboard
        .buttons
        .iter()
        .map(|button| {
            KeyboardButton::new(button.label.clone()).request(ButtonRequest::WebApp(WebAppInfo {
                url: button.url.clone(),
            }))
        })
        .collect();

    let markup = KeyboardMarkup::new(vec![row]);
    if keyboard.resize {
        markup.resize_keyboard()
    } else {
        markup
    }
}

/// Extract a command from a text message. Captions and non-text messages are skipped.
pub fn command_from_message(msg: &Message) -> Option<IncomingCommand> {
    IncomingCommand::parse(msg.chat.id.0, msg.text()?)
}

/// Run the Telegram long-polling loop until the process is stopped
pub async fn run(bot: Bot, responder: Arc<Responder<TelegramSender>>) -> Result<()> {
    let me = bot
        .get_me()
        .await
        .context("Failed to authorize with Telegram, check the bot token")?;
    info!("Authorized as @{}", me.user.username.as_deref().unwrap_or("<unknown>"));

    let handler = Update::filter_message()
        .filter_map(|msg: Message| command_from_message(&msg))
        .endpoint(handle_command);

    info!("Starting Telegram platform...");

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![responder])
        .default_handler(|upd| async move {
            debug!("Ignored update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text("telegram"))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

async fn handle_command(
    cmd: IncomingCommand,
    responder: Arc<Responder<TelegramSender>>,
) -> Result<()> {
    debug!("Command /{} {:?} from chat {}", cmd.name, cmd.args, cmd.chat_id);
    responder.handle(&cmd).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::WebAppButton;
    use reqwest::Url;

    fn keyboard(resize: bool) -> ReplyKeyboard {
        ReplyKeyboard {
            buttons: vec![WebAppButton {
                label: "Open".to_string(),
                url: Url::parse("https://easyweather.ru").unwrap(),
            }],
            resize,
        }
    }

    fn message(content: &str) -> Message {
        let json = format!(
            r#"{{"message_id":1,"date":1700000000,
                "chat":{{"id":42,"first_name":"Ann","type":"private"}},
                "from":{{"id":42,"is_bot":false,"first_name":"Ann"}},
                {}}}"#,
            content
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_text_start_message_becomes_command() {
        let cmd = command_from_message(&message(r#""text":"/start""#)).unwrap();
        assert_eq!(cmd.chat_id, 42);
        assert_eq!(cmd.name, "start");
    }

    #[test]
    fn test_start_for_other_bot_becomes_command() {
        let cmd = command_from_message(&message(r#""text":"/start@OtherBot""#)).unwrap();
        assert_eq!(cmd.name, "start");
    }

    #[test]
    fn test_photo_caption_is_not_a_command() {
        let msg = message(
            r#""photo":[{"file_id":"AgAD","file_unique_id":"AQAD",
                         "width":90,"height":90,"file_size":1024}],
               "caption":"/start""#,
        );
        assert_eq!(msg.caption(), Some("/start"));
        assert!(command_from_message(&msg).is_none());
    }

    #[test]
    fn test_plain_text_is_not_a_command() {
        assert!(command_from_message(&message(r#""text":"hello""#)).is_none());
    }

    #[test]
    fn test_markup_has_one_web_app_button() {
        let markup = keyboard_markup(&keyboard(true));
        assert_eq!(markup.keyboard.len(), 1);
        assert_eq!(markup.keyboard[0].len(), 1);

        let button = &markup.keyboard[0][0];
        assert_eq!(button.text, "Open");
        match &button.request {
            Some(ButtonRequest::WebApp(info)) => {
                assert_eq!(info.url.host_str(), Some("easyweather.ru"));
                assert_eq!(info.url.scheme(), "https");
            }
            other => panic!("expected web app request, got {:?}", other),
        }
    }

    #[test]
    fn test_markup_serializes_resize_and_web_app() {
        let json = serde_json::to_string(&keyboard_markup(&keyboard(true))).unwrap();
        assert!(json.contains(r#""resize_keyboard":true"#));
        assert!(json.contains(r#""web_app""#));
        assert!(json.contains("https://easyweather.ru"));
    }

    #[test]
    fn test_markup_without_resize() {
        let json = serde_json::to_string(&keyboard_markup(&keyboard(false))).unwrap();
        assert!(!json.contains(r#""resize_keyboard":true"#));
    }
}
