//! Sending replies back to a chat.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::ParseMode;
use teloxide::RequestError;

/// Outgoing side of the bot. Replies are markdown-ish text.
#[async_trait]
pub trait Responder: Send + Sync {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), RequestError>;
}

fn is_markdown_parse_error(err: &RequestError) -> bool {
    err.to_string().to_lowercase().contains("can't parse entities")
}

/// Sends with legacy Markdown, then once more as plain text if Telegram
/// cannot parse the entities (underscores in account names, stray backticks).
#[async_trait]
impl Responder for Bot {
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<(), RequestError> {
        let sent = self
            .send_message(chat_id, text.to_string())
            .parse_mode(ParseMode::Markdown)
            .await;

        match sent {
            Ok(_) => Ok(()),
            Err(e) if is_markdown_parse_error(&e) => {
                log::warn!("Markdown rejected for chat {}, resending as plain text: {}", chat_id.0, e);
                self.send_message(chat_id, text.to_string()).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
