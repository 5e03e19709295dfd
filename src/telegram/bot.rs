//! Bot instance creation, command menu and message addressing

use teloxide::prelude::*;
use teloxide::types::{ChatKind, Message, UserId};
use teloxide::utils::command::BotCommands;

use super::commands::{is_for_other_bot, MenuCommand};
use crate::core::config;

/// Creates a Bot instance from BOT_TOKEN / TELOXIDE_TOKEN
///
/// # Returns
/// * `Ok(Bot)` - Bot instance ready to be dispatched
/// * `Err(anyhow::Error)` - No token configured
pub fn create_bot() -> anyhow::Result<Bot> {
    if config::BOT_TOKEN.is_empty() {
        anyhow::bail!("BOT_TOKEN (or TELOXIDE_TOKEN) is not set");
    }
    Ok(Bot::new(config::BOT_TOKEN.as_str()))
}

/// Sets up bot commands in Telegram UI
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    bot.set_my_commands(MenuCommand::bot_commands()).await?;
    Ok(())
}

/// Checks if a message is addressed to the bot
///
/// Private chats always are. In groups the message must be a `/command`,
/// mention the bot, or reply to one of its messages; `/command@other_bot`
/// never is.
pub fn is_message_addressed_to_bot(msg: &Message, bot_username: Option<&str>, bot_id: UserId) -> bool {
    if matches!(msg.chat.kind, ChatKind::Private(_)) {
        return true;
    }

    if let Some(from) = msg.reply_to_message().and_then(|reply| reply.from.as_ref()) {
        if from.id == bot_id {
            return true;
        }
    }

    msg.text()
        .map(|text| is_group_text_addressed(text, bot_username))
        .unwrap_or(false)
}

fn is_group_text_addressed(text: &str, bot_username: Option<&str>) -> bool {
    let text = text.trim_start();
    if is_for_other_bot(text, bot_username) {
        return false;
    }
    if text.starts_with('/') {
        return true;
    }
    match bot_username {
        Some(username) => text
            .to_lowercase()
            .contains(&format!("@{}", username.to_lowercase())),
        None => false,
    }
}

/// Drops a leading `@bot` mention so `@ioi_bot vote red` parses as `vote red`.
pub fn strip_leading_mention<'a>(text: &'a str, bot_username: Option<&str>) -> &'a str {
    let Some(username) = bot_username else {
        return text;
    };
    let trimmed = text.trim_start();
    match trimmed.split_once(char::is_whitespace) {
        Some((first, rest)) if is_mention_of(first, username) => rest,
        None if is_mention_of(trimmed, username) => "",
        _ => text,
    }
}

fn is_mention_of(word: &str, username: &str) -> bool {
    word.strip_prefix('@')
        .map(|name| name.eq_ignore_ascii_case(username))
        .unwrap_or(false)
}
