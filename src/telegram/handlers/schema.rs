//! Dispatcher schema

use teloxide::dispatching::{UpdateFilterExt, UpdateHandler};
use teloxide::prelude::*;
use teloxide::types::Message;

use super::types::{HandlerDeps, HandlerError};
use crate::telegram::bot::{is_message_addressed_to_bot, strip_leading_mention};
use crate::telegram::commands::is_for_other_bot;

/// Creates the main dispatcher schema for the Telegram bot.
///
/// Only text messages addressed to the bot are handled; everything else
/// falls through silently.
pub fn schema(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    dptree::entry().branch(text_message_handler(deps))
}

fn text_message_handler(deps: HandlerDeps) -> UpdateHandler<HandlerError> {
    let deps_filter = deps.clone();

    Update::filter_message()
        .filter(move |msg: Message| {
            msg.text().is_some()
                && is_message_addressed_to_bot(&msg, deps_filter.bot_username.as_deref(), deps_filter.bot_id)
        })
        .endpoint(move |msg: Message| {
            let deps = deps.clone();
            async move {
                let sender = msg.from.as_ref().and_then(|u| u.username.clone());
                let text = msg.text().unwrap_or_default();
                reply_to_message(&deps, msg.chat.id, sender.as_deref(), text).await
            }
        })
}

/// Routes one text message and sends the reply, if there is one.
pub async fn reply_to_message(
    deps: &HandlerDeps,
    chat_id: ChatId,
    sender: Option<&str>,
    text: &str,
) -> Result<(), HandlerError> {
    let text = strip_leading_mention(text, deps.bot_username.as_deref());
    if is_for_other_bot(text, deps.bot_username.as_deref()) {
        return Ok(());
    }
    let Some(reply) = deps.router.handle(sender, text) else {
        return Ok(());
    };

    if let Err(e) = deps.responder.send_text(chat_id, &reply).await {
        log::error!("Failed to send reply to chat {}: {}", chat_id.0, e);
        return Err(e.into());
    }
    Ok(())
}
