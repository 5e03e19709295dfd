//! Turning message text into a [`BotCommand`].
//!
//! Commands work with or without a leading `/`, so `vote red`, `/vote red`
//! and `/vote@ioi_bot red` are the same command.

use teloxide::utils::command::BotCommands;

/// Commands shown in the Telegram menu
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I understand these commands:")]
pub enum MenuCommand {
    #[command(description = "show available commands")]
    Help,
    #[command(description = "show team or committee members")]
    Info,
    #[command(description = "manage polls (HTC only)")]
    Poll,
    #[command(description = "cast the vote of your team")]
    Vote,
}

/// A parsed chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    Echo(Vec<String>),
    Info(Vec<String>),
    Poll(Vec<String>),
    Vote(Vec<String>),
    Unknown(String),
}

impl BotCommand {
    /// `None` for blank text.
    pub fn parse(text: &str) -> Option<Self> {
        let mut words = text.split_whitespace();
        let word = command_word(words.next()?);
        let args: Vec<String> = words.map(str::to_string).collect();

        Some(match word.as_str() {
            "help" => BotCommand::Help,
            "echo" => BotCommand::Echo(args),
            "info" => BotCommand::Info(args),
            "poll" => BotCommand::Poll(args),
            "vote" => BotCommand::Vote(args),
            _ => BotCommand::Unknown(word),
        })
    }
}

/// `/Vote@ioi_bot` → `vote`
fn command_word(raw: &str) -> String {
    let stripped = raw.strip_prefix('/').unwrap_or(raw);
    let name = match split_bot_suffix(stripped) {
        Some((name, _bot)) => name,
        None => stripped,
    };
    name.to_lowercase()
}

/// `vote@ioi_bot` → `("vote", "ioi_bot")`. A bare `@mention` has no command part.
fn split_bot_suffix(word: &str) -> Option<(&str, &str)> {
    word.split_once('@').filter(|(name, _bot)| !name.is_empty())
}

/// Bot named by the `@suffix` of a slash command, as in `/vote@ioi_bot`.
pub fn addressed_bot(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let stripped = first.strip_prefix('/')?;
    split_bot_suffix(stripped).map(|(_name, bot)| bot)
}

/// True when the command word carries an `@suffix` naming some other bot.
///
/// Without a known username of our own the suffix cannot be checked and the
/// command is accepted.
pub fn is_for_other_bot(text: &str, bot_username: Option<&str>) -> bool {
    match (addressed_bot(text), bot_username) {
        (Some(target), Some(own)) => !target.eq_ignore_ascii_case(own),
        _ => false,
    }
}
