//! Telegram bot integration and handlers

pub mod bot;
pub mod commands;
pub mod handlers;
pub mod responder;
pub mod router;

// Re-exports for convenience
pub use bot::{create_bot, setup_bot_commands};
pub use commands::BotCommand;
pub use handlers::{schema, HandlerDeps, HandlerError};
pub use responder::Responder;
pub use router::CommandRouter;
