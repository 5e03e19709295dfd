//! Telegram bot handler tree configuration
//!
//! The same schema is used in production and by integration tests.

mod schema;
mod types;

pub use schema::{reply_to_message, schema};
pub use types::{HandlerDeps, HandlerError};
