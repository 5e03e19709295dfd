//! ioibot - chat bot for olympiad delegations
//!
//! Team leaders cast one vote per team on the poll the technical committee
//! has activated; the committee creates and manages the polls.
//!
//! # Module Structure
//!
//! - `core`: configuration, errors, logging and the poll display server
//! - `storage`: SQLite pool, migrations and the poll store
//! - `poll`: poll/vote commands and their replies
//! - `directory`: team and member roster
//! - `telegram`: command parsing, authorization and the bot handlers

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod cli;
pub mod core;
pub mod directory;
pub mod poll;
pub mod storage;
pub mod telegram;

// Re-export commonly used types for convenience
pub use core::{config, AppError, AppResult};
pub use directory::Directory;
pub use poll::{PollController, PollError};
pub use storage::{create_memory_pool, create_pool, get_connection, DbConnection, DbPool, PollStore};
pub use telegram::CommandRouter;
