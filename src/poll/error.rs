use thiserror::Error;

use super::model::Choices;
use crate::core::error::AppError;

/// Everything that can go wrong with a `poll` or `vote` command.
///
/// None of these are fatal: the controller turns each one into a chat reply.
#[derive(Error, Debug)]
pub enum PollError {
    /// Missing arguments or quoted segments that do not form `"<question>" "<choices>"`
    #[error("malformed poll command")]
    FormatError,

    #[error("poll id {0:?} is not an integer")]
    NotAnInteger(String),

    #[error("poll {0} does not exist")]
    NotFound(i64),

    /// Carries the id of the poll that is already active
    #[error("poll {0} is already active")]
    AlreadyActiveConflict(i64),

    /// Carries the valid choices of the active poll
    #[error("vote does not match any of {0}")]
    InvalidChoice(Choices),

    #[error("no active poll")]
    NoActivePoll,

    #[error("unknown poll sub-command {0:?}")]
    UnknownSubcommand(String),

    #[error("poll storage unavailable: {0}")]
    StorageUnavailable(#[from] AppError),
}

impl From<rusqlite::Error> for PollError {
    fn from(err: rusqlite::Error) -> Self {
        PollError::StorageUnavailable(AppError::Database(err))
    }
}

impl From<r2d2::Error> for PollError {
    fn from(err: r2d2::Error) -> Self {
        PollError::StorageUnavailable(AppError::DatabasePool(err))
    }
}
