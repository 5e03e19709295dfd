//! Poll administration and team voting

pub mod args;
pub mod controller;
pub mod error;
pub mod model;

pub use args::AdminCommand;
pub use controller::PollController;
pub use error::PollError;
pub use model::{Choices, Poll, Vote, Voter};
