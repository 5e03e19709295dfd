use clap::{Parser, Subcommand};
use std::fmt::Write;

use crate::core::error::AppResult;
use crate::storage::PollStore;

#[derive(Parser, Debug)]
#[command(name = "ioibot")]
#[command(author, version, about = "Delegation bot for the olympiad: polls and team voting", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Run the bot (default)
    Run {
        /// Also serve the poll display on this port (overrides DISPLAY_PORT)
        #[arg(long)]
        display_port: Option<u16>,
    },

    /// Serve only the poll display
    Display {
        #[arg(short, long)]
        port: u16,
    },

    /// Print all polls and the votes of the active one
    Polls,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The sub-command to run; a bare `ioibot` means `ioibot run`.
    pub fn command_or_default(self) -> Commands {
        self.command.unwrap_or(Commands::Run { display_port: None })
    }
}

/// Plain-text report for `ioibot polls`.
pub fn render_poll_report(store: &PollStore) -> AppResult<String> {
    let polls = store.list_polls()?;
    if polls.is_empty() {
        return Ok("No polls have been created.\n".to_string());
    }

    let mut out = String::new();
    for poll in &polls {
        let marker = if poll.active { " [active]" } else { "" };
        let _ = writeln!(
            out,
            "#{}{}: {} ({})",
            poll.poll_id,
            marker,
            poll.question,
            poll.choices.as_slice().join(" / ")
        );
    }

    if let Some(active) = polls.iter().find(|poll| poll.active) {
        let votes = store.votes_for(active.poll_id)?;
        let _ = writeln!(out, "\nVotes for poll {} ({} teams):", active.poll_id, votes.len());
        for vote in votes {
            let _ = writeln!(
                out,
                "  {:<4} {:<16} by {} at {}",
                vote.team_code,
                vote.choice,
                vote.voted_by,
                vote.voted_at.format("%Y-%m-%d %H:%M:%S")
            );
        }
    }
    Ok(out)
}
