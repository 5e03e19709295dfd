//! `poll` and `vote` command handling.
//!
//! Every call re-reads the store; nothing about polls is cached between
//! invocations. Callers are role-checked before they get here.

use std::fmt::Write;

use super::args::AdminCommand;
use super::error::PollError;
use super::model::{Choices, Voter};
use crate::storage::PollStore;

/// Line break in replies (markdown hard break).
pub const BR: &str = "  \n";

/// Indentation used under a poll heading (em space + en space).
const INDENT: &str = "\u{2003}\u{2002}";

pub const USAGE: &str = concat!(
    "Usage:  \n\n",
    "- `poll new \"<question>\" \"<choices-separated-with-/>\"`: create new poll  \n",
    "- `poll update <poll-id> \"<question>\" \"<choices-separated-with-/>\"`: update existing poll  \n",
    "- `poll list`: show list of created polls  \n",
    "- `poll activate <poll-id>`: activate a poll  \n",
    "- `poll deactivate`: deactivate all polls  \n\n",
    "Examples:  \n\n",
    "- `poll new \"Is this a question?\" \"yes/no/abstain\"`  \n",
    "- `poll update 1 \"What is 1+1?\" \"one/two/yes\"`  \n",
    "- `poll activate 10`",
);

pub struct PollController {
    store: PollStore,
}

impl PollController {
    pub fn new(store: PollStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PollStore {
        &self.store
    }

    /// Handle `poll <args...>` and return the reply text.
    pub fn manage(&self, args: &[String]) -> String {
        AdminCommand::parse(args)
            .and_then(|command| self.run_admin(command))
            .unwrap_or_else(|err| error_reply(&err))
    }

    /// Handle `vote <args...>` from `voter` and return the reply text.
    pub fn vote(&self, voter: &Voter, args: &[String]) -> String {
        self.run_vote(voter, args).unwrap_or_else(|err| error_reply(&err))
    }

    fn run_admin(&self, command: AdminCommand) -> Result<String, PollError> {
        match command {
            AdminCommand::Usage => Ok(USAGE.to_string()),
            AdminCommand::New { question, choices } => {
                let poll_id = self.store.create_poll(&question, &choices)?;
                log::info!("Poll {} created: {:?} [{}]", poll_id, question, choices.to_stored());
                Ok(format!("Poll created with ID {}.{}", poll_id, BR))
            }
            AdminCommand::Update {
                poll_id,
                question,
                choices,
            } => {
                if !self.store.update_poll(poll_id, &question, &choices)? {
                    return Err(PollError::NotFound(poll_id));
                }
                log::info!("Poll {} updated: {:?} [{}]", poll_id, question, choices.to_stored());
                Ok(format!("Poll {} updated.{}", poll_id, BR))
            }
            AdminCommand::List => self.list_polls(),
            AdminCommand::Activate { poll_id } => {
                let poll = self.store.activate(poll_id)?;
                log::info!("Poll {} activated", poll_id);
                Ok(format!(
                    "Active poll is now poll {}:{br}{indent}\"{}\"{br}{indent}{}{br}",
                    poll.poll_id,
                    poll.question,
                    poll.choices,
                    br = BR,
                    indent = INDENT,
                ))
            }
            AdminCommand::Deactivate => {
                let cleared = self.store.deactivate_all()?;
                log::info!("All polls deactivated ({} were active)", cleared);
                Ok(format!("All polls deactivated.{}", BR))
            }
        }
    }

    fn list_polls(&self) -> Result<String, PollError> {
        let polls = self.store.list_polls()?;
        if polls.is_empty() {
            return Ok("No polls have been created.".to_string());
        }

        let mut text = String::new();
        for poll in polls {
            let marker = if poll.active { " (active)" } else { "" };
            let _ = write!(
                text,
                "Poll {}{}:{br}{indent}\"{}\"{br}{indent}{}{br}\n",
                poll.poll_id,
                marker,
                poll.question,
                poll.choices,
                br = BR,
                indent = INDENT,
            );
        }
        Ok(text)
    }

    fn run_vote(&self, voter: &Voter, args: &[String]) -> Result<String, PollError> {
        let poll = self.store.get_active_poll()?.ok_or(PollError::NoActivePoll)?;

        if args.is_empty() {
            let mut text = format!("Question: \"{}\"{}\n", poll.question, BR);
            let _ = write!(
                text,
                "You are voting on behalf of the {} team.{}\n",
                voter.country, BR
            );
            text.push_str("Vote by sending one of: \n\n");
            text.push_str(&vote_options(&poll.choices));
            return Ok(text);
        }

        let choice = args.join(" ");
        if !poll.choices.contains(&choice) {
            return Err(PollError::InvalidChoice(poll.choices));
        }

        self.store
            .cast_vote(poll.poll_id, &voter.team_code, &choice, &voter.user_id)?;
        log::info!(
            "Vote recorded: poll={} team={} choice={:?} by={}",
            poll.poll_id,
            voter.team_code,
            choice,
            voter.user_id
        );

        Ok(format!(
            "Question: \"{}\"{br}\nYou voted `{}` on behalf of the {} team. \
             Please wait for your vote to be displayed on the screen.{br}\n\
             You can amend your vote by resending your vote.{br}",
            poll.question,
            choice,
            voter.country,
            br = BR,
        ))
    }
}

/// One `- `vote <choice>`` line per choice.
fn vote_options(choices: &Choices) -> String {
    let mut text = String::new();
    for choice in choices {
        let _ = write!(text, "- `vote {}`{}", choice, BR);
    }
    text
}

/// Reply text for a failed command. Storage failures are also logged.
fn error_reply(err: &PollError) -> String {
    match err {
        PollError::FormatError => "Command format is invalid. Send `poll` to see all commands.".to_string(),
        PollError::NotAnInteger(_) => format!("Poll ID must be an integer.{}", BR),
        PollError::NotFound(poll_id) => format!("Poll {} does not exist.{}", poll_id, BR),
        PollError::AlreadyActiveConflict(active_id) => format!(
            "Poll {} is already active. Only one poll can be active at any time.{}",
            active_id, BR
        ),
        PollError::InvalidChoice(choices) => format!(
            "Your vote is invalid.{br}\nVote by sending one of:{br}\n{}",
            vote_options(choices),
            br = BR,
        ),
        PollError::NoActivePoll => format!("There is no active poll to vote!{}", BR),
        PollError::UnknownSubcommand(_) => {
            format!("Unknown command. Send `poll` to see all available commands.{}", BR)
        }
        PollError::StorageUnavailable(source) => {
            log::error!("Poll storage unavailable: {}", source);
            format!(
                "Sorry, the poll storage is unavailable right now. Please try again in a moment.{}",
                BR
            )
        }
    }
}
