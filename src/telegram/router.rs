//! Authorization and dispatch of parsed commands.
//!
//! Transport-free: takes the sender's account name and the message text,
//! returns the reply (if any). Role checks happen here and only here.

use std::fmt::Write;
use std::sync::Arc;

use super::commands::BotCommand;
use crate::core::config::roles;
use crate::directory::{Directory, Member};
use crate::poll::controller::BR;
use crate::poll::PollController;

pub const NOT_AUTHORIZED: &str = "You are not authorized to use this bot. Please contact HTC for details.";
pub const ONLY_TC: &str = "Only HTC can use this command.";
pub const ONLY_LEADERS: &str = "Only Team Leader and Deputy Leader can use this command.";
pub const VOTING_NOT_ALLOWED: &str = "Sorry, you are not allowed to vote.";

const HELP: &str = concat!(
    "Hello, I am the IOI bot. I understand several commands:  \n\n",
    "- `info`: shows various team information  \n",
    "- `vote`: casts vote for your team  \n",
    "- `poll`: manages polls (HTC only)  \n",
);

const INFO_USAGE: &str = concat!(
    "Usage:  \n\n",
    "`info <3-letter-country-code>|ic|sc|tc`: shows team/IC/SC/TC members  \n\n",
    "Examples:  \n\n",
    "- `info IDN`  \n",
    "- `info ic`  \n",
);

const SECTION_BREAK: &str = "  \n  \n";

pub struct CommandRouter {
    directory: Arc<Directory>,
    polls: PollController,
}

impl CommandRouter {
    pub fn new(directory: Arc<Directory>, polls: PollController) -> Self {
        Self { directory, polls }
    }

    pub fn polls(&self) -> &PollController {
        &self.polls
    }

    /// Reply to `text` sent by `sender`. `None` when there is nothing to send.
    pub fn handle(&self, sender: Option<&str>, text: &str) -> Option<String> {
        let command = BotCommand::parse(text)?;

        let Some(caller) = sender.and_then(|user_id| self.directory.lookup(user_id)) else {
            log::warn!("Rejected command from unknown account {:?}", sender);
            return Some(NOT_AUTHORIZED.to_string());
        };

        log::info!("{} ({}) sent {:?}", caller.user_id, caller.role, command);

        let reply = match command {
            BotCommand::Help => HELP.to_string(),
            BotCommand::Echo(args) => {
                let echoed = args.join(" ");
                if echoed.is_empty() {
                    return None;
                }
                echoed
            }
            BotCommand::Info(args) => self.info(&args),
            BotCommand::Poll(args) => {
                if !caller.is_tc() {
                    log::warn!("{} ({}) is not allowed to manage polls", caller.user_id, caller.role);
                    return Some(ONLY_TC.to_string());
                }
                self.polls.manage(&args)
            }
            BotCommand::Vote(args) => {
                let denial = if !caller.is_leader() {
                    Some(ONLY_LEADERS)
                } else if !caller.votes_for_team() {
                    Some(VOTING_NOT_ALLOWED)
                } else {
                    None
                };
                if let Some(denial) = denial {
                    log::warn!("{} ({}, {}) is not allowed to vote", caller.user_id, caller.role, caller.team_code);
                    return Some(denial.to_string());
                }
                self.polls.vote(&caller.voter(), &args)
            }
            BotCommand::Unknown(word) => {
                format!("Unknown command '{}'. Try the 'help' command for more information.", word)
            }
        };
        Some(reply)
    }

    fn info(&self, args: &[String]) -> String {
        let Some(code) = args.first().map(|arg| arg.to_uppercase()) else {
            return INFO_USAGE.to_string();
        };

        let committee = match code.as_str() {
            "IC" => Some(roles::IC_ROLES),
            "SC" => Some(roles::SC_ROLES),
            "TC" => Some(roles::TC_ROLES),
            _ => None,
        };
        if let Some(committee_roles) = committee {
            return self.committee_info(committee_roles);
        }

        let Some(team) = self.directory.visible_team(&code) else {
            return format!("Team {} not found!", code);
        };

        let mut text = format!("Team members from {} ({}):", code, team.name);
        for role in roles::TEAM_ROLES {
            let members: Vec<&Member> = self
                .directory
                .team_members(&code)
                .filter(|member| member.role == *role)
                .collect();
            if members.is_empty() {
                continue;
            }
            let _ = write!(text, "{}{}:{}", SECTION_BREAK, role, BR);
            for member in members {
                let _ = write!(text, "{}- @{} | {}", BR, member.user_id, member.name);
            }
        }

        let _ = write!(text, "{}Contestants:{}", SECTION_BREAK, BR);
        for contestant in self.directory.team_contestants(&code) {
            let online = if contestant.online { " (online)" } else { "" };
            let _ = write!(
                text,
                "{}- `{}`{} | {} {}",
                BR, contestant.code, online, contestant.first_name, contestant.last_name
            );
        }
        text
    }

    fn committee_info(&self, committee_roles: &[&str]) -> String {
        let mut sections = Vec::with_capacity(committee_roles.len());
        for role in committee_roles {
            let mut section = format!("{}:{}", role, BR);
            for member in self.directory.committee_members(role) {
                let chair = if member.chair { " (Chair)" } else { "" };
                let _ = write!(section, "{}- @{}{} | {}", BR, member.user_id, chair, member.name);
            }
            sections.push(section);
        }
        sections.join(SECTION_BREAK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{Contestant, Team};
    use crate::storage::{create_memory_pool, PollStore};

    fn member(user_id: &str, team: &str, role: &str) -> Member {
        Member {
            user_id: user_id.to_string(),
            team_code: team.to_string(),
            name: user_id.to_uppercase(),
            role: role.to_string(),
            chair: false,
        }
    }

    fn team(code: &str, name: &str) -> Team {
        Team {
            code: code.to_string(),
            name: name.to_string(),
            visible: true,
        }
    }

    fn make_router() -> CommandRouter {
        let mut chair = member("chair_sc", "IOI", "ISC Member");
        chair.chair = true;
        let directory = Directory::from_parts(
            vec![team("IDN", "Indonesia"), team("IOI", "IOI")],
            vec![
                member("leader", "IDN", "Team Leader"),
                member("deputy", "IDN", "Deputy Leader"),
                member("guest", "IDN", "Guest"),
                member("htc", "IOI", "HTC"),
                member("plain_sc", "IOI", "ISC Member"),
                chair,
            ],
        );
        let directory = directory.with_contestants(vec![
            contestant("IDN1", "Adi", "Putra", false),
            contestant("IDN2", "Dewi", "Lestari", true),
            contestant("SGP1", "Lim", "Jun", false),
        ]);
        let store = PollStore::new(Arc::new(create_memory_pool().unwrap()));
        CommandRouter::new(Arc::new(directory), PollController::new(store))
    }

    fn contestant(code: &str, first: &str, last: &str, online: bool) -> Contestant {
        Contestant {
            code: code.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            online,
        }
    }

    #[test]
    fn test_unknown_sender_is_rejected_for_every_command() {
        let router = make_router();
        assert_eq!(router.handle(Some("stranger"), "help").as_deref(), Some(NOT_AUTHORIZED));
        assert_eq!(router.handle(None, "vote red").as_deref(), Some(NOT_AUTHORIZED));
    }

    #[test]
    fn test_blank_message_gets_no_reply() {
        assert_eq!(make_router().handle(Some("leader"), "  "), None);
    }

    #[test]
    fn test_poll_requires_tc() {
        let router = make_router();
        assert_eq!(router.handle(Some("leader"), "poll list").as_deref(), Some(ONLY_TC));
        assert_eq!(
            router.handle(Some("htc"), "poll list").as_deref(),
            Some("No polls have been created.")
        );
    }

    #[test]
    fn test_vote_requires_leader_outside_host_team() {
        let router = make_router();
        assert_eq!(router.handle(Some("guest"), "vote").as_deref(), Some(ONLY_LEADERS));
        assert_eq!(router.handle(Some("htc"), "vote").as_deref(), Some(VOTING_NOT_ALLOWED));
        assert_eq!(
            router.handle(Some("deputy"), "vote").as_deref(),
            Some("There is no active poll to vote!  \n")
        );
    }

    #[test]
    fn test_echo_and_unknown() {
        let router = make_router();
        assert_eq!(router.handle(Some("guest"), "echo hi there").as_deref(), Some("hi there"));
        assert_eq!(router.handle(Some("guest"), "echo"), None);
        assert_eq!(
            router.handle(Some("guest"), "dance").as_deref(),
            Some("Unknown command 'dance'. Try the 'help' command for more information.")
        );
    }

    #[test]
    fn test_info_team() {
        let router = make_router();
        let text = router.handle(Some("guest"), "info idn").unwrap();
        assert!(text.starts_with("Team members from IDN (Indonesia):"));
        let leader_at = text.find("Team Leader:").unwrap();
        let guest_at = text.find("Guest:").unwrap();
        assert!(leader_at < guest_at);
        assert!(text.contains("- @deputy | DEPUTY"));

        assert_eq!(router.handle(Some("guest"), "info XYZ").as_deref(), Some("Team XYZ not found!"));
        assert_eq!(router.handle(Some("guest"), "info").as_deref(), Some(INFO_USAGE));
    }

    #[test]
    fn test_info_team_ends_with_contestants() {
        let text = make_router().handle(Some("guest"), "info IDN").unwrap();
        let expected_tail = concat!(
            "  \n  \nContestants:  \n",
            "  \n- `IDN1` | Adi Putra",
            "  \n- `IDN2` (online) | Dewi Lestari",
        );
        assert!(text.ends_with(expected_tail), "unexpected listing: {:?}", text);
        assert!(!text.contains("SGP1"));
    }

    #[test]
    fn test_info_committee_lists_chair_first() {
        let text = make_router().handle(Some("guest"), "info sc").unwrap();
        let chair_at = text.find("@chair_sc (Chair)").unwrap();
        let plain_at = text.find("@plain_sc |").unwrap();
        assert!(chair_at < plain_at);
        assert!(text.contains("Invited HSC:"));
    }
}
