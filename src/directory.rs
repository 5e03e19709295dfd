//! Team and member roster.
//!
//! Loaded once at startup from a JSON file:
//!
//! ```json
//! {
//!   "teams":   [{ "code": "IDN", "name": "Indonesia" }],
//!   "members": [{ "user_id": "budi", "team_code": "IDN", "name": "Budi", "role": "Team Leader" }],
//!   "contestants": [{ "code": "IDN1", "first_name": "Adi", "last_name": "Putra" }]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::config::roles;
use crate::core::error::AppResult;
use crate::poll::Voter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub code: String,
    pub name: String,
    /// Hidden teams still authorize their members but are not listed by `info`
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Chat account name, without the leading `@`
    pub user_id: String,
    pub team_code: String,
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub chair: bool,
}

/// A contestant; the code starts with the team code (`IDN1`, `IDN2`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contestant {
    pub code: String,
    pub first_name: String,
    pub last_name: String,
    /// Competing remotely
    #[serde(default)]
    pub online: bool,
}

#[derive(Debug, Default, Deserialize)]
struct Roster {
    #[serde(default)]
    teams: Vec<Team>,
    #[serde(default)]
    members: Vec<Member>,
    #[serde(default)]
    contestants: Vec<Contestant>,
}

/// A known sender, resolved against its team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub user_id: String,
    pub name: String,
    pub role: String,
    pub team_code: String,
    pub country: String,
}

impl Caller {
    /// Any technical-committee role ("HTC", "ITC Member", ...).
    pub fn is_tc(&self) -> bool {
        self.role.contains(roles::TC_MARKER)
    }

    pub fn is_leader(&self) -> bool {
        self.is_tc() || self.role == roles::TEAM_LEADER || self.role == roles::DEPUTY_LEADER
    }

    /// The host team never votes, whatever its members' roles.
    pub fn votes_for_team(&self) -> bool {
        self.team_code != roles::NON_VOTING_TEAM
    }

    pub fn voter(&self) -> Voter {
        Voter {
            team_code: self.team_code.clone(),
            country: self.country.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Directory {
    teams: Vec<Team>,
    members: Vec<Member>,
    contestants: Vec<Contestant>,
}

impl Directory {
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let directory = Self::from_json(&raw)?;
        log::info!(
            "Directory loaded from {}: {} teams, {} members, {} contestants",
            path.display(),
            directory.teams.len(),
            directory.members.len(),
            directory.contestants.len()
        );
        Ok(directory)
    }

    pub fn from_json(raw: &str) -> AppResult<Self> {
        let roster: Roster = serde_json::from_str(raw)?;
        Ok(Self::from_parts(roster.teams, roster.members).with_contestants(roster.contestants))
    }

    pub fn from_parts(teams: Vec<Team>, members: Vec<Member>) -> Self {
        Self {
            teams,
            members,
            contestants: Vec::new(),
        }
    }

    pub fn with_contestants(mut self, contestants: Vec<Contestant>) -> Self {
        self.contestants = contestants;
        self
    }

    /// Resolve a sender. `None` when the account or its team is not in the roster.
    pub fn lookup(&self, user_id: &str) -> Option<Caller> {
        let wanted = normalize_user_id(user_id);
        let member = self
            .members
            .iter()
            .find(|member| normalize_user_id(&member.user_id) == wanted)?;
        let team = self.teams.iter().find(|team| team.code == member.team_code)?;

        Some(Caller {
            user_id: member.user_id.clone(),
            name: member.name.clone(),
            role: member.role.clone(),
            team_code: member.team_code.clone(),
            country: team.name.clone(),
        })
    }

    /// A team listed by `info`. Hidden teams are not returned.
    pub fn visible_team(&self, code: &str) -> Option<&Team> {
        self.teams.iter().find(|team| team.visible && team.code == code)
    }

    /// Visible teams that take part in votes.
    pub fn voting_teams(&self) -> impl Iterator<Item = &Team> + '_ {
        self.teams
            .iter()
            .filter(|team| team.visible && team.code != roles::NON_VOTING_TEAM)
    }

    pub fn team_members<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Member> + 'a {
        self.members.iter().filter(move |member| member.team_code == code)
    }

    /// Contestants whose code starts with the team code, in roster order.
    pub fn team_contestants<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a Contestant> + 'a {
        self.contestants
            .iter()
            .filter(move |contestant| contestant.code.starts_with(code))
    }

    /// Holders of `role`, chairs first, otherwise in roster order.
    pub fn committee_members(&self, role: &str) -> Vec<&Member> {
        let mut found: Vec<&Member> = self.members.iter().filter(|member| member.role == role).collect();
        found.sort_by_key(|member| !member.chair);
        found
    }
}

fn normalize_user_id(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix('@').unwrap_or(trimmed).to_lowercase()
}
