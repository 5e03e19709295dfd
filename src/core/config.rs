use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Bot token
/// Read from BOT_TOKEN or TELOXIDE_TOKEN environment variable
pub static BOT_TOKEN: Lazy<String> = Lazy::new(|| {
    env::var("BOT_TOKEN")
        .or_else(|_| env::var("TELOXIDE_TOKEN"))
        .unwrap_or_else(|_| String::new())
});

/// Database file path
/// Read from DATABASE_PATH environment variable
/// Default: polls.sqlite
pub static DATABASE_PATH: Lazy<String> =
    Lazy::new(|| env::var("DATABASE_PATH").unwrap_or_else(|_| "polls.sqlite".to_string()));

/// Log file path
/// Read from LOG_FILE_PATH environment variable
/// Default: ioibot.log
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE_PATH").unwrap_or_else(|_| "ioibot.log".to_string()));

/// Team/member roster consumed by the directory
/// Read from DIRECTORY_PATH environment variable
/// Default: directory.json
pub static DIRECTORY_PATH: Lazy<String> =
    Lazy::new(|| env::var("DIRECTORY_PATH").unwrap_or_else(|_| "directory.json".to_string()));

/// Port of the poll display server
/// Read from DISPLAY_PORT environment variable; unset or unparsable disables the server
pub static DISPLAY_PORT: Lazy<Option<u16>> = Lazy::new(|| {
    env::var("DISPLAY_PORT").ok().and_then(|value| {
        let trimmed = value.trim();
        trimmed.parse::<u16>().ok()
    })
});

/// Storage configuration
pub mod storage {
    use super::Duration;

    /// Maximum number of pooled SQLite connections
    pub const POOL_MAX_SIZE: u32 = 8;

    /// How long a connection waits on a locked database (in seconds)
    pub const BUSY_TIMEOUT_SECS: u64 = 5;

    /// Busy timeout duration
    pub fn busy_timeout() -> Duration {
        Duration::from_secs(BUSY_TIMEOUT_SECS)
    }
}

/// Roles and teams as they appear in the roster
pub mod roles {
    /// Marker contained in every technical-committee role ("HTC", "ITC Member", ...)
    pub const TC_MARKER: &str = "TC";

    pub const TEAM_LEADER: &str = "Team Leader";
    pub const DEPUTY_LEADER: &str = "Deputy Leader";

    /// Host organisation's team code; its members never vote
    pub const NON_VOTING_TEAM: &str = "IOI";

    pub const IC_ROLES: &[&str] = &["President", "Chair of IOI / IC Member", "IC Member", "Secretary", "Treasurer"];
    pub const SC_ROLES: &[&str] = &["ISC Member", "HSC", "Invited HSC"];
    pub const TC_ROLES: &[&str] = &["ITC Member", "HTC", "Invited HTC"];

    /// Roles listed by `info <TEAM>`, in display order
    pub const TEAM_ROLES: &[&str] = &[
        TEAM_LEADER,
        DEPUTY_LEADER,
        "Guest",
        "Remote Adjunct (not on site)",
        "Invited Observer/Guest",
    ];
}
