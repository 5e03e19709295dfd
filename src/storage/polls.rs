//! Poll store: durable poll definitions and per-team votes.
//!
//! Owns two invariants: at most one poll is active, and at most one vote
//! exists per (poll, team). Both are enforced with single atomic statements
//! (and backed by the schema), never by read-then-write in the caller.

use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, OptionalExtension, TransactionBehavior};

use super::db::{get_connection, DbPool};
use crate::core::error::{AppError, AppResult};
use crate::poll::{Choices, Poll, PollError, Vote};

const POLL_COLUMNS: &str = "poll_id, question, choices, active";
const VOTE_COLUMNS: &str = "poll_id, team_code, choice, voted_by, voted_at";

fn parse_poll(row: &rusqlite::Row<'_>) -> rusqlite::Result<Poll> {
    let choices: String = row.get(2)?;
    Ok(Poll {
        poll_id: row.get(0)?,
        question: row.get(1)?,
        choices: Choices::from_stored(&choices),
        active: row.get::<_, i64>(3)? != 0,
    })
}

fn parse_vote(row: &rusqlite::Row<'_>) -> rusqlite::Result<Vote> {
    Ok(Vote {
        poll_id: row.get(0)?,
        team_code: row.get(1)?,
        choice: row.get(2)?,
        voted_by: row.get(3)?,
        voted_at: row.get(4)?,
    })
}

/// Handle to the poll tables, shared by the controller and the display server.
#[derive(Clone)]
pub struct PollStore {
    pool: Arc<DbPool>,
}

impl PollStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Insert a new, inactive poll and return its id.
    pub fn create_poll(&self, question: &str, choices: &Choices) -> AppResult<i64> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO polls (question, choices, active) VALUES (?1, ?2, 0)",
            params![question, choices.to_stored()],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Rewrite question and choices of an existing poll.
    ///
    /// Returns `false` (and changes nothing) when no poll has that id.
    pub fn update_poll(&self, poll_id: i64, question: &str, choices: &Choices) -> AppResult<bool> {
        let conn = get_connection(&self.pool)?;
        let changed = conn.execute(
            "UPDATE polls SET question = ?1, choices = ?2 WHERE poll_id = ?3",
            params![question, choices.to_stored(), poll_id],
        )?;
        Ok(changed > 0)
    }

    /// All polls in id order.
    pub fn list_polls(&self) -> AppResult<Vec<Poll>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn.prepare(&format!("SELECT {} FROM polls ORDER BY poll_id", POLL_COLUMNS))?;
        let rows = stmt.query_map([], parse_poll)?;

        let mut polls = Vec::new();
        for row in rows {
            polls.push(row?);
        }
        Ok(polls)
    }

    pub fn get_poll(&self, poll_id: i64) -> AppResult<Option<Poll>> {
        let conn = get_connection(&self.pool)?;
        let poll = conn
            .query_row(
                &format!("SELECT {} FROM polls WHERE poll_id = ?1", POLL_COLUMNS),
                params![poll_id],
                parse_poll,
            )
            .optional()?;
        Ok(poll)
    }

    pub fn get_active_poll(&self) -> AppResult<Option<Poll>> {
        let conn = get_connection(&self.pool)?;
        let poll = conn
            .query_row(
                &format!("SELECT {} FROM polls WHERE active = 1", POLL_COLUMNS),
                [],
                parse_poll,
            )
            .optional()?;
        Ok(poll)
    }

    /// Make `poll_id` the active poll.
    ///
    /// The flip is one conditional `UPDATE` inside an immediate (write-locked)
    /// transaction, so two concurrent activations cannot both succeed. When
    /// nothing changed, the same transaction decides between
    /// [`PollError::NotFound`] and [`PollError::AlreadyActiveConflict`].
    pub fn activate(&self, poll_id: i64) -> Result<Poll, PollError> {
        let mut conn = get_connection(&self.pool)?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE polls SET active = 1
             WHERE poll_id = ?1
               AND NOT EXISTS (SELECT 1 FROM polls WHERE active = 1)",
            params![poll_id],
        )?;

        if changed == 0 {
            let exists: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM polls WHERE poll_id = ?1)",
                params![poll_id],
                |row| row.get(0),
            )?;
            if !exists {
                return Err(PollError::NotFound(poll_id));
            }

            let active_id: Option<i64> = tx
                .query_row("SELECT poll_id FROM polls WHERE active = 1", [], |row| row.get(0))
                .optional()?;
            return match active_id {
                Some(active_id) => Err(PollError::AlreadyActiveConflict(active_id)),
                None => Err(PollError::StorageUnavailable(AppError::Validation(format!(
                    "activation of poll {} changed no rows",
                    poll_id
                )))),
            };
        }

        let poll = tx.query_row(
            &format!("SELECT {} FROM polls WHERE poll_id = ?1", POLL_COLUMNS),
            params![poll_id],
            parse_poll,
        )?;
        tx.commit()?;

        Ok(poll)
    }

    /// Clear the active flag on every poll. Returns how many polls were active.
    pub fn deactivate_all(&self) -> AppResult<usize> {
        let conn = get_connection(&self.pool)?;
        let changed = conn.execute("UPDATE polls SET active = 0 WHERE active = 1", [])?;
        Ok(changed)
    }

    /// Insert or overwrite the vote of `team_code` on `poll_id`.
    ///
    /// Choice membership is the caller's job; this only guarantees one row
    /// per (poll, team) with the latest choice, caster and time.
    pub fn cast_vote(&self, poll_id: i64, team_code: &str, choice: &str, voted_by: &str) -> AppResult<()> {
        let conn = get_connection(&self.pool)?;
        conn.execute(
            "INSERT INTO votes (poll_id, team_code, choice, voted_by, voted_at)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(poll_id, team_code) DO UPDATE SET
               choice = excluded.choice,
               voted_by = excluded.voted_by,
               voted_at = excluded.voted_at",
            params![poll_id, team_code, choice, voted_by, Utc::now().naive_utc()],
        )?;
        Ok(())
    }

    /// Votes on a poll, ordered by team code.
    pub fn votes_for(&self, poll_id: i64) -> AppResult<Vec<Vote>> {
        let conn = get_connection(&self.pool)?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM votes WHERE poll_id = ?1 ORDER BY team_code",
            VOTE_COLUMNS
        ))?;
        let rows = stmt.query_map(params![poll_id], parse_vote)?;

        let mut votes = Vec::new();
        for row in rows {
            votes.push(row?);
        }
        Ok(votes)
    }

    pub fn get_vote(&self, poll_id: i64, team_code: &str) -> AppResult<Option<Vote>> {
        let conn = get_connection(&self.pool)?;
        let vote = conn
            .query_row(
                &format!("SELECT {} FROM votes WHERE poll_id = ?1 AND team_code = ?2", VOTE_COLUMNS),
                params![poll_id, team_code],
                parse_vote,
            )
            .optional()?;
        Ok(vote)
    }
}
