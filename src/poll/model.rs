//! Poll and vote records.
//!
//! Choices are an ordered list in memory; the `/`-joined form only exists at
//! the storage boundary (see [`Choices::to_stored`] / [`Choices::from_stored`]).

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

use super::error::PollError;

/// Separator between choice labels in the stored and typed forms.
pub const CHOICE_SEPARATOR: &str = "/";

/// Ordered, distinct option labels of a poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Choices(Vec<String>);

impl Choices {
    /// Parse admin input such as `yes/no/abstain`.
    ///
    /// Whitespace in each label is normalized the way vote arguments are
    /// (trimmed, inner runs collapsed to one space), so `yes / no` stores
    /// `yes` and `no`. Empty labels and duplicates are rejected.
    pub fn parse(raw: &str) -> Result<Self, PollError> {
        let labels: Vec<String> = raw.split(CHOICE_SEPARATOR).map(normalize_label).collect();

        if labels.iter().any(|label| label.is_empty()) {
            return Err(PollError::FormatError);
        }
        for (idx, label) in labels.iter().enumerate() {
            if labels[..idx].contains(label) {
                return Err(PollError::FormatError);
            }
        }

        Ok(Self(labels))
    }

    /// Rebuild from the stored column without re-validating.
    pub fn from_stored(raw: &str) -> Self {
        Self(raw.split(CHOICE_SEPARATOR).map(str::to_string).collect())
    }

    pub fn to_stored(&self) -> String {
        self.0.join(CHOICE_SEPARATOR)
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, candidate: &str) -> bool {
        self.0.iter().any(|choice| choice == candidate)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// `"  in   favour "` → `"in favour"`
fn normalize_label(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Renders as `` `a`/`b`/`c` `` for chat replies.
impl fmt::Display for Choices {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, choice) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(CHOICE_SEPARATOR)?;
            }
            write!(f, "`{}`", choice)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Choices {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A poll row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poll {
    pub poll_id: i64,
    pub question: String,
    pub choices: Choices,
    pub active: bool,
}

/// One team's vote on one poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vote {
    pub poll_id: i64,
    pub team_code: String,
    pub choice: String,
    /// Individual account that cast the vote
    pub voted_by: String,
    /// Time of the last insert or overwrite (UTC)
    pub voted_at: NaiveDateTime,
}

/// Whoever casts a vote, as resolved by the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voter {
    pub team_code: String,
    pub country: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_order() {
        let choices = Choices::parse("a/b/c").unwrap();
        assert_eq!(choices.as_slice(), ["a", "b", "c"]);
    }

    #[test]
    fn test_parse_keeps_spaces_inside_labels() {
        let choices = Choices::parse("in favour/against").unwrap();
        assert!(choices.contains("in favour"));
        assert!(!choices.contains("in"));
    }

    #[test]
    fn test_parse_rejects_empty_label() {
        assert!(matches!(Choices::parse("yes//no"), Err(PollError::FormatError)));
        assert!(matches!(Choices::parse(""), Err(PollError::FormatError)));
        assert!(matches!(Choices::parse("yes/ "), Err(PollError::FormatError)));
    }

    #[test]
    fn test_parse_normalizes_whitespace() {
        let choices = Choices::parse(" yes / no /in   favour").unwrap();
        assert_eq!(choices.as_slice(), ["yes", "no", "in favour"]);
        assert_eq!(choices.to_stored(), "yes/no/in favour");
    }

    #[test]
    fn test_parse_rejects_duplicates_after_normalizing() {
        assert!(matches!(Choices::parse("yes / yes"), Err(PollError::FormatError)));
    }

    #[test]
    fn test_parse_rejects_duplicates() {
        assert!(matches!(Choices::parse("yes/no/yes"), Err(PollError::FormatError)));
    }

    #[test]
    fn test_contains_is_case_sensitive() {
        let choices = Choices::parse("Yes/No").unwrap();
        assert!(choices.contains("Yes"));
        assert!(!choices.contains("yes"));
    }

    #[test]
    fn test_stored_form() {
        let choices = Choices::parse("red/blue").unwrap();
        assert_eq!(choices.to_stored(), "red/blue");
        assert_eq!(Choices::from_stored("red/blue"), choices);
    }

    #[test]
    fn test_display_wraps_in_code_spans() {
        let choices = Choices::parse("yes/no/abstain").unwrap();
        assert_eq!(choices.to_string(), "`yes`/`no`/`abstain`");
    }
}
