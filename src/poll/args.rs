//! Argument parsing for the `poll` admin command.

use super::error::PollError;
use super::model::Choices;

/// A parsed `poll` sub-command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminCommand {
    /// Bare `poll`: show usage
    Usage,
    New { question: String, choices: Choices },
    Update { poll_id: i64, question: String, choices: Choices },
    List,
    Activate { poll_id: i64 },
    Deactivate,
}

impl AdminCommand {
    /// Parse the words following `poll`.
    ///
    /// The sub-command word is case-insensitive. Free text for `new` and
    /// `update` must come as two double-quoted segments: the question, then
    /// the `/`-separated choices.
    pub fn parse(args: &[String]) -> Result<Self, PollError> {
        let Some(sub) = args.first() else {
            return Ok(AdminCommand::Usage);
        };

        match sub.to_lowercase().as_str() {
            "new" => {
                let (question, choices) = parse_definition(&args[1..])?;
                Ok(AdminCommand::New { question, choices })
            }
            "update" => {
                let raw_id = args.get(1).ok_or(PollError::FormatError)?;
                let poll_id = parse_poll_id(raw_id)?;
                let (question, choices) = parse_definition(&args[2..])?;
                Ok(AdminCommand::Update {
                    poll_id,
                    question,
                    choices,
                })
            }
            "list" => Ok(AdminCommand::List),
            "activate" => {
                let raw_id = args.get(1).ok_or(PollError::FormatError)?;
                Ok(AdminCommand::Activate {
                    poll_id: parse_poll_id(raw_id)?,
                })
            }
            "deactivate" => Ok(AdminCommand::Deactivate),
            _ => Err(PollError::UnknownSubcommand(sub.clone())),
        }
    }
}

/// Text between double quotes, in order.
///
/// The input is split on `"` and every odd piece is kept, so
/// `"Q" "a/b"` gives `["Q", "a/b"]` and unquoted text is ignored. An
/// unterminated final quote still yields its tail.
pub fn quoted_segments(input: &str) -> Vec<String> {
    input
        .split('"')
        .skip(1)
        .step_by(2)
        .map(str::to_string)
        .collect()
}

fn parse_poll_id(raw: &str) -> Result<i64, PollError> {
    raw.parse::<i64>()
        .map_err(|_| PollError::NotAnInteger(raw.to_string()))
}

/// `"<question>" "<choice/choice/...>"` → question and choices.
fn parse_definition(args: &[String]) -> Result<(String, Choices), PollError> {
    let segments = quoted_segments(&args.join(" "));
    let [question, choices] = segments.as_slice() else {
        return Err(PollError::FormatError);
    };
    if question.trim().is_empty() {
        return Err(PollError::FormatError);
    }

    Ok((question.clone(), Choices::parse(choices)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn test_quoted_segments_takes_odd_pieces() {
        assert_eq!(quoted_segments(r#""Is this a question?" "yes/no/abstain""#), [
            "Is this a question?",
            "yes/no/abstain"
        ]);
        assert_eq!(quoted_segments(r#"junk "a" more "b" tail"#), ["a", "b"]);
        assert!(quoted_segments("no quotes at all").is_empty());
    }

    #[test]
    fn test_quoted_segments_unterminated_quote() {
        assert_eq!(quoted_segments(r#""a" "b"#), ["a", "b"]);
    }

    #[test]
    fn test_parse_usage_when_no_args() {
        assert_eq!(AdminCommand::parse(&[]).unwrap(), AdminCommand::Usage);
    }

    #[test]
    fn test_parse_new() {
        let cmd = AdminCommand::parse(&words(r#"new "Pick one" "red/blue""#)).unwrap();
        assert_eq!(cmd, AdminCommand::New {
            question: "Pick one".to_string(),
            choices: Choices::parse("red/blue").unwrap(),
        });
    }

    #[test]
    fn test_parse_subcommand_is_case_insensitive() {
        assert_eq!(AdminCommand::parse(&words("LIST")).unwrap(), AdminCommand::List);
        assert_eq!(AdminCommand::parse(&words("Deactivate")).unwrap(), AdminCommand::Deactivate);
    }

    #[test]
    fn test_parse_new_requires_exactly_two_segments() {
        assert!(matches!(
            AdminCommand::parse(&words(r#"new "only question""#)),
            Err(PollError::FormatError)
        ));
        assert!(matches!(
            AdminCommand::parse(&words(r#"new "q" "a/b" "extra""#)),
            Err(PollError::FormatError)
        ));
        assert!(matches!(
            AdminCommand::parse(&words("new question a/b")),
            Err(PollError::FormatError)
        ));
    }

    #[test]
    fn test_parse_new_rejects_bad_choices() {
        assert!(matches!(
            AdminCommand::parse(&words(r#"new "q" "a//b""#)),
            Err(PollError::FormatError)
        ));
        assert!(matches!(
            AdminCommand::parse(&words(r#"new "" "a/b""#)),
            Err(PollError::FormatError)
        ));
    }

    #[test]
    fn test_parse_update() {
        let cmd = AdminCommand::parse(&words(r#"update 3 "What is 1+1?" "one/two/yes""#)).unwrap();
        assert_eq!(cmd, AdminCommand::Update {
            poll_id: 3,
            question: "What is 1+1?".to_string(),
            choices: Choices::parse("one/two/yes").unwrap(),
        });
    }

    #[test]
    fn test_parse_update_errors() {
        assert!(matches!(AdminCommand::parse(&words("update")), Err(PollError::FormatError)));
        match AdminCommand::parse(&words(r#"update abc "q" "a/b""#)) {
            Err(PollError::NotAnInteger(raw)) => assert_eq!(raw, "abc"),
            other => panic!("expected NotAnInteger, got {:?}", other),
        }
        assert!(matches!(AdminCommand::parse(&words("update 1")), Err(PollError::FormatError)));
    }

    #[test]
    fn test_parse_activate() {
        assert_eq!(
            AdminCommand::parse(&words("activate 10")).unwrap(),
            AdminCommand::Activate { poll_id: 10 }
        );
        assert!(matches!(AdminCommand::parse(&words("activate")), Err(PollError::FormatError)));
        assert!(matches!(
            AdminCommand::parse(&words("activate ten")),
            Err(PollError::NotAnInteger(_))
        ));
    }

    #[test]
    fn test_parse_unknown_subcommand() {
        match AdminCommand::parse(&words("close 1")) {
            Err(PollError::UnknownSubcommand(sub)) => assert_eq!(sub, "close"),
            other => panic!("expected UnknownSubcommand, got {:?}", other),
        }
    }
}
