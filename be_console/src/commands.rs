//! Parsing of console input lines into commands.

use bracket_engine::tournament::{GameMode, MatchId, ScorePayload, TournamentId};
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Required argument absent.
    #[error("Missing arguments. Usage: {usage}")]
    MissingArgument { usage: &'static str },

    /// Not a positive number.
    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    /// Neither a session index nor a tournament UUID.
    #[error("Invalid tournament '{0}'. Use the number shown by 'list' (e.g., '#1') or a full id")]
    InvalidTournament(String),

    /// Malformed match id.
    #[error("Invalid match '{0}'. Match ids look like 'match_1_2'")]
    InvalidMatchId(String),

    /// Score payload is not JSON.
    #[error("Invalid score payload: {0}")]
    InvalidScore(String),

    /// Unrecognized command.
    #[error("Unrecognized command '{0}'. Type 'help' to see available commands")]
    UnrecognizedCommand(String),
}

/// Tournament reference typed at the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TournamentRef {
    /// 1-based index in creation order for this session
    Index(usize),
    Id(TournamentId),
}

impl FromStr for TournamentRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if let Ok(index) = digits.parse::<usize>()
            && index > 0
        {
            return Ok(Self::Index(index));
        }
        TournamentId::parse_str(s)
            .map(Self::Id)
            .map_err(|_| ParseError::InvalidTournament(s.to_string()))
    }
}

/// A console command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create {
        max_teams: usize,
        game_mode: GameMode,
        name: String,
        prize_pool: Vec<String>,
    },
    Register {
        tournament: TournamentRef,
        user_id: String,
        display_name: String,
        team_name: Option<String>,
    },
    Start(TournamentRef),
    BeginMatch {
        tournament: TournamentRef,
        match_id: MatchId,
    },
    Report {
        tournament: TournamentRef,
        match_id: MatchId,
        winner_id: String,
        score: Option<ScorePayload>,
    },
    Cancel {
        tournament: TournamentRef,
        reason: Option<String>,
    },
    Reopen {
        tournament: TournamentRef,
        match_id: MatchId,
    },
    Bracket(TournamentRef),
    Players(TournamentRef),
    Stats(TournamentRef),
    List,
    Help,
    Quit,
}

const CREATE_USAGE: &str = "create MAX_TEAMS MODE NAME... [| PRIZE; PRIZE...]";
const REGISTER_USAGE: &str = "register TOURNAMENT USER DISPLAY_NAME [TEAM...]";
const BEGIN_USAGE: &str = "begin TOURNAMENT MATCH";
const REPORT_USAGE: &str = "report TOURNAMENT MATCH WINNER [SCORE_JSON]";
const REOPEN_USAGE: &str = "reopen TOURNAMENT MATCH";
const TOURNAMENT_USAGE: &str = "COMMAND TOURNAMENT";

/// Parse a console line into a [`Command`].
///
/// # Examples
///
/// ```
/// use be_console::commands::{Command, TournamentRef, parse_command};
///
/// assert_eq!(parse_command("list"), Ok(Command::List));
/// assert_eq!(parse_command("start #2"), Ok(Command::Start(TournamentRef::Index(2))));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();
    let parts: Vec<&str> = trimmed.split_ascii_whitespace().collect();

    match parts.first().map(|word| word.to_ascii_lowercase()).as_deref() {
        Some("list") => Ok(Command::List),
        Some("help") => Ok(Command::Help),
        Some("quit" | "exit") => Ok(Command::Quit),
        Some("create") => parse_create_command(&parts),
        Some("register") => parse_register_command(&parts),
        Some("start") => Ok(Command::Start(tournament_arg(&parts)?)),
        Some("begin") => {
            let (tournament, match_id) = tournament_and_match(&parts, BEGIN_USAGE)?;
            Ok(Command::BeginMatch {
                tournament,
                match_id,
            })
        }
        Some("report") => parse_report_command(&parts),
        Some("cancel") => Ok(Command::Cancel {
            tournament: tournament_arg(&parts)?,
            reason: rest(&parts, 2),
        }),
        Some("reopen") => {
            let (tournament, match_id) = tournament_and_match(&parts, REOPEN_USAGE)?;
            Ok(Command::Reopen {
                tournament,
                match_id,
            })
        }
        Some("bracket") => Ok(Command::Bracket(tournament_arg(&parts)?)),
        Some("players") => Ok(Command::Players(tournament_arg(&parts)?)),
        Some("stats") => Ok(Command::Stats(tournament_arg(&parts)?)),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse "create MAX_TEAMS MODE NAME... [| PRIZE; PRIZE...]"
fn parse_create_command(parts: &[&str]) -> Result<Command, ParseError> {
    let (Some(max_teams), Some(mode), Some(tail)) = (parts.get(1), parts.get(2), rest(parts, 3))
    else {
        return Err(ParseError::MissingArgument {
            usage: CREATE_USAGE,
        });
    };

    let (name, prizes) = tail.split_once('|').unwrap_or((tail.as_str(), ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(ParseError::MissingArgument {
            usage: CREATE_USAGE,
        });
    }
    let prize_pool = prizes
        .split(';')
        .map(str::trim)
        .filter(|prize| !prize.is_empty())
        .map(str::to_string)
        .collect();

    let max_teams = max_teams
        .parse::<usize>()
        .map_err(|_| ParseError::InvalidNumber(max_teams.to_string()))?;

    Ok(Command::Create {
        max_teams,
        game_mode: mode.parse().unwrap_or_default(),
        name: name.to_string(),
        prize_pool,
    })
}

/// Parse "register TOURNAMENT USER DISPLAY_NAME [TEAM...]"
fn parse_register_command(parts: &[&str]) -> Result<Command, ParseError> {
    let (Some(tournament), Some(user_id), Some(display_name)) =
        (parts.get(1), parts.get(2), parts.get(3))
    else {
        return Err(ParseError::MissingArgument {
            usage: REGISTER_USAGE,
        });
    };

    Ok(Command::Register {
        tournament: tournament.parse()?,
        user_id: user_id.to_string(),
        display_name: display_name.to_string(),
        team_name: rest(parts, 4),
    })
}

/// Parse "report TOURNAMENT MATCH WINNER [SCORE_JSON]"
fn parse_report_command(parts: &[&str]) -> Result<Command, ParseError> {
    let (tournament, match_id) = tournament_and_match(parts, REPORT_USAGE)?;
    let Some(winner_id) = parts.get(3) else {
        return Err(ParseError::MissingArgument {
            usage: REPORT_USAGE,
        });
    };

    let score = rest(parts, 4)
        .map(|raw| serde_json::from_str(&raw).map_err(|e| ParseError::InvalidScore(e.to_string())))
        .transpose()?;

    Ok(Command::Report {
        tournament,
        match_id,
        winner_id: winner_id.to_string(),
        score,
    })
}

fn tournament_arg(parts: &[&str]) -> Result<TournamentRef, ParseError> {
    parts
        .get(1)
        .ok_or(ParseError::MissingArgument {
            usage: TOURNAMENT_USAGE,
        })?
        .parse()
}

fn tournament_and_match(
    parts: &[&str],
    usage: &'static str,
) -> Result<(TournamentRef, MatchId), ParseError> {
    let (Some(tournament), Some(match_id)) = (parts.get(1), parts.get(2)) else {
        return Err(ParseError::MissingArgument { usage });
    };
    let match_id = match_id
        .parse()
        .map_err(|_| ParseError::InvalidMatchId(match_id.to_string()))?;
    Ok((tournament.parse()?, match_id))
}

/// Words from `from` onwards joined by single spaces
fn rest(parts: &[&str], from: usize) -> Option<String> {
    parts.get(from..).filter(|r| !r.is_empty()).map(|r| r.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    // === Single-word command tests ===

    #[test]
    fn test_parse_list_help_quit() {
        assert_eq!(parse_command("list"), Ok(Command::List));
        assert_eq!(parse_command("HELP"), Ok(Command::Help));
        assert_eq!(parse_command("quit"), Ok(Command::Quit));
        assert_eq!(parse_command("exit"), Ok(Command::Quit));
    }

    // === Tournament references ===

    #[test]
    fn test_tournament_ref_index_and_uuid() {
        assert_eq!("#3".parse(), Ok(TournamentRef::Index(3)));
        assert_eq!("3".parse(), Ok(TournamentRef::Index(3)));

        let id = uuid::Uuid::new_v4();
        assert_eq!(id.to_string().parse(), Ok(TournamentRef::Id(id)));
    }

    #[test]
    fn test_tournament_ref_rejects_zero_and_garbage() {
        assert!(matches!(
            "#0".parse::<TournamentRef>(),
            Err(ParseError::InvalidTournament(_))
        ));
        assert!(matches!(
            "cup".parse::<TournamentRef>(),
            Err(ParseError::InvalidTournament(_))
        ));
    }

    // === Multi-word commands ===

    #[test]
    fn test_parse_create() {
        let result = parse_command("create 8 duo Friday Night Cup");
        assert_eq!(
            result,
            Ok(Command::Create {
                max_teams: 8,
                game_mode: GameMode::Duo,
                name: "Friday Night Cup".to_string(),
                prize_pool: Vec::new(),
            })
        );
    }

    #[test]
    fn test_parse_create_with_prizes() {
        let result = parse_command("create 16 squad Weekend Cup | 500 coins; VIP role ;");
        assert_eq!(
            result,
            Ok(Command::Create {
                max_teams: 16,
                game_mode: GameMode::Squad,
                name: "Weekend Cup".to_string(),
                prize_pool: vec!["500 coins".to_string(), "VIP role".to_string()],
            })
        );
        assert!(matches!(
            parse_command("create 8 duo | 500 coins"),
            Err(ParseError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_parse_create_custom_mode() {
        let result = parse_command("create 4 2v2-box Box Fight");
        assert!(matches!(
            result,
            Ok(Command::Create { game_mode: GameMode::Custom(ref tag), .. }) if tag == "2v2-box"
        ));
    }

    #[test]
    fn test_parse_create_missing_name() {
        assert!(matches!(
            parse_command("create 8 duo"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert_eq!(
            parse_command("create lots duo Cup"),
            Err(ParseError::InvalidNumber("lots".to_string()))
        );
    }

    #[test]
    fn test_parse_register_with_team() {
        let result = parse_command("register #1 u42 Alice Night Owls");
        assert_eq!(
            result,
            Ok(Command::Register {
                tournament: TournamentRef::Index(1),
                user_id: "u42".to_string(),
                display_name: "Alice".to_string(),
                team_name: Some("Night Owls".to_string()),
            })
        );
    }

    #[test]
    fn test_parse_register_without_team() {
        let result = parse_command("register 1 u42 Alice");
        assert!(matches!(
            result,
            Ok(Command::Register {
                team_name: None,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_report_with_score() {
        let result = parse_command(r#"report #1 match_1_2 u3 {"kills": 7, "placement": 1}"#);
        assert_eq!(
            result,
            Ok(Command::Report {
                tournament: TournamentRef::Index(1),
                match_id: MatchId::new(1, 2),
                winner_id: "u3".to_string(),
                score: Some(serde_json::json!({"kills": 7, "placement": 1})),
            })
        );
    }

    #[test]
    fn test_parse_report_errors() {
        assert!(matches!(
            parse_command("report #1 match_1_2"),
            Err(ParseError::MissingArgument { .. })
        ));
        assert!(matches!(
            parse_command("report #1 m12 u1"),
            Err(ParseError::InvalidMatchId(_))
        ));
        assert!(matches!(
            parse_command("report #1 match_1_1 u1 {not json"),
            Err(ParseError::InvalidScore(_))
        ));
    }

    #[test]
    fn test_parse_cancel_reason_optional() {
        assert_eq!(
            parse_command("cancel #2"),
            Ok(Command::Cancel {
                tournament: TournamentRef::Index(2),
                reason: None
            })
        );
        assert_eq!(
            parse_command("cancel #2 server maintenance"),
            Ok(Command::Cancel {
                tournament: TournamentRef::Index(2),
                reason: Some("server maintenance".to_string())
            })
        );
    }

    #[test]
    fn test_parse_begin_and_reopen() {
        assert_eq!(
            parse_command("begin #1 match_2_1"),
            Ok(Command::BeginMatch {
                tournament: TournamentRef::Index(1),
                match_id: MatchId::new(2, 1)
            })
        );
        assert_eq!(
            parse_command("reopen #1 match_1_1"),
            Ok(Command::Reopen {
                tournament: TournamentRef::Index(1),
                match_id: MatchId::new(1, 1)
            })
        );
    }

    // === Whitespace handling ===

    #[test]
    fn test_parse_with_surrounding_whitespace() {
        assert_eq!(
            parse_command("   bracket   #1  "),
            Ok(Command::Bracket(TournamentRef::Index(1)))
        );
    }

    // === Error handling ===

    #[test]
    fn test_unrecognized_command() {
        let result = parse_command("dance");
        assert_eq!(
            result,
            Err(ParseError::UnrecognizedCommand("dance".to_string()))
        );
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Type 'help' to see available commands")
        );
    }

    #[test]
    fn test_missing_tournament() {
        assert!(matches!(
            parse_command("stats"),
            Err(ParseError::MissingArgument { .. })
        ));
    }
}
