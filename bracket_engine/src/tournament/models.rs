//! Tournament data models for single-elimination brackets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{convert::Infallible, fmt, str::FromStr};
use uuid::Uuid;

/// Tournament ID type
pub type TournamentId = Uuid;

/// User identifier supplied verbatim by the calling layer
pub type UserId = String;

/// Group (community/server) identifier supplied by the calling layer
pub type GroupId = String;

/// Opaque score data attached to a resolved match
pub type ScorePayload = serde_json::Value;

/// Tournament lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting registrations
    Pending,
    /// Bracket generated, matches being played
    InProgress,
    /// Final match resolved, champion decided
    Completed,
    /// Cancelled by an organizer or admin
    Cancelled,
}

impl TournamentStatus {
    /// Whether no further transition is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the tournament still shows up in active listings
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }
}

impl fmt::Display for TournamentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TournamentStatus::Pending => write!(f, "pending"),
            TournamentStatus::InProgress => write!(f, "in_progress"),
            TournamentStatus::Completed => write!(f, "completed"),
            TournamentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Match status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Pending,
    InProgress,
    Finished,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Pending => write!(f, "pending"),
            MatchStatus::InProgress => write!(f, "in_progress"),
            MatchStatus::Finished => write!(f, "finished"),
        }
    }
}

/// Game mode tag
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameMode {
    Solo,
    Duo,
    #[default]
    Squad,
    Custom(String),
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::Solo => write!(f, "solo"),
            GameMode::Duo => write!(f, "duo"),
            GameMode::Squad => write!(f, "squad"),
            GameMode::Custom(tag) => write!(f, "{tag}"),
        }
    }
}

impl FromStr for GameMode {
    type Err = Infallible;

    /// Unknown tags are kept as [`GameMode::Custom`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Ok(match tag.to_lowercase().as_str() {
            "solo" => GameMode::Solo,
            "duo" => GameMode::Duo,
            "squad" => GameMode::Squad,
            _ => GameMode::Custom(tag.to_string()),
        })
    }
}

/// Per-participant match record within one tournament
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStats {
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
}

/// Registered team/player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    /// User ID (unique within a tournament)
    pub user_id: UserId,
    /// Display name
    pub display_name: String,
    /// Team name
    pub team_name: String,
    /// Seed (1-indexed registration order)
    pub seed: usize,
    /// Registration timestamp
    pub registered_at: DateTime<Utc>,
    /// Played-match record
    pub stats: ParticipantStats,
}

/// Error returned when a match identifier cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid match id '{0}', expected match_<round>_<position>")]
pub struct ParseMatchIdError(pub String);

/// Match identifier, unique within a tournament.
///
/// Rendered as `match_<round>_<position>` with a 1-indexed position in
/// bracket order. Ordering follows the bracket: round first, then position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MatchId {
    round: u32,
    position: u32,
}

impl MatchId {
    pub fn new(round: u32, position: u32) -> Self {
        Self { round, position }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn position(&self) -> u32 {
        self.position
    }
}

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match_{}_{}", self.round, self.position)
    }
}

impl FromStr for MatchId {
    type Err = ParseMatchIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseMatchIdError(s.to_string());
        let rest = s.trim().strip_prefix("match_").ok_or_else(invalid)?;
        let (round, position) = rest.split_once('_').ok_or_else(invalid)?;
        let round: u32 = round.parse().map_err(|_| invalid())?;
        let position: u32 = position.parse().map_err(|_| invalid())?;
        if round == 0 || position == 0 {
            return Err(invalid());
        }
        Ok(Self { round, position })
    }
}

impl From<MatchId> for String {
    fn from(id: MatchId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for MatchId {
    type Error = ParseMatchIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A single bracket match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    /// Match ID
    pub id: MatchId,
    /// Round number (1-indexed)
    pub round: u32,
    /// Participant in slot 1
    pub slot1: UserId,
    /// Participant in slot 2 (`None` for a bye)
    pub slot2: Option<UserId>,
    /// Current status
    pub status: MatchStatus,
    /// Winner, set once finished
    pub winner: Option<UserId>,
    /// Reported score data
    pub score: Option<ScorePayload>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create a playable match between two participants
    pub(crate) fn pending(id: MatchId, slot1: UserId, slot2: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            round: id.round(),
            slot1,
            slot2: Some(slot2),
            status: MatchStatus::Pending,
            winner: None,
            score: None,
            created_at: now,
            started_at: None,
            finished_at: None,
        }
    }

    /// Create a bye: finished on creation with the sole participant as winner
    pub(crate) fn bye(id: MatchId, slot1: UserId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            round: id.round(),
            winner: Some(slot1.clone()),
            slot1,
            slot2: None,
            status: MatchStatus::Finished,
            score: None,
            created_at: now,
            started_at: None,
            finished_at: Some(now),
        }
    }

    pub fn is_bye(&self) -> bool {
        self.slot2.is_none()
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    /// Whether `user_id` occupies one of the two slots
    pub fn has_participant(&self, user_id: &str) -> bool {
        self.slot1 == user_id || self.slot2.as_deref() == Some(user_id)
    }

    /// The slot opposite to `user_id`, if any
    pub fn opponent_of(&self, user_id: &str) -> Option<&UserId> {
        if self.slot1 == user_id {
            self.slot2.as_ref()
        } else if self.slot2.as_deref() == Some(user_id) {
            Some(&self.slot1)
        } else {
            None
        }
    }
}

/// Outcome of a round check after a result is recorded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advancement {
    /// Round still has unfinished matches
    RoundPending { round: u32, remaining: usize },
    /// Next round opened with these matches
    NextRound { round: u32, matches: Vec<MatchId> },
    /// Single winner left
    Completed { champion: UserId },
}

/// Result of starting a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartOutcome {
    pub tournament_id: TournamentId,
    pub round: u32,
    pub total_rounds: u32,
    pub matches: Vec<MatchId>,
    /// Participants advanced without playing in round 1
    pub byes: Vec<UserId>,
}

/// Result of reporting a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOutcome {
    pub tournament_id: TournamentId,
    pub match_id: MatchId,
    pub winner_id: UserId,
    pub advancement: Advancement,
}

/// Result of cancelling a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelOutcome {
    pub tournament_id: TournamentId,
    pub previous_status: TournamentStatus,
    pub reason: String,
}

/// Short label for a bracket slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotLabel {
    pub user_id: UserId,
    pub team_name: String,
}

/// Read-only view of one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSummary {
    pub match_id: MatchId,
    pub slot1: SlotLabel,
    pub slot2: Option<SlotLabel>,
    pub status: MatchStatus,
    pub winner: Option<UserId>,
    pub is_bye: bool,
}

/// Read-only view of one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub round: u32,
    pub complete: bool,
    pub matches: Vec<MatchSummary>,
}

/// Read-only projection of the whole bracket for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSummary {
    pub tournament_id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub participant_count: usize,
    pub current_round: u32,
    pub total_rounds: u32,
    pub champion: Option<UserId>,
    pub rounds: Vec<RoundSummary>,
}

/// Listing entry for a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentOverview {
    pub id: TournamentId,
    pub group_id: GroupId,
    pub name: String,
    pub game_mode: GameMode,
    pub status: TournamentStatus,
    pub participant_count: usize,
    pub max_teams: usize,
    pub current_round: u32,
    pub rules: Vec<String>,
    pub prize_pool: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Detailed statistics for a tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentStats {
    pub tournament_id: TournamentId,
    pub name: String,
    pub status: TournamentStatus,
    pub rules: Vec<String>,
    pub prize_pool: Vec<String>,
    pub participant_count: usize,
    pub matches_total: usize,
    pub matches_finished: usize,
    pub matches_in_progress: usize,
    pub matches_pending: usize,
    pub byes: usize,
    pub current_round: u32,
    pub total_rounds: u32,
    pub champion: Option<UserId>,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub participants: Vec<Participant>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_id_display_and_parse() {
        let id = MatchId::new(2, 3);
        assert_eq!(id.to_string(), "match_2_3");
        assert_eq!("match_2_3".parse::<MatchId>(), Ok(id));
        assert_eq!(" match_2_3 ".parse::<MatchId>(), Ok(id));
    }

    #[test]
    fn test_match_id_rejects_garbage() {
        assert!("match_0_1".parse::<MatchId>().is_err());
        assert!("match_1".parse::<MatchId>().is_err());
        assert!("round_1_1".parse::<MatchId>().is_err());
        assert!("match_a_b".parse::<MatchId>().is_err());
    }

    #[test]
    fn test_match_id_orders_by_round_then_position() {
        let mut ids = vec![MatchId::new(2, 1), MatchId::new(1, 2), MatchId::new(1, 1)];
        ids.sort();
        assert_eq!(
            ids,
            vec![MatchId::new(1, 1), MatchId::new(1, 2), MatchId::new(2, 1)]
        );
    }

    #[test]
    fn test_match_id_serializes_as_string() {
        let json = serde_json::to_string(&MatchId::new(1, 4)).unwrap();
        assert_eq!(json, "\"match_1_4\"");
        let back: MatchId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MatchId::new(1, 4));
    }

    #[test]
    fn test_game_mode_parsing() {
        assert_eq!("Squad".parse::<GameMode>(), Ok(GameMode::Squad));
        assert_eq!("duo".parse::<GameMode>(), Ok(GameMode::Duo));
        assert_eq!(
            "tdm".parse::<GameMode>(),
            Ok(GameMode::Custom("tdm".to_string()))
        );
        assert_eq!(GameMode::Custom("tdm".to_string()).to_string(), "tdm");
    }

    #[test]
    fn test_bye_is_finished_with_sole_winner() {
        let m = Match::bye(MatchId::new(1, 3), "u5".to_string(), Utc::now());
        assert!(m.is_bye());
        assert!(m.is_finished());
        assert_eq!(m.winner.as_deref(), Some("u5"));
        assert_eq!(m.round, 1);
    }

    #[test]
    fn test_opponent_of() {
        let m = Match::pending(
            MatchId::new(1, 1),
            "a".to_string(),
            "b".to_string(),
            Utc::now(),
        );
        assert_eq!(m.opponent_of("a").map(String::as_str), Some("b"));
        assert_eq!(m.opponent_of("b").map(String::as_str), Some("a"));
        assert_eq!(m.opponent_of("c"), None);
        assert!(m.has_participant("b"));
        assert!(!m.has_participant("c"));
    }

    #[test]
    fn test_status_terminal_and_active() {
        assert!(TournamentStatus::Completed.is_terminal());
        assert!(TournamentStatus::Cancelled.is_terminal());
        assert!(!TournamentStatus::InProgress.is_terminal());
        assert!(TournamentStatus::Pending.is_active());
        assert!(!TournamentStatus::Cancelled.is_active());
    }
}
