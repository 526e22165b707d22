//! Tournament error types.

use super::models::{MatchId, MatchStatus, TournamentId, TournamentStatus, UserId};
use thiserror::Error;

/// Closed set of failure kinds callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    InvalidCapacity,
    InsufficientParticipants,
    DuplicateParticipant,
    TournamentFull,
    ParticipantNotFound,
    MatchNotFound,
    UnknownWinner,
    InvalidTransition,
    InvalidInput,
}

/// Tournament errors
///
/// Every variant is a caller error. A failed operation leaves the
/// tournament exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TournamentError {
    #[error("Tournament not found: {0}")]
    NotFound(TournamentId),

    #[error("Tournament {tournament_id} cannot {operation} while {status}")]
    InvalidState {
        tournament_id: TournamentId,
        operation: &'static str,
        status: TournamentStatus,
    },

    #[error("Invalid capacity: requested {requested} teams, minimum is {minimum}")]
    InvalidCapacity { requested: usize, minimum: usize },

    #[error("Insufficient participants in tournament {tournament_id}: need {needed}, have {current}")]
    InsufficientParticipants {
        tournament_id: TournamentId,
        needed: usize,
        current: usize,
    },

    #[error("User {user_id} is already registered in tournament {tournament_id}")]
    DuplicateParticipant {
        tournament_id: TournamentId,
        user_id: UserId,
    },

    #[error("Tournament {tournament_id} is full ({max_teams} teams)")]
    TournamentFull {
        tournament_id: TournamentId,
        max_teams: usize,
    },

    #[error("User {user_id} is not registered in tournament {tournament_id}")]
    ParticipantNotFound {
        tournament_id: TournamentId,
        user_id: UserId,
    },

    #[error("Match {match_id} not found in tournament {tournament_id}")]
    MatchNotFound {
        tournament_id: TournamentId,
        match_id: MatchId,
    },

    #[error("User {winner_id} is not a participant of match {match_id} in tournament {tournament_id}")]
    UnknownWinner {
        tournament_id: TournamentId,
        match_id: MatchId,
        winner_id: UserId,
    },

    #[error("Match {match_id} in tournament {tournament_id} cannot move from {from} to {to}")]
    InvalidTransition {
        tournament_id: TournamentId,
        match_id: MatchId,
        from: MatchStatus,
        to: MatchStatus,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl TournamentError {
    /// Failure kind, independent of the context carried by the variant
    pub fn kind(&self) -> ErrorKind {
        match self {
            TournamentError::NotFound(_) => ErrorKind::NotFound,
            TournamentError::InvalidState { .. } => ErrorKind::InvalidState,
            TournamentError::InvalidCapacity { .. } => ErrorKind::InvalidCapacity,
            TournamentError::InsufficientParticipants { .. } => {
                ErrorKind::InsufficientParticipants
            }
            TournamentError::DuplicateParticipant { .. } => ErrorKind::DuplicateParticipant,
            TournamentError::TournamentFull { .. } => ErrorKind::TournamentFull,
            TournamentError::ParticipantNotFound { .. } => ErrorKind::ParticipantNotFound,
            TournamentError::MatchNotFound { .. } => ErrorKind::MatchNotFound,
            TournamentError::UnknownWinner { .. } => ErrorKind::UnknownWinner,
            TournamentError::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            TournamentError::InvalidInput { .. } => ErrorKind::InvalidInput,
        }
    }

    /// Get a message suitable for end users
    ///
    /// Tournament UUIDs are dropped; match and user ids stay since the
    /// caller supplied them.
    pub fn client_message(&self) -> String {
        match self {
            TournamentError::NotFound(_) => "Tournament not found".to_string(),
            TournamentError::InvalidState {
                operation, status, ..
            } => format!("Cannot {operation}: tournament is {status}"),
            TournamentError::InsufficientParticipants {
                needed, current, ..
            } => format!("Need at least {needed} participants, only {current} registered"),
            TournamentError::DuplicateParticipant { user_id, .. } => {
                format!("{user_id} is already registered")
            }
            TournamentError::TournamentFull { max_teams, .. } => {
                format!("Tournament is full ({max_teams} teams)")
            }
            TournamentError::ParticipantNotFound { user_id, .. } => {
                format!("{user_id} is not registered")
            }
            TournamentError::MatchNotFound { match_id, .. } => {
                format!("Match {match_id} not found")
            }
            TournamentError::UnknownWinner {
                match_id,
                winner_id,
                ..
            } => format!("{winner_id} did not play in {match_id}"),
            TournamentError::InvalidTransition {
                match_id, from, to, ..
            } => format!("Match {match_id} is {from} and cannot become {to}"),
            TournamentError::InvalidCapacity { .. } | TournamentError::InvalidInput { .. } => {
                self.to_string()
            }
        }
    }
}

/// Result type for tournament operations
pub type TournamentResult<T> = Result<T, TournamentError>;
