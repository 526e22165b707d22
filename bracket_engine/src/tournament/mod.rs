//! Single-elimination tournaments for chat groups.
//!
//! This module provides:
//! - Participant registration with capacity and duplicate checks
//! - Bracket construction with byes for non-power-of-two fields
//! - A forward-only match state machine
//! - Round advancement and champion detection
//! - A [`TournamentManager`] serializing writes per tournament
//!
//! ## Example
//!
//! ```
//! use bracket_engine::{
//!     EngineConfig,
//!     tournament::{Advancement, GameMode, MatchId, NewParticipant, TournamentManager},
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = TournamentManager::new(EngineConfig::default());
//! let id = manager
//!     .create_tournament("guild-1", "organizer", "Friday Cup", GameMode::Duo, 8)
//!     .await?;
//!
//! manager.register_participant(id, NewParticipant::new("alice", "Alice")).await?;
//! manager.register_participant(id, NewParticipant::new("bob", "Bob")).await?;
//! manager.start_tournament(id).await?;
//!
//! let outcome = manager
//!     .report_result(id, MatchId::new(1, 1), "bob", None)
//!     .await?;
//! assert_eq!(outcome.advancement, Advancement::Completed { champion: "bob".into() });
//! # Ok(())
//! # }
//! ```

pub mod advancer;
pub mod aggregate;
pub mod bracket;
pub mod errors;
pub mod ledger;
pub mod manager;
pub mod models;
pub mod registry;
pub mod store;

pub use aggregate::{DEFAULT_CANCEL_REASON, DEFAULT_RULES, NewTournament, Tournament};
pub use errors::{ErrorKind, TournamentError, TournamentResult};
pub use ledger::MatchLedger;
pub use manager::TournamentManager;
pub use models::{
    Advancement, BracketSummary, CancelOutcome, GameMode, GroupId, Match, MatchId, MatchStatus,
    MatchSummary, ParseMatchIdError, Participant, ParticipantStats, ReportOutcome, RoundSummary,
    ScorePayload, SlotLabel, StartOutcome, TournamentId, TournamentOverview, TournamentStats,
    TournamentStatus, UserId,
};
pub use registry::{NewParticipant, ParticipantRegistry};
pub use store::{MemorySnapshotSink, SnapshotError, SnapshotSink};
