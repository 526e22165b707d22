//! # Bracket Engine
//!
//! An in-memory orchestration core for single-elimination tournaments run
//! inside chat groups.
//!
//! A tournament moves through `Pending -> InProgress -> Completed`, or to
//! `Cancelled` from either non-terminal state. Matches move forward only,
//! `Pending -> InProgress -> Finished`; the single exception is the explicit
//! administrative reopen.
//!
//! ## Core Modules
//!
//! - [`tournament`]: registry, bracket builder, match ledger, round advancer
//!   and the [`TournamentManager`] façade
//! - [`config`]: engine limits loaded from the environment
//!
//! The engine performs no I/O of its own. Persistence is an optional
//! [`SnapshotSink`] fed from a background task after each committed
//! mutation; operations never wait for it.

/// Engine limits and environment loading.
pub mod config;
pub use config::{ConfigError, EngineConfig};

/// Tournament lifecycle, brackets and matches.
pub mod tournament;
pub use tournament::{
    ErrorKind, SnapshotSink, Tournament, TournamentError, TournamentManager, TournamentResult,
};
