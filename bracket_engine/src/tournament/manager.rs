//! Tournament manager: the single entry point for tournament operations.

use super::{
    aggregate::{NewTournament, Tournament},
    errors::{TournamentError, TournamentResult},
    models::{
        Advancement, BracketSummary, CancelOutcome, GameMode, Match, MatchId, Participant,
        ReportOutcome, ScorePayload, StartOutcome, TournamentId, TournamentOverview,
        TournamentStats,
    },
    registry::NewParticipant,
    store::{SnapshotSink, SnapshotWriter},
};
use crate::config::EngineConfig;
use chrono::{DateTime, Utc};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Tournament manager for all tournaments of all groups
///
/// Writes to one tournament are serialized by that tournament's lock;
/// different tournaments proceed independently.
#[derive(Clone)]
pub struct TournamentManager {
    /// Engine limits
    config: Arc<EngineConfig>,

    /// Tournament aggregates by ID
    tournaments: Arc<RwLock<HashMap<TournamentId, Arc<RwLock<Tournament>>>>>,

    /// Optional persistence, fed in the background
    snapshots: Option<SnapshotWriter>,
}

impl TournamentManager {
    /// Create a manager without persistence
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
            tournaments: Arc::new(RwLock::new(HashMap::new())),
            snapshots: None,
        }
    }

    /// Save a snapshot to `sink` after every committed mutation
    ///
    /// Saves run on a background task, so this must be called within a
    /// Tokio runtime. Operations return without waiting for them.
    pub fn with_snapshot_sink(mut self, sink: Arc<dyn SnapshotSink>) -> Self {
        self.snapshots = Some(SnapshotWriter::spawn(sink));
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a pending tournament with the default rules and no prizes
    ///
    /// # Errors
    ///
    /// `InvalidCapacity` if `max_teams` is below the configured minimum,
    /// `InvalidInput` for blank identifiers or name.
    pub async fn create_tournament(
        &self,
        group_id: &str,
        organizer_id: &str,
        name: &str,
        game_mode: GameMode,
        max_teams: usize,
    ) -> TournamentResult<TournamentId> {
        self.create_tournament_with(NewTournament::new(
            group_id,
            organizer_id,
            name,
            game_mode,
            max_teams,
        ))
        .await
    }

    /// Create a pending tournament from a full request, including rules and prizes
    pub async fn create_tournament_with(
        &self,
        request: NewTournament,
    ) -> TournamentResult<TournamentId> {
        let tournament = Tournament::create(request, &self.config, Utc::now())?;
        let tournament_id = tournament.id();

        log::info!(
            "Created tournament {} '{}' in group {} ({} teams max, {} prizes)",
            tournament_id,
            tournament.name(),
            tournament.group_id(),
            tournament.max_teams(),
            tournament.prize_pool().len()
        );

        self.queue_snapshot(&tournament);

        let mut tournaments = self.tournaments.write().await;
        tournaments.insert(tournament_id, Arc::new(RwLock::new(tournament)));
        drop(tournaments);

        Ok(tournament_id)
    }

    /// Register a participant in a pending tournament
    pub async fn register_participant(
        &self,
        tournament_id: TournamentId,
        entry: NewParticipant,
    ) -> TournamentResult<Participant> {
        let participant = self
            .mutate(tournament_id, |t, config, now| t.register(entry, config, now))
            .await?;

        log::debug!(
            "Tournament {}: registered {} as seed {}",
            tournament_id,
            participant.user_id,
            participant.seed
        );

        Ok(participant)
    }

    /// Build round 1 and start the tournament
    pub async fn start_tournament(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<StartOutcome> {
        let outcome = self
            .mutate(tournament_id, |t, config, now| t.start(config, now))
            .await?;

        log::info!(
            "Started tournament {}: {} round 1 matches, {} byes, {} rounds total",
            tournament_id,
            outcome.matches.len(),
            outcome.byes.len(),
            outcome.total_rounds
        );

        Ok(outcome)
    }

    /// Mark a current-round match as being played
    pub async fn start_match(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> TournamentResult<Match> {
        let m = self
            .mutate(tournament_id, |t, _, now| t.start_match(&match_id, now))
            .await?;

        log::debug!("Tournament {}: {} in progress", tournament_id, match_id);

        Ok(m)
    }

    /// Record the winner of a current-round match
    ///
    /// Advances the bracket when the round completes and crowns the champion
    /// after the final.
    pub async fn report_result(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
        winner_id: &str,
        score: Option<ScorePayload>,
    ) -> TournamentResult<ReportOutcome> {
        let outcome = self
            .mutate(tournament_id, |t, _, now| {
                t.report_result(&match_id, winner_id, score, now)
            })
            .await?;

        log::debug!(
            "Tournament {}: {} won by {}",
            tournament_id,
            match_id,
            outcome.winner_id
        );

        match &outcome.advancement {
            Advancement::NextRound { round, matches } => {
                log::info!(
                    "Tournament {} advanced to round {} ({} matches)",
                    tournament_id,
                    round,
                    matches.len()
                );
            }
            Advancement::Completed { champion } => {
                log::info!("Tournament {} completed, champion {}", tournament_id, champion);
            }
            Advancement::RoundPending { .. } => {}
        }

        Ok(outcome)
    }

    /// Cancel a pending or running tournament
    ///
    /// A missing or blank reason is recorded as
    /// [`DEFAULT_CANCEL_REASON`](super::aggregate::DEFAULT_CANCEL_REASON).
    pub async fn cancel_tournament(
        &self,
        tournament_id: TournamentId,
        reason: Option<&str>,
    ) -> TournamentResult<CancelOutcome> {
        let outcome = self
            .mutate(tournament_id, |t, _, now| {
                t.cancel(reason.unwrap_or_default(), now)
            })
            .await?;

        log::info!(
            "Cancelled tournament {} (was {}): {}",
            tournament_id,
            outcome.previous_status,
            outcome.reason
        );

        Ok(outcome)
    }

    /// Administrative override: make a finished current-round match reportable again
    pub async fn reopen_match(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> TournamentResult<Match> {
        let m = self
            .mutate(tournament_id, |t, _, _| t.reopen_match(&match_id))
            .await?;

        log::info!("Tournament {}: reopened {}", tournament_id, match_id);

        Ok(m)
    }

    /// Read-only projection of every round
    pub async fn get_bracket_summary(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<BracketSummary> {
        self.read(tournament_id, Tournament::bracket_summary).await
    }

    /// Consistent copy of the whole aggregate
    pub async fn get_tournament(&self, tournament_id: TournamentId) -> TournamentResult<Tournament> {
        self.read(tournament_id, Tournament::clone).await
    }

    pub async fn get_match(
        &self,
        tournament_id: TournamentId,
        match_id: MatchId,
    ) -> TournamentResult<Match> {
        self.read(tournament_id, |t| t.matches().get(&match_id).cloned())
            .await?
    }

    /// Matches of one round in bracket order
    pub async fn list_round(
        &self,
        tournament_id: TournamentId,
        round: u32,
    ) -> TournamentResult<Vec<Match>> {
        self.read(tournament_id, |t| {
            t.matches()
                .list_by_round(round)
                .into_iter()
                .cloned()
                .collect()
        })
        .await
    }

    pub async fn get_participant(
        &self,
        tournament_id: TournamentId,
        user_id: &str,
    ) -> TournamentResult<Participant> {
        self.read(tournament_id, |t| t.participants().get(user_id).cloned())
            .await?
    }

    /// Participants in seed order
    pub async fn list_participants(
        &self,
        tournament_id: TournamentId,
    ) -> TournamentResult<Vec<Participant>> {
        self.read(tournament_id, |t| t.participants().list().to_vec())
            .await
    }

    /// Pending and running tournaments of a group, newest first
    pub async fn list_active(&self, group_id: &str) -> Vec<TournamentOverview> {
        let entries: Vec<_> = self.tournaments.read().await.values().cloned().collect();

        let mut active = Vec::new();
        for entry in entries {
            let t = entry.read().await;
            if t.group_id() == group_id && t.status().is_active() {
                active.push(t.overview());
            }
        }

        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active
    }

    pub async fn get_stats(&self, tournament_id: TournamentId) -> TournamentResult<TournamentStats> {
        self.read(tournament_id, Tournament::stats).await
    }

    /// Number of tournaments held, in any status
    pub async fn tournament_count(&self) -> usize {
        self.tournaments.read().await.len()
    }

    /// Wait until every snapshot queued so far has been handed to the sink
    ///
    /// Returns at once when no sink is configured.
    pub async fn flush_snapshots(&self) {
        if let Some(writer) = &self.snapshots {
            writer.flush().await;
        }
    }

    async fn entry(&self, tournament_id: TournamentId) -> TournamentResult<Arc<RwLock<Tournament>>> {
        self.tournaments
            .read()
            .await
            .get(&tournament_id)
            .cloned()
            .ok_or(TournamentError::NotFound(tournament_id))
    }

    async fn read<T>(
        &self,
        tournament_id: TournamentId,
        view: impl FnOnce(&Tournament) -> T,
    ) -> TournamentResult<T> {
        let entry = self.entry(tournament_id).await?;
        let tournament = entry.read().await;
        Ok(view(&tournament))
    }

    /// Apply `op` to a staged copy and commit it only on success
    ///
    /// The snapshot is queued before the write lock is released, so
    /// snapshots of one tournament reach the sink in commit order.
    async fn mutate<T>(
        &self,
        tournament_id: TournamentId,
        op: impl FnOnce(&mut Tournament, &EngineConfig, DateTime<Utc>) -> TournamentResult<T>,
    ) -> TournamentResult<T> {
        let entry = self.entry(tournament_id).await?;
        let mut current = entry.write().await;

        let mut staged = current.clone();
        let outcome = op(&mut staged, &self.config, Utc::now())?;
        *current = staged;
        self.queue_snapshot(&current);

        Ok(outcome)
    }

    fn queue_snapshot(&self, tournament: &Tournament) {
        if let Some(writer) = &self.snapshots {
            writer.submit(tournament.clone());
        }
    }
}
