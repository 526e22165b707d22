//! Tournament aggregate: participants and matches behind one consistency boundary.
//!
//! All mutators are crate-private; outside callers go through
//! [`TournamentManager`](super::TournamentManager), which serializes writes
//! and commits only successful operations.

use super::{
    advancer, bracket,
    errors::{TournamentError, TournamentResult},
    ledger::MatchLedger,
    models::{
        Advancement, BracketSummary, CancelOutcome, GameMode, GroupId, Match, MatchId,
        MatchStatus, MatchSummary, Participant, ReportOutcome, RoundSummary, ScorePayload,
        SlotLabel, StartOutcome, TournamentId, TournamentOverview, TournamentStats,
        TournamentStatus, UserId,
    },
    registry::{NewParticipant, ParticipantRegistry},
};
use crate::config::{EngineConfig, MIN_BRACKET_PARTICIPANTS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reason recorded when a cancellation does not give one
pub const DEFAULT_CANCEL_REASON: &str = "Cancelled by organizer";

/// Rules every tournament carries unless its creator supplies its own.
/// A `Game mode: ...` line is put in front of them.
pub const DEFAULT_RULES: &[&str] = &[
    "Format: single elimination, a lost match ends your run",
    "Time limit: 60 minutes per match",
    "Scoring: kills plus placement",
    "No cheats, exploits or toxic behaviour",
    "Screenshots of the result screen are required",
    "Disputes are settled by the organizers",
    "Prizes are awarded as available",
];

/// Tournament creation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTournament {
    pub group_id: GroupId,
    pub organizer_id: UserId,
    pub name: String,
    pub game_mode: GameMode,
    pub max_teams: usize,
    /// Replaces the default rules when set and not blank
    pub rules: Option<Vec<String>>,
    /// Prize descriptions in award order, empty when nothing is offered
    pub prize_pool: Vec<String>,
}

impl NewTournament {
    pub fn new(
        group_id: impl Into<GroupId>,
        organizer_id: impl Into<UserId>,
        name: impl Into<String>,
        game_mode: GameMode,
        max_teams: usize,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            organizer_id: organizer_id.into(),
            name: name.into(),
            game_mode,
            max_teams,
            rules: None,
            prize_pool: Vec::new(),
        }
    }

    pub fn with_rules<I, S>(mut self, rules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rules = Some(rules.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_prize(mut self, prize: impl Into<String>) -> Self {
        self.prize_pool.push(prize.into());
        self
    }
}

/// Tournament aggregate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    id: TournamentId,
    group_id: GroupId,
    organizer_id: UserId,
    name: String,
    game_mode: GameMode,
    max_teams: usize,
    rules: Vec<String>,
    prize_pool: Vec<String>,
    status: TournamentStatus,
    /// 0 while pending, >= 1 once started
    current_round: u32,
    total_rounds: u32,
    champion: Option<UserId>,
    cancel_reason: Option<String>,
    created_at: DateTime<Utc>,
    started_at: Option<DateTime<Utc>>,
    finished_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    participants: ParticipantRegistry,
    matches: MatchLedger,
}

impl Tournament {
    /// Create a pending tournament
    ///
    /// Capacity below the configured minimum fails with `InvalidCapacity`;
    /// capacity above the cap is clamped.
    pub(crate) fn create(
        request: NewTournament,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> TournamentResult<Self> {
        let minimum = config.min_participants.max(MIN_BRACKET_PARTICIPANTS);
        if request.max_teams < minimum {
            return Err(TournamentError::InvalidCapacity {
                requested: request.max_teams,
                minimum,
            });
        }

        let group_id = required("group id", request.group_id)?;
        let organizer_id = required("organizer id", request.organizer_id)?;
        let name = required("tournament name", request.name.trim().to_string())?;

        let rules = match request.rules.map(non_blank) {
            Some(rules) if !rules.is_empty() => rules,
            _ => default_rules(&request.game_mode),
        };
        let prize_pool = non_blank(request.prize_pool);

        let id = Uuid::new_v4();
        Ok(Self {
            id,
            group_id,
            organizer_id,
            name,
            game_mode: request.game_mode,
            max_teams: request.max_teams.min(config.max_teams_cap),
            rules,
            prize_pool,
            status: TournamentStatus::Pending,
            current_round: 0,
            total_rounds: 0,
            champion: None,
            cancel_reason: None,
            created_at: now,
            started_at: None,
            finished_at: None,
            cancelled_at: None,
            participants: ParticipantRegistry::new(id),
            matches: MatchLedger::new(id),
        })
    }

    pub fn id(&self) -> TournamentId {
        self.id
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn organizer_id(&self) -> &str {
        &self.organizer_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn game_mode(&self) -> &GameMode {
        &self.game_mode
    }

    pub fn max_teams(&self) -> usize {
        self.max_teams
    }

    pub fn rules(&self) -> &[String] {
        &self.rules
    }

    pub fn prize_pool(&self) -> &[String] {
        &self.prize_pool
    }

    pub fn status(&self) -> TournamentStatus {
        self.status
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn champion(&self) -> Option<&str> {
        self.champion.as_deref()
    }

    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    pub fn participants(&self) -> &ParticipantRegistry {
        &self.participants
    }

    pub fn matches(&self) -> &MatchLedger {
        &self.matches
    }

    pub(crate) fn register(
        &mut self,
        entry: NewParticipant,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> TournamentResult<Participant> {
        self.ensure_status(TournamentStatus::Pending, "register participants")?;
        self.participants
            .register(entry, self.max_teams, config, now)
            .cloned()
    }

    /// Build round 1 and move to `InProgress`
    pub(crate) fn start(
        &mut self,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> TournamentResult<StartOutcome> {
        self.ensure_status(TournamentStatus::Pending, "start")?;

        let needed = config.min_participants.max(MIN_BRACKET_PARTICIPANTS);
        if self.participants.len() < needed {
            return Err(TournamentError::InsufficientParticipants {
                tournament_id: self.id,
                needed,
                current: self.participants.len(),
            });
        }

        let round_one = bracket::build(self.id, self.participants.list(), now)?;
        let matches = round_one.iter().map(|m| m.id).collect();
        let byes = round_one
            .iter()
            .filter(|m| m.is_bye())
            .map(|m| m.slot1.clone())
            .collect();

        self.matches.open_round(round_one);
        self.total_rounds = bracket::total_rounds(self.participants.len());
        self.current_round = 1;
        self.status = TournamentStatus::InProgress;
        self.started_at = Some(now);

        Ok(StartOutcome {
            tournament_id: self.id,
            round: 1,
            total_rounds: self.total_rounds,
            matches,
            byes,
        })
    }

    /// Announce a current-round match as being played
    pub(crate) fn start_match(
        &mut self,
        match_id: &MatchId,
        now: DateTime<Utc>,
    ) -> TournamentResult<Match> {
        self.ensure_status(TournamentStatus::InProgress, "start a match")?;
        self.ensure_current_round(match_id, MatchStatus::InProgress)?;
        self.matches.mark_in_progress(match_id, now).cloned()
    }

    /// Record a winner and advance the bracket when the round completes
    pub(crate) fn report_result(
        &mut self,
        match_id: &MatchId,
        winner_id: &str,
        score: Option<ScorePayload>,
        now: DateTime<Utc>,
    ) -> TournamentResult<ReportOutcome> {
        self.ensure_status(TournamentStatus::InProgress, "report a result")?;
        let status = self.ensure_current_round(match_id, MatchStatus::Finished)?;

        if status == MatchStatus::Pending {
            let m = self.matches.get(match_id)?;
            if !m.has_participant(winner_id) {
                return Err(TournamentError::UnknownWinner {
                    tournament_id: self.id,
                    match_id: *match_id,
                    winner_id: winner_id.to_string(),
                });
            }
            self.matches.mark_in_progress(match_id, now)?;
        }

        let finished = self
            .matches
            .resolve(match_id, winner_id, score, now)?
            .clone();
        self.participants.record_result(&finished);

        let advancement = advancer::advance(&mut self.matches, self.current_round, now);
        match &advancement {
            Advancement::NextRound { round, .. } => {
                self.current_round = *round;
            }
            Advancement::Completed { champion } => {
                self.champion = Some(champion.clone());
                self.status = TournamentStatus::Completed;
                self.finished_at = Some(now);
            }
            Advancement::RoundPending { .. } => {}
        }

        Ok(ReportOutcome {
            tournament_id: self.id,
            match_id: *match_id,
            winner_id: winner_id.to_string(),
            advancement,
        })
    }

    /// Cancel from `Pending` or `InProgress`
    pub(crate) fn cancel(
        &mut self,
        reason: &str,
        now: DateTime<Utc>,
    ) -> TournamentResult<CancelOutcome> {
        if self.status.is_terminal() {
            return Err(TournamentError::InvalidState {
                tournament_id: self.id,
                operation: "cancel",
                status: self.status,
            });
        }

        let reason = match reason.trim() {
            "" => DEFAULT_CANCEL_REASON.to_string(),
            given => given.to_string(),
        };

        let previous_status = self.status;
        self.status = TournamentStatus::Cancelled;
        self.cancel_reason = Some(reason.clone());
        self.cancelled_at = Some(now);

        Ok(CancelOutcome {
            tournament_id: self.id,
            previous_status,
            reason,
        })
    }

    /// Administrative override: make a finished current-round match reportable again
    pub(crate) fn reopen_match(&mut self, match_id: &MatchId) -> TournamentResult<Match> {
        self.ensure_status(TournamentStatus::InProgress, "reopen a match")?;
        self.ensure_current_round(match_id, MatchStatus::Pending)?;

        let previous = self.matches.reopen(match_id)?;
        self.participants.revert_result(&previous);
        self.matches.get(match_id).cloned()
    }

    /// Read-only projection of every round for display
    pub fn bracket_summary(&self) -> BracketSummary {
        let label = |user_id: &str| SlotLabel {
            user_id: user_id.to_string(),
            team_name: self.participants.team_name_of(user_id),
        };

        let rounds = (1..=self.matches.round_count())
            .map(|round| RoundSummary {
                round,
                complete: advancer::is_round_complete(&self.matches, round),
                matches: self
                    .matches
                    .list_by_round(round)
                    .into_iter()
                    .map(|m| MatchSummary {
                        match_id: m.id,
                        slot1: label(&m.slot1),
                        slot2: m.slot2.as_deref().map(label),
                        status: m.status,
                        winner: m.winner.clone(),
                        is_bye: m.is_bye(),
                    })
                    .collect(),
            })
            .collect();

        BracketSummary {
            tournament_id: self.id,
            name: self.name.clone(),
            status: self.status,
            participant_count: self.participants.len(),
            current_round: self.current_round,
            total_rounds: self.total_rounds,
            champion: self.champion.clone(),
            rounds,
        }
    }

    pub fn stats(&self) -> TournamentStats {
        TournamentStats {
            tournament_id: self.id,
            name: self.name.clone(),
            status: self.status,
            rules: self.rules.clone(),
            prize_pool: self.prize_pool.clone(),
            participant_count: self.participants.len(),
            matches_total: self.matches.len(),
            matches_finished: self.matches.count_by_status(MatchStatus::Finished),
            matches_in_progress: self.matches.count_by_status(MatchStatus::InProgress),
            matches_pending: self.matches.count_by_status(MatchStatus::Pending),
            byes: self.matches.iter().filter(|m| m.is_bye()).count(),
            current_round: self.current_round,
            total_rounds: self.total_rounds,
            champion: self.champion.clone(),
            created_at: self.created_at,
            started_at: self.started_at,
            finished_at: self.finished_at,
            participants: self.participants.list().to_vec(),
        }
    }

    pub fn overview(&self) -> TournamentOverview {
        TournamentOverview {
            id: self.id,
            group_id: self.group_id.clone(),
            name: self.name.clone(),
            game_mode: self.game_mode.clone(),
            status: self.status,
            participant_count: self.participants.len(),
            max_teams: self.max_teams,
            current_round: self.current_round,
            rules: self.rules.clone(),
            prize_pool: self.prize_pool.clone(),
            created_at: self.created_at,
        }
    }

    fn ensure_status(
        &self,
        expected: TournamentStatus,
        operation: &'static str,
    ) -> TournamentResult<()> {
        if self.status != expected {
            return Err(TournamentError::InvalidState {
                tournament_id: self.id,
                operation,
                status: self.status,
            });
        }
        Ok(())
    }

    /// Returns the match's status if it belongs to the current round
    fn ensure_current_round(
        &self,
        match_id: &MatchId,
        target: MatchStatus,
    ) -> TournamentResult<MatchStatus> {
        let m = self.matches.get(match_id)?;
        if m.round != self.current_round {
            return Err(TournamentError::InvalidTransition {
                tournament_id: self.id,
                match_id: *match_id,
                from: m.status,
                to: target,
            });
        }
        Ok(m.status)
    }
}

/// Identifiers are kept as given; only blank values are refused
fn required(field: &'static str, value: String) -> TournamentResult<String> {
    if value.trim().is_empty() {
        return Err(TournamentError::InvalidInput {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(value)
}

fn non_blank(entries: Vec<String>) -> Vec<String> {
    entries
        .into_iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn default_rules(game_mode: &GameMode) -> Vec<String> {
    std::iter::once(format!("Game mode: {game_mode}"))
        .chain(DEFAULT_RULES.iter().map(|rule| rule.to_string()))
        .collect()
}
