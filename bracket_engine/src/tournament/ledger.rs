//! Match ledger: every match of a tournament, its status and round membership.

use super::{
    errors::{TournamentError, TournamentResult},
    models::{Match, MatchId, MatchStatus, ScorePayload, TournamentId},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Match storage for one tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLedger {
    tournament_id: TournamentId,
    matches: HashMap<MatchId, Match>,
    /// Match IDs per round in bracket order; index 0 is round 1
    rounds: Vec<Vec<MatchId>>,
}

impl MatchLedger {
    pub fn new(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            matches: HashMap::new(),
            rounds: Vec::new(),
        }
    }

    /// Get a match by ID
    pub fn get(&self, match_id: &MatchId) -> TournamentResult<&Match> {
        self.matches
            .get(match_id)
            .ok_or(TournamentError::MatchNotFound {
                tournament_id: self.tournament_id,
                match_id: *match_id,
            })
    }

    /// Matches of a round in bracket order (empty for unknown rounds)
    pub fn list_by_round(&self, round: u32) -> Vec<&Match> {
        let Some(ids) = round
            .checked_sub(1)
            .and_then(|index| self.rounds.get(index as usize))
        else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| self.matches.get(id)).collect()
    }

    /// Number of rounds opened so far
    pub fn round_count(&self) -> u32 {
        self.rounds.len() as u32
    }

    /// All matches, round by round in bracket order
    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.rounds
            .iter()
            .flatten()
            .filter_map(|id| self.matches.get(id))
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn count_by_status(&self, status: MatchStatus) -> usize {
        self.matches.values().filter(|m| m.status == status).count()
    }

    /// Add a whole round at once
    pub(crate) fn open_round(&mut self, matches: Vec<Match>) {
        let ids = matches.iter().map(|m| m.id).collect();
        for m in matches {
            self.matches.insert(m.id, m);
        }
        self.rounds.push(ids);
    }

    /// `Pending` -> `InProgress`
    pub(crate) fn mark_in_progress(
        &mut self,
        match_id: &MatchId,
        now: DateTime<Utc>,
    ) -> TournamentResult<&Match> {
        let tournament_id = self.tournament_id;
        let m = self.get_mut(match_id)?;

        if m.status != MatchStatus::Pending {
            return Err(TournamentError::InvalidTransition {
                tournament_id,
                match_id: *match_id,
                from: m.status,
                to: MatchStatus::InProgress,
            });
        }

        m.status = MatchStatus::InProgress;
        m.started_at = Some(now);
        Ok(m)
    }

    /// `InProgress` -> `Finished`, recording winner and score
    ///
    /// The state machine is forward-only: a finished match fails with
    /// `InvalidTransition`, as does a pending one that was never started.
    pub(crate) fn resolve(
        &mut self,
        match_id: &MatchId,
        winner_id: &str,
        score: Option<ScorePayload>,
        now: DateTime<Utc>,
    ) -> TournamentResult<&Match> {
        let tournament_id = self.tournament_id;
        let m = self.get_mut(match_id)?;

        if m.status == MatchStatus::Finished {
            return Err(TournamentError::InvalidTransition {
                tournament_id,
                match_id: *match_id,
                from: m.status,
                to: MatchStatus::Finished,
            });
        }

        if !m.has_participant(winner_id) {
            return Err(TournamentError::UnknownWinner {
                tournament_id,
                match_id: *match_id,
                winner_id: winner_id.to_string(),
            });
        }

        if m.status != MatchStatus::InProgress {
            return Err(TournamentError::InvalidTransition {
                tournament_id,
                match_id: *match_id,
                from: m.status,
                to: MatchStatus::Finished,
            });
        }

        m.status = MatchStatus::Finished;
        m.winner = Some(winner_id.to_string());
        m.score = score;
        m.finished_at = Some(now);
        Ok(m)
    }

    /// Administrative override: `Finished` -> `Pending`
    ///
    /// Returns the match as it was before reopening. Byes cannot be reopened.
    pub(crate) fn reopen(&mut self, match_id: &MatchId) -> TournamentResult<Match> {
        let tournament_id = self.tournament_id;
        let m = self.get_mut(match_id)?;

        if m.status != MatchStatus::Finished || m.is_bye() {
            return Err(TournamentError::InvalidTransition {
                tournament_id,
                match_id: *match_id,
                from: m.status,
                to: MatchStatus::Pending,
            });
        }

        let previous = m.clone();
        m.status = MatchStatus::Pending;
        m.winner = None;
        m.score = None;
        m.started_at = None;
        m.finished_at = None;
        Ok(previous)
    }

    fn get_mut(&mut self, match_id: &MatchId) -> TournamentResult<&mut Match> {
        let tournament_id = self.tournament_id;
        self.matches
            .get_mut(match_id)
            .ok_or(TournamentError::MatchNotFound {
                tournament_id,
                match_id: *match_id,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::{bracket, errors::ErrorKind};
    use uuid::Uuid;

    fn ledger_with_round(entrants: &[&str]) -> MatchLedger {
        let mut ledger = MatchLedger::new(Uuid::new_v4());
        let entrants: Vec<String> = entrants.iter().map(|s| s.to_string()).collect();
        ledger.open_round(bracket::pair_round(1, &entrants, Utc::now()));
        ledger
    }

    #[test]
    fn test_get_unknown_match() {
        let ledger = ledger_with_round(&["a", "b"]);
        let err = ledger.get(&MatchId::new(3, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MatchNotFound);
    }

    #[test]
    fn test_list_by_round_is_in_bracket_order() {
        let ledger = ledger_with_round(&["a", "b", "c", "d", "e"]);
        let ids: Vec<_> = ledger.list_by_round(1).iter().map(|m| m.id).collect();
        assert_eq!(
            ids,
            vec![MatchId::new(1, 1), MatchId::new(1, 2), MatchId::new(1, 3)]
        );
        assert!(ledger.list_by_round(0).is_empty());
        assert!(ledger.list_by_round(2).is_empty());
    }

    #[test]
    fn test_mark_in_progress_only_from_pending() {
        let mut ledger = ledger_with_round(&["a", "b"]);
        let id = MatchId::new(1, 1);
        ledger.mark_in_progress(&id, Utc::now()).unwrap();
        let err = ledger.mark_in_progress(&id, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    }

    #[test]
    fn test_resolve_twice_fails_and_leaves_state() {
        let mut ledger = ledger_with_round(&["a", "b"]);
        let id = MatchId::new(1, 1);
        ledger.mark_in_progress(&id, Utc::now()).unwrap();
        ledger
            .resolve(&id, "a", Some(serde_json::json!({"kills": 5})), Utc::now())
            .unwrap();
        let before = ledger.clone();

        let err = ledger.resolve(&id, "a", None, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_resolve_unknown_winner() {
        let mut ledger = ledger_with_round(&["a", "b"]);
        let id = MatchId::new(1, 1);
        ledger.mark_in_progress(&id, Utc::now()).unwrap();
        let err = ledger.resolve(&id, "zed", None, Utc::now()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownWinner);
        assert_eq!(ledger.get(&id).unwrap().status, MatchStatus::InProgress);
    }

    #[test]
    fn test_resolve_requires_started_match() {
        let mut ledger = ledger_with_round(&["a", "b"]);
        let err = ledger
            .resolve(&MatchId::new(1, 1), "a", None, Utc::now())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    }

    #[test]
    fn test_reopen_clears_result() {
        let mut ledger = ledger_with_round(&["a", "b", "c"]);
        let id = MatchId::new(1, 1);
        ledger.mark_in_progress(&id, Utc::now()).unwrap();
        ledger.resolve(&id, "b", None, Utc::now()).unwrap();

        let previous = ledger.reopen(&id).unwrap();
        assert_eq!(previous.winner.as_deref(), Some("b"));
        let m = ledger.get(&id).unwrap();
        assert_eq!(m.status, MatchStatus::Pending);
        assert_eq!(m.winner, None);

        let bye = MatchId::new(1, 2);
        let err = ledger.reopen(&bye).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
    }

    #[test]
    fn test_counts() {
        let ledger = ledger_with_round(&["a", "b", "c"]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.count_by_status(MatchStatus::Pending), 1);
        assert_eq!(ledger.count_by_status(MatchStatus::Finished), 1);
        assert_eq!(ledger.round_count(), 1);
    }

    #[test]
    fn test_snapshot_roundtrips_through_json() {
        let ledger = ledger_with_round(&["a", "b", "c"]);
        let json = serde_json::to_value(&ledger).unwrap();
        let back: MatchLedger = serde_json::from_value(json).unwrap();
        assert_eq!(back, ledger);
    }
}
