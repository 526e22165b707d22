//! Participant registry.
//!
//! Registration order is the seeding order used by the bracket builder.

use super::{
    errors::{TournamentError, TournamentResult},
    models::{Match, Participant, ParticipantStats, TournamentId, UserId},
};
use crate::config::EngineConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewParticipant {
    pub user_id: UserId,
    pub display_name: String,
    /// Defaults to `Team <display name>` when absent or blank
    pub team_name: Option<String>,
}

impl NewParticipant {
    pub fn new(user_id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            team_name: None,
        }
    }

    pub fn with_team(mut self, team_name: impl Into<String>) -> Self {
        self.team_name = Some(team_name.into());
        self
    }
}

/// Ordered set of participants for one tournament
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRegistry {
    tournament_id: TournamentId,
    participants: Vec<Participant>,
}

impl ParticipantRegistry {
    pub fn new(tournament_id: TournamentId) -> Self {
        Self {
            tournament_id,
            participants: Vec::new(),
        }
    }

    /// Add a participant
    ///
    /// Lifecycle checks (tournament must be pending) belong to the caller;
    /// this only enforces identity uniqueness and capacity.
    pub(crate) fn register(
        &mut self,
        entry: NewParticipant,
        max_teams: usize,
        config: &EngineConfig,
        now: DateTime<Utc>,
    ) -> TournamentResult<&Participant> {
        // Ids are opaque: stored as given, only blank ones are refused
        let user_id = entry.user_id;
        if user_id.trim().is_empty() {
            return Err(TournamentError::InvalidInput {
                field: "user id",
                reason: "must not be empty".to_string(),
            });
        }

        let display_name = truncate(entry.display_name.trim(), config.max_display_name_len);
        if display_name.is_empty() {
            return Err(TournamentError::InvalidInput {
                field: "display name",
                reason: "must not be empty".to_string(),
            });
        }

        let team_name = match entry.team_name.as_deref().map(str::trim) {
            Some(team) if !team.is_empty() => truncate(team, config.max_team_name_len),
            _ => truncate(&format!("Team {display_name}"), config.max_team_name_len),
        };

        if self.contains(&user_id) {
            return Err(TournamentError::DuplicateParticipant {
                tournament_id: self.tournament_id,
                user_id,
            });
        }

        if self.participants.len() >= max_teams {
            return Err(TournamentError::TournamentFull {
                tournament_id: self.tournament_id,
                max_teams,
            });
        }

        self.participants.push(Participant {
            user_id,
            display_name,
            team_name,
            seed: self.participants.len() + 1,
            registered_at: now,
            stats: ParticipantStats::default(),
        });

        let index = self.participants.len() - 1;
        Ok(&self.participants[index])
    }

    /// Participants in registration order
    pub fn list(&self) -> &[Participant] {
        &self.participants
    }

    /// Look up a participant by user ID
    pub fn get(&self, user_id: &str) -> TournamentResult<&Participant> {
        self.participants
            .iter()
            .find(|p| p.user_id == user_id)
            .ok_or_else(|| TournamentError::ParticipantNotFound {
                tournament_id: self.tournament_id,
                user_id: user_id.to_string(),
            })
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Team name for display, falling back to the raw id
    pub fn team_name_of(&self, user_id: &str) -> String {
        self.participants
            .iter()
            .find(|p| p.user_id == user_id)
            .map(|p| p.team_name.clone())
            .unwrap_or_else(|| user_id.to_string())
    }

    /// Count a played match for both sides. Byes are not counted.
    pub(crate) fn record_result(&mut self, finished: &Match) {
        if finished.is_bye() {
            return;
        }
        let Some(winner) = finished.winner.as_deref() else {
            return;
        };
        for participant in &mut self.participants {
            if !finished.has_participant(&participant.user_id) {
                continue;
            }
            participant.stats.matches_played += 1;
            if participant.user_id == winner {
                participant.stats.matches_won += 1;
            } else {
                participant.stats.matches_lost += 1;
            }
        }
    }

    /// Undo [`Self::record_result`] for a match being reopened
    pub(crate) fn revert_result(&mut self, finished: &Match) {
        if finished.is_bye() {
            return;
        }
        let Some(winner) = finished.winner.as_deref() else {
            return;
        };
        for participant in &mut self.participants {
            if !finished.has_participant(&participant.user_id) {
                continue;
            }
            let stats = &mut participant.stats;
            stats.matches_played = stats.matches_played.saturating_sub(1);
            if participant.user_id == winner {
                stats.matches_won = stats.matches_won.saturating_sub(1);
            } else {
                stats.matches_lost = stats.matches_lost.saturating_sub(1);
            }
        }
    }
}

fn truncate(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}
