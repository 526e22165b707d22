//! Bracket builder.
//!
//! Pairing policy: entrants are paired consecutively in seed order,
//! (1, 2), (3, 4), ... and an unpaired last entrant receives a bye. The same
//! rule builds every later round from the previous round's winners, so a
//! round's pairings depend only on the order of the entrants handed in.

use super::{
    errors::{TournamentError, TournamentResult},
    models::{Match, MatchId, Participant, TournamentId, UserId},
};
use crate::config::MIN_BRACKET_PARTICIPANTS;
use chrono::{DateTime, Utc};

/// Build round 1 from participants in registration order
///
/// # Errors
///
/// `InsufficientParticipants` with fewer than two participants.
pub fn build(
    tournament_id: TournamentId,
    participants: &[Participant],
    now: DateTime<Utc>,
) -> TournamentResult<Vec<Match>> {
    if participants.len() < MIN_BRACKET_PARTICIPANTS {
        return Err(TournamentError::InsufficientParticipants {
            tournament_id,
            needed: MIN_BRACKET_PARTICIPANTS,
            current: participants.len(),
        });
    }

    let seeds: Vec<UserId> = participants.iter().map(|p| p.user_id.clone()).collect();
    Ok(pair_round(1, &seeds, now))
}

/// Pair entrants for `round`; a trailing odd entrant gets a finished bye
pub fn pair_round(round: u32, entrants: &[UserId], now: DateTime<Utc>) -> Vec<Match> {
    entrants
        .chunks(2)
        .zip(1u32..)
        .map(|(pair, position)| {
            let id = MatchId::new(round, position);
            match pair.get(1) {
                Some(second) => Match::pending(id, pair[0].clone(), second.clone(), now),
                None => Match::bye(id, pair[0].clone(), now),
            }
        })
        .collect()
}

/// Number of rounds needed to reduce `participants` to one champion
///
/// Equals `ceil(log2(n))`, 0 for fewer than two participants.
pub fn total_rounds(participants: usize) -> u32 {
    if participants < 2 {
        0
    } else {
        usize::BITS - (participants - 1).leading_zeros()
    }
}

/// Smallest power of two holding every participant
pub fn bracket_size(participants: usize) -> usize {
    participants.max(1).next_power_of_two()
}
