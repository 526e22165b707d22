//! Round advancer: detects round completion and opens the next round.

use super::{
    bracket,
    ledger::MatchLedger,
    models::{Advancement, MatchStatus, UserId},
};
use chrono::{DateTime, Utc};

/// True iff the round exists and every one of its matches is finished
pub fn is_round_complete(ledger: &MatchLedger, round: u32) -> bool {
    let matches = ledger.list_by_round(round);
    !matches.is_empty() && matches.iter().all(|m| m.status == MatchStatus::Finished)
}

/// Winners of a round in bracket order
///
/// The order depends only on match positions, never on when results came in.
pub fn round_winners(ledger: &MatchLedger, round: u32) -> Vec<UserId> {
    ledger
        .list_by_round(round)
        .into_iter()
        .filter_map(|m| m.winner.clone())
        .collect()
}

/// Advance after a result in `round` was recorded
///
/// Opens round `round + 1` in a single insert when the round is complete
/// and more than one winner remains. Calling it again for a round that
/// already advanced is a no-op reported as `RoundPending` with nothing
/// remaining.
pub fn advance(ledger: &mut MatchLedger, round: u32, now: DateTime<Utc>) -> Advancement {
    if !is_round_complete(ledger, round) {
        let remaining = ledger
            .list_by_round(round)
            .iter()
            .filter(|m| m.status != MatchStatus::Finished)
            .count();
        return Advancement::RoundPending { round, remaining };
    }

    let mut winners = round_winners(ledger, round);
    if winners.len() == 1
        && let Some(champion) = winners.pop()
    {
        return Advancement::Completed { champion };
    }

    if ledger.round_count() > round {
        return Advancement::RoundPending {
            round,
            remaining: 0,
        };
    }

    let next = round + 1;
    let matches = bracket::pair_round(next, &winners, now);
    let ids = matches.iter().map(|m| m.id).collect();
    ledger.open_round(matches);

    Advancement::NextRound {
        round: next,
        matches: ids,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::models::MatchId;
    use uuid::Uuid;

    fn ledger(entrants: &[&str]) -> MatchLedger {
        let mut ledger = MatchLedger::new(Uuid::new_v4());
        let entrants: Vec<String> = entrants.iter().map(|s| s.to_string()).collect();
        ledger.open_round(bracket::pair_round(1, &entrants, Utc::now()));
        ledger
    }

    fn play(ledger: &mut MatchLedger, id: MatchId, winner: &str) {
        ledger.mark_in_progress(&id, Utc::now()).unwrap();
        ledger.resolve(&id, winner, None, Utc::now()).unwrap();
    }

    #[test]
    fn test_pending_round_reports_remaining() {
        let mut l = ledger(&["a", "b", "c", "d"]);
        play(&mut l, MatchId::new(1, 1), "a");
        assert_eq!(
            advance(&mut l, 1, Utc::now()),
            Advancement::RoundPending {
                round: 1,
                remaining: 1
            }
        );
        assert_eq!(l.round_count(), 1);
    }

    #[test]
    fn test_complete_round_opens_next() {
        let mut l = ledger(&["a", "b", "c", "d"]);
        play(&mut l, MatchId::new(1, 1), "b");
        play(&mut l, MatchId::new(1, 2), "c");
        let outcome = advance(&mut l, 1, Utc::now());
        assert_eq!(
            outcome,
            Advancement::NextRound {
                round: 2,
                matches: vec![MatchId::new(2, 1)]
            }
        );
        let final_match = l.get(&MatchId::new(2, 1)).unwrap();
        assert_eq!(final_match.slot1, "b");
        assert_eq!(final_match.slot2.as_deref(), Some("c"));
    }

    #[test]
    fn test_pairing_ignores_report_order() {
        let mut first = ledger(&["a", "b", "c", "d"]);
        play(&mut first, MatchId::new(1, 1), "a");
        play(&mut first, MatchId::new(1, 2), "d");
        advance(&mut first, 1, Utc::now());

        let mut second = ledger(&["a", "b", "c", "d"]);
        play(&mut second, MatchId::new(1, 2), "d");
        play(&mut second, MatchId::new(1, 1), "a");
        advance(&mut second, 1, Utc::now());

        let pair = |l: &MatchLedger| {
            let m = l.get(&MatchId::new(2, 1)).unwrap();
            (m.slot1.clone(), m.slot2.clone())
        };
        assert_eq!(pair(&first), pair(&second));
    }

    #[test]
    fn test_odd_winners_get_bye() {
        let mut l = ledger(&["a", "b", "c", "d", "e"]);
        play(&mut l, MatchId::new(1, 1), "a");
        play(&mut l, MatchId::new(1, 2), "c");
        let outcome = advance(&mut l, 1, Utc::now());
        assert!(matches!(outcome, Advancement::NextRound { round: 2, .. }));

        let round2 = l.list_by_round(2);
        assert_eq!(round2.len(), 2);
        assert!(!round2[0].is_bye());
        assert!(round2[1].is_bye());
        assert_eq!(round2[1].slot1, "e");
    }

    #[test]
    fn test_single_winner_completes() {
        let mut l = ledger(&["a", "b"]);
        play(&mut l, MatchId::new(1, 1), "b");
        assert_eq!(
            advance(&mut l, 1, Utc::now()),
            Advancement::Completed {
                champion: "b".to_string()
            }
        );
    }

    #[test]
    fn test_advance_is_idempotent() {
        let mut l = ledger(&["a", "b", "c", "d"]);
        play(&mut l, MatchId::new(1, 1), "a");
        play(&mut l, MatchId::new(1, 2), "c");
        advance(&mut l, 1, Utc::now());
        let again = advance(&mut l, 1, Utc::now());
        assert_eq!(
            again,
            Advancement::RoundPending {
                round: 1,
                remaining: 0
            }
        );
        assert_eq!(l.round_count(), 2);
    }

    #[test]
    fn test_unknown_round_is_not_complete() {
        let l = ledger(&["a", "b"]);
        assert!(!is_round_complete(&l, 2));
    }
}
