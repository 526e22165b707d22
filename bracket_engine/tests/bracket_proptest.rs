/// Property-based tests for bracket construction and advancement using proptest
///
/// These tests verify bracket shape and advancement rules across
/// arbitrary field sizes and result orders.
use bracket_engine::{
    EngineConfig, ErrorKind,
    tournament::{
        Advancement, GameMode, Match, MatchId, MatchStatus, NewParticipant, Tournament, TournamentId,
        TournamentManager, TournamentStatus, bracket,
    },
};
use proptest::prelude::*;

// Field sizes the engine accepts with the default cap
fn field_size_strategy() -> impl Strategy<Value = usize> {
    2usize..=64
}

// A field size plus one winner choice per possible match
fn field_with_choices_strategy() -> impl Strategy<Value = (usize, Vec<bool>)> {
    field_size_strategy()
        .prop_flat_map(|n| (Just(n), prop::collection::vec(any::<bool>(), n)))
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("Failed to build runtime")
}

async fn started(n: usize) -> (TournamentManager, TournamentId) {
    let manager = TournamentManager::new(EngineConfig::default());
    let id = manager
        .create_tournament("guild", "org", "Property Cup", GameMode::Solo, 64)
        .await
        .unwrap();
    for i in 1..=n {
        manager
            .register_participant(id, NewParticipant::new(format!("u{i}"), format!("P{i}")))
            .await
            .unwrap();
    }
    manager.start_tournament(id).await.unwrap();
    (manager, id)
}

/// Winner of a match, chosen by its position so report order cannot matter
fn pick_winner(m: &Match, choices: &[bool]) -> String {
    let key = (m.id.round() as usize * 7 + m.id.position() as usize) % choices.len();
    match (choices[key], m.slot2.as_ref()) {
        (true, Some(second)) => second.clone(),
        _ => m.slot1.clone(),
    }
}

/// Play the whole bracket, reporting each round forwards or backwards
async fn play_out(
    manager: &TournamentManager,
    id: TournamentId,
    choices: &[bool],
    reverse: bool,
) -> Tournament {
    loop {
        let t = manager.get_tournament(id).await.unwrap();
        if t.status() == TournamentStatus::Completed {
            return t;
        }

        let mut open: Vec<_> = manager
            .list_round(id, t.current_round())
            .await
            .unwrap()
            .into_iter()
            .filter(|m| m.status != MatchStatus::Finished)
            .collect();
        if reverse {
            open.reverse();
        }

        for m in open {
            let winner = pick_winner(&m, choices);
            manager.report_result(id, m.id, &winner, None).await.unwrap();
        }
    }
}

proptest! {
    #[test]
    fn test_round_one_shape(n in field_size_strategy()) {
        let rt = runtime();
        let (manager, id) = rt.block_on(started(n));
        let round1 = rt.block_on(manager.list_round(id, 1)).unwrap();

        // ceil(N/2) matches, at most one bye, every participant seated once
        prop_assert_eq!(round1.len(), n.div_ceil(2));
        prop_assert_eq!(round1.iter().filter(|m| m.is_bye()).count(), n % 2);

        let seated: usize = round1.iter().map(|m| if m.is_bye() { 1 } else { 2 }).sum();
        prop_assert_eq!(seated, n);
    }

    #[test]
    fn test_total_rounds_is_ceil_log2(n in field_size_strategy()) {
        let expected = (n as f64).log2().ceil() as u32;
        prop_assert_eq!(bracket::total_rounds(n), expected);
        prop_assert!(bracket::bracket_size(n) >= n);
    }

    #[test]
    fn test_full_play_out_crowns_one_champion((n, choices) in field_with_choices_strategy()) {
        let rt = runtime();
        let t = rt.block_on(async {
            let (manager, id) = started(n).await;
            play_out(&manager, id, &choices, false).await
        });

        let champion = t.champion().expect("Completed tournament has a champion");
        prop_assert!(t.participants().contains(champion));
        prop_assert!(t.current_round() <= t.total_rounds());

        // Every non-champion lost exactly once
        let losses: u32 = t.participants().list().iter().map(|p| p.stats.matches_lost).sum();
        prop_assert_eq!(losses as usize, n - 1);

        let played = t.matches().iter().filter(|m| !m.is_bye()).count();
        prop_assert_eq!(played, n - 1);
    }

    #[test]
    fn test_report_order_does_not_change_pairings((n, choices) in field_with_choices_strategy()) {
        let rt = runtime();
        let (forward, backward) = rt.block_on(async {
            let (m1, id1) = started(n).await;
            let (m2, id2) = started(n).await;
            (
                play_out(&m1, id1, &choices, false).await,
                play_out(&m2, id2, &choices, true).await,
            )
        });

        let bracket_of = |t: &Tournament| {
            t.matches()
                .iter()
                .map(|m| (m.id, m.slot1.clone(), m.slot2.clone(), m.winner.clone()))
                .collect::<Vec<_>>()
        };
        prop_assert_eq!(bracket_of(&forward), bracket_of(&backward));
        prop_assert_eq!(forward.champion(), backward.champion());
    }

    #[test]
    fn test_second_resolve_fails_without_change(n in field_size_strategy(), pick_second in any::<bool>()) {
        let rt = runtime();
        rt.block_on(async {
            let (manager, id) = started(n).await;
            let first = manager.get_match(id, MatchId::new(1, 1)).await.unwrap();
            let winner = match (pick_second, first.slot2.as_ref()) {
                (true, Some(second)) => second.clone(),
                _ => first.slot1.clone(),
            };

            manager.report_result(id, first.id, &winner, None).await.unwrap();
            let before = manager.get_tournament(id).await.unwrap();

            let err = manager.report_result(id, first.id, &winner, None).await.unwrap_err();
            let after = manager.get_tournament(id).await.unwrap();

            // A 2-player field is completed by the first report
            if before.status() == TournamentStatus::Completed {
                assert_eq!(err.kind(), ErrorKind::InvalidState);
            } else {
                assert_eq!(err.kind(), ErrorKind::InvalidTransition);
            }
            assert_eq!(after, before);
        });
    }

    #[test]
    fn test_advancement_reports_are_consistent((n, choices) in field_with_choices_strategy()) {
        let rt = runtime();
        let completions = rt.block_on(async {
            let (manager, id) = started(n).await;
            let mut completions = 0;
            loop {
                let t = manager.get_tournament(id).await.unwrap();
                if t.status() == TournamentStatus::Completed {
                    break;
                }
                for m in manager.list_round(id, t.current_round()).await.unwrap() {
                    if m.status == MatchStatus::Finished {
                        continue;
                    }
                    let winner = pick_winner(&m, &choices);
                    let outcome = manager.report_result(id, m.id, &winner, None).await.unwrap();
                    if let Advancement::Completed { champion } = outcome.advancement {
                        assert_eq!(champion, winner);
                        completions += 1;
                    }
                }
            }
            completions
        });
        prop_assert_eq!(completions, 1);
    }
}
