//! Plain-text formatting of engine outcomes and views.

use bracket_engine::tournament::{
    Advancement, BracketSummary, CancelOutcome, MatchStatus, MatchSummary, Participant,
    ReportOutcome, SlotLabel, StartOutcome, Tournament, TournamentOverview, TournamentStats,
};
use std::fmt::Write;

pub fn created(index: usize, t: &Tournament) -> String {
    let mut out = format!(
        "Created tournament #{index} '{}' ({}, up to {} teams)",
        t.name(),
        t.game_mode(),
        t.max_teams()
    );
    if !t.prize_pool().is_empty() {
        let _ = write!(out, "\nPrizes: {}", t.prize_pool().join(", "));
    }
    let _ = write!(out, "\n{} rules, see 'stats #{index}'", t.rules().len());
    out
}

fn prizes_and_rules(out: &mut String, prize_pool: &[String], rules: &[String]) {
    if prize_pool.is_empty() {
        out.push_str("\nPrizes: none announced");
    } else {
        let _ = write!(out, "\nPrizes: {}", prize_pool.join(", "));
    }
    out.push_str("\nRules:");
    for (i, rule) in rules.iter().enumerate() {
        let _ = write!(out, "\n  {}. {rule}", i + 1);
    }
}

pub fn started(index: usize, outcome: &StartOutcome) -> String {
    let mut out = format!(
        "Tournament #{index} started: {} matches in round 1, {} rounds total",
        outcome.matches.len(),
        outcome.total_rounds
    );
    for user_id in &outcome.byes {
        let _ = write!(out, "\n  {user_id} advances on a bye");
    }
    out
}

pub fn reported(outcome: &ReportOutcome) -> String {
    let head = format!("{} won {}", outcome.winner_id, outcome.match_id);
    match &outcome.advancement {
        Advancement::RoundPending { round, remaining } if *remaining > 0 => {
            format!("{head}. Round {round}: {remaining} matches left")
        }
        Advancement::RoundPending { .. } => head,
        Advancement::NextRound { round, matches } => {
            format!("{head}. Round {round} begins with {} matches", matches.len())
        }
        Advancement::Completed { champion } => {
            format!("{head}. Tournament complete, champion: {champion}")
        }
    }
}

pub fn cancelled(index: usize, outcome: &CancelOutcome) -> String {
    format!(
        "Tournament #{index} cancelled (was {}): {}",
        outcome.previous_status, outcome.reason
    )
}

pub fn bracket(summary: &BracketSummary) -> String {
    let mut out = format!(
        "{} [{}] {} participants",
        summary.name, summary.status, summary.participant_count
    );
    if summary.total_rounds > 0 {
        let _ = write!(
            out,
            ", round {}/{}",
            summary.current_round, summary.total_rounds
        );
    }
    if let Some(champion) = &summary.champion {
        let _ = write!(out, "\nChampion: {champion}");
    }

    for round in &summary.rounds {
        let mark = if round.complete { " (complete)" } else { "" };
        let _ = write!(out, "\nRound {}{mark}", round.round);
        for m in &round.matches {
            let _ = write!(out, "\n  {}", match_line(m));
        }
    }
    out
}

fn match_line(m: &MatchSummary) -> String {
    let Some(slot2) = &m.slot2 else {
        return format!("{}: {} (bye)", m.match_id, slot(&m.slot1));
    };
    let versus = format!("{}: {} vs {}", m.match_id, slot(&m.slot1), slot(slot2));
    match (m.status, &m.winner) {
        (MatchStatus::Finished, Some(winner)) => format!("{versus} -> {winner}"),
        (MatchStatus::InProgress, _) => format!("{versus} (in progress)"),
        _ => versus,
    }
}

fn slot(label: &SlotLabel) -> String {
    format!("{} ({})", label.team_name, label.user_id)
}

pub fn participants(list: &[Participant]) -> String {
    if list.is_empty() {
        return "No participants registered".to_string();
    }
    list.iter()
        .map(|p| {
            format!(
                "{:>2}. {} ({}) team {}: {}W {}L",
                p.seed,
                p.display_name,
                p.user_id,
                p.team_name,
                p.stats.matches_won,
                p.stats.matches_lost
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Active tournaments with their session index
pub fn overview(entries: &[(usize, TournamentOverview)]) -> String {
    if entries.is_empty() {
        return "No active tournaments".to_string();
    }
    entries
        .iter()
        .map(|(index, t)| {
            let mut line = format!(
                "#{index} {} [{}] {} {}/{} teams, created {}",
                t.name,
                t.status,
                t.game_mode,
                t.participant_count,
                t.max_teams,
                t.created_at.format("%Y-%m-%d %H:%M")
            );
            if !t.prize_pool.is_empty() {
                let _ = write!(line, ", prizes: {}", t.prize_pool.join(", "));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn stats(stats: &TournamentStats) -> String {
    let mut out = format!(
        "{} [{}]\nParticipants: {}\nMatches: {} total, {} finished, {} in progress, {} pending, {} byes",
        stats.name,
        stats.status,
        stats.participant_count,
        stats.matches_total,
        stats.matches_finished,
        stats.matches_in_progress,
        stats.matches_pending,
        stats.byes
    );
    if stats.total_rounds > 0 {
        let _ = write!(out, "\nRound: {}/{}", stats.current_round, stats.total_rounds);
    }
    if let Some(champion) = &stats.champion {
        let _ = write!(out, "\nChampion: {champion}");
    }
    if let (Some(started), Some(finished)) = (stats.started_at, stats.finished_at) {
        let minutes = (finished - started).num_minutes();
        let _ = write!(out, "\nDuration: {minutes} min");
    }
    prizes_and_rules(&mut out, &stats.prize_pool, &stats.rules);
    out
}
