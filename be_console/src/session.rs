//! Console session: executes parsed commands against one tournament manager.

use crate::{
    commands::{Command, ParseError, TournamentRef, parse_command},
    config::ConsoleConfig,
    render,
};
use bracket_engine::tournament::{
    MemorySnapshotSink, NewParticipant, NewTournament, TournamentError, TournamentId,
    TournamentManager,
};
use std::sync::Arc;
use thiserror::Error;

pub const COMMANDS_HELP: &str = "\
Commands:
  create MAX_TEAMS MODE NAME... [| PRIZES]      Create a tournament (MODE: solo, duo, squad or any tag,
                                                PRIZES separated by ';')
  register T USER DISPLAY_NAME [TEAM...]        Register a participant
  start T                                       Build the bracket and start round 1
  begin T MATCH                                 Mark a match as being played
  report T MATCH WINNER [SCORE_JSON]            Report the winner of a match
  reopen T MATCH                                Reopen a finished match of the current round
  cancel T [REASON...]                          Cancel a tournament
  bracket T                                     Show the bracket
  players T                                     List participants
  stats T                                       Show statistics
  list                                          List active tournaments
  help                                          Show this help
  quit                                          Leave the console

T is the number shown by 'list' (e.g., '#1') or a full tournament id.
MATCH looks like 'match_1_2' (round 1, second match).";

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("{}", .0.client_message())]
    Tournament(#[from] TournamentError),

    #[error("No tournament #{0} in this session")]
    UnknownIndex(usize),
}

/// What the caller should do after a line was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Quit,
}

pub struct Console {
    config: ConsoleConfig,
    manager: TournamentManager,
    snapshots: Option<Arc<MemorySnapshotSink>>,
    /// Tournaments in creation order; index + 1 is the session number
    tournaments: Vec<TournamentId>,
}

impl Console {
    pub fn new(config: ConsoleConfig) -> Self {
        let mut manager = TournamentManager::new(config.engine.clone());
        let snapshots = config.snapshots.then(|| Arc::new(MemorySnapshotSink::new()));
        if let Some(sink) = &snapshots {
            manager = manager.with_snapshot_sink(sink.clone());
        }

        Self {
            config,
            manager,
            snapshots,
            tournaments: Vec::new(),
        }
    }

    pub fn manager(&self) -> &TournamentManager {
        &self.manager
    }

    pub fn snapshots(&self) -> Option<&MemorySnapshotSink> {
        self.snapshots.as_deref()
    }

    /// Parse and execute one input line, turning failures into replies
    ///
    /// Blank lines and `//` comments yield `None`.
    pub async fn handle_line(&mut self, line: &str) -> Option<Reply> {
        let line = line.trim();
        if line.is_empty() || line.starts_with("//") {
            return None;
        }

        let reply = match parse_command(line) {
            Ok(command) => self.execute(command).await,
            Err(e) => Err(e.into()),
        };

        Some(reply.unwrap_or_else(|e| {
            log::debug!("Command '{}' failed: {}", line, e);
            Reply::Text(format!("Error: {e}"))
        }))
    }

    pub async fn execute(&mut self, command: Command) -> Result<Reply, ConsoleError> {
        let text = match command {
            Command::Create {
                max_teams,
                game_mode,
                name,
                prize_pool,
            } => {
                let mut request = NewTournament::new(
                    self.config.group_id.clone(),
                    self.config.organizer_id.clone(),
                    name,
                    game_mode,
                    max_teams,
                );
                request.prize_pool = prize_pool;
                let id = self.manager.create_tournament_with(request).await?;
                self.tournaments.push(id);
                let t = self.manager.get_tournament(id).await?;
                render::created(self.tournaments.len(), &t)
            }
            Command::Register {
                tournament,
                user_id,
                display_name,
                team_name,
            } => {
                let id = self.resolve(tournament)?;
                let mut entry = NewParticipant::new(user_id, display_name);
                if let Some(team) = team_name {
                    entry = entry.with_team(team);
                }
                let p = self.manager.register_participant(id, entry).await?;
                format!(
                    "Registered {} as '{}' (seed {})",
                    p.display_name, p.team_name, p.seed
                )
            }
            Command::Start(tournament) => {
                let id = self.resolve(tournament)?;
                let outcome = self.manager.start_tournament(id).await?;
                render::started(self.index_of(id), &outcome)
            }
            Command::BeginMatch {
                tournament,
                match_id,
            } => {
                let id = self.resolve(tournament)?;
                let m = self.manager.start_match(id, match_id).await?;
                format!("{} is now in progress", m.id)
            }
            Command::Report {
                tournament,
                match_id,
                winner_id,
                score,
            } => {
                let id = self.resolve(tournament)?;
                let outcome = self
                    .manager
                    .report_result(id, match_id, &winner_id, score)
                    .await?;
                render::reported(&outcome)
            }
            Command::Cancel { tournament, reason } => {
                let id = self.resolve(tournament)?;
                let outcome = self
                    .manager
                    .cancel_tournament(id, reason.as_deref())
                    .await?;
                render::cancelled(self.index_of(id), &outcome)
            }
            Command::Reopen {
                tournament,
                match_id,
            } => {
                let id = self.resolve(tournament)?;
                let m = self.manager.reopen_match(id, match_id).await?;
                format!("{} reopened, report it again", m.id)
            }
            Command::Bracket(tournament) => {
                let id = self.resolve(tournament)?;
                render::bracket(&self.manager.get_bracket_summary(id).await?)
            }
            Command::Players(tournament) => {
                let id = self.resolve(tournament)?;
                render::participants(&self.manager.list_participants(id).await?)
            }
            Command::Stats(tournament) => {
                let id = self.resolve(tournament)?;
                render::stats(&self.manager.get_stats(id).await?)
            }
            Command::List => {
                let entries: Vec<_> = self
                    .manager
                    .list_active(&self.config.group_id)
                    .await
                    .into_iter()
                    .map(|t| (self.index_of(t.id), t))
                    .collect();
                render::overview(&entries)
            }
            Command::Help => COMMANDS_HELP.to_string(),
            Command::Quit => return Ok(Reply::Quit),
        };

        Ok(Reply::Text(text))
    }

    fn resolve(&self, tournament: TournamentRef) -> Result<TournamentId, ConsoleError> {
        match tournament {
            TournamentRef::Index(index) => index
                .checked_sub(1)
                .and_then(|i| self.tournaments.get(i))
                .copied()
                .ok_or(ConsoleError::UnknownIndex(index)),
            TournamentRef::Id(id) => Ok(id),
        }
    }

    /// Session number of a tournament, 0 if it was not created here
    fn index_of(&self, id: TournamentId) -> usize {
        self.tournaments
            .iter()
            .position(|t| *t == id)
            .map_or(0, |i| i + 1)
    }
}
