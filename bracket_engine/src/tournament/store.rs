//! Snapshot sink abstraction for persisting committed tournament state.
//!
//! The manager queues every committed aggregate on a [`SnapshotWriter`],
//! whose background task hands them to the sink one at a time. Operations
//! never wait for a save, and a failed save is logged without undoing the
//! in-memory commit.

use super::{aggregate::Tournament, models::TournamentId};
use async_trait::async_trait;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, oneshot};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to serialize tournament: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Snapshot store unavailable: {0}")]
    Unavailable(String),
}

/// Receives a snapshot after each successful mutation
#[async_trait]
pub trait SnapshotSink: Send + Sync {
    /// Persist the committed state of one tournament
    async fn save(&self, tournament: &Tournament) -> Result<(), SnapshotError>;
}

enum SnapshotJob {
    Save(Box<Tournament>),
    /// Acknowledged once every earlier job has been handled
    Flush(oneshot::Sender<()>),
}

/// Handle to the background task that feeds one sink
///
/// Snapshots are saved in the order they were queued.
#[derive(Clone)]
pub(crate) struct SnapshotWriter {
    sender: mpsc::UnboundedSender<SnapshotJob>,
}

impl SnapshotWriter {
    /// Spawn the writer task; must be called within a Tokio runtime
    pub(crate) fn spawn(sink: Arc<dyn SnapshotSink>) -> Self {
        let (sender, mut inbox) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(job) = inbox.recv().await {
                match job {
                    SnapshotJob::Save(tournament) => {
                        if let Err(e) = sink.save(&tournament).await {
                            log::warn!(
                                "Failed to save snapshot of tournament {}: {}",
                                tournament.id(),
                                e
                            );
                        }
                    }
                    SnapshotJob::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
            log::debug!("Snapshot writer stopped");
        });

        Self { sender }
    }

    /// Queue a committed state without waiting for it to be saved
    pub(crate) fn submit(&self, tournament: Tournament) {
        let tournament_id = tournament.id();
        if self
            .sender
            .send(SnapshotJob::Save(Box::new(tournament)))
            .is_err()
        {
            log::warn!(
                "Snapshot writer is gone, dropped snapshot of tournament {}",
                tournament_id
            );
        }
    }

    /// Wait until everything queued so far has reached the sink
    pub(crate) async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(SnapshotJob::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }
}

/// In-memory sink keeping the latest JSON snapshot per tournament
#[derive(Debug, Default)]
pub struct MemorySnapshotSink {
    snapshots: Mutex<HashMap<TournamentId, serde_json::Value>>,
    saves: Mutex<usize>,
}

impl MemorySnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest snapshot saved for a tournament
    pub async fn latest(&self, tournament_id: TournamentId) -> Option<serde_json::Value> {
        self.snapshots.lock().await.get(&tournament_id).cloned()
    }

    /// Rebuild an aggregate from its latest snapshot
    pub async fn restore(
        &self,
        tournament_id: TournamentId,
    ) -> Result<Option<Tournament>, SnapshotError> {
        match self.latest(tournament_id).await {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Total number of saves received
    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }
}

#[async_trait]
impl SnapshotSink for MemorySnapshotSink {
    async fn save(&self, tournament: &Tournament) -> Result<(), SnapshotError> {
        let value = serde_json::to_value(tournament)?;
        self.snapshots.lock().await.insert(tournament.id(), value);
        *self.saves.lock().await += 1;
        Ok(())
    }
}
