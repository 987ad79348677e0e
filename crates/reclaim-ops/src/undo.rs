//! Undo ledger for move operations.
//!
//! Only move-based operations are reversible; deletes are final by
//! design and trash restoration is owned by the OS. The ledger is a
//! store interface so the hosting application decides where history
//! lives; the bundled implementation is a bounded in-memory ring.

use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use tracing::warn;

use reclaim_core::ItemError;

use crate::progress::{MoveRecord, MutationOutcome};

/// One reversible source→target move.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UndoRecord {
    pub source: PathBuf,
    pub target: PathBuf,
    pub succeeded: bool,
}

impl From<&MoveRecord> for UndoRecord {
    fn from(record: &MoveRecord) -> Self {
        Self {
            source: record.source.clone(),
            target: record.target.clone(),
            succeeded: record.success,
        }
    }
}

/// A batch of moves recorded together, reversed together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBatch {
    /// Ledger-assigned id.
    pub id: u64,
    /// When the batch was recorded.
    pub performed_at: SystemTime,
    /// Human-readable description.
    pub description: String,
    /// Per-item records; only succeeded ones are replayed by an undo.
    pub records: Vec<UndoRecord>,
    /// Whether the batch has been reversed.
    pub undone: bool,
}

/// Store for reversible move batches.
///
/// The engine only appends records and marks them undone; listing and
/// persistence policy belong to the host.
pub trait UndoStore {
    /// Record a batch. Returns the assigned id.
    fn append(&mut self, records: Vec<UndoRecord>, description: String) -> u64;

    /// Mark a batch as reversed. Returns false for an unknown id.
    fn mark_undone(&mut self, id: u64) -> bool;

    /// The most recent batch that has not been undone.
    fn latest_pending(&self) -> Option<&MoveBatch>;
}

/// Bounded in-memory undo store.
#[derive(Debug)]
pub struct MemoryUndoStore {
    entries: VecDeque<MoveBatch>,
    max_entries: usize,
    next_id: u64,
}

impl Default for MemoryUndoStore {
    fn default() -> Self {
        Self::new(100)
    }
}

impl MemoryUndoStore {
    /// Create a store keeping at most `max_entries` batches.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(max_entries.min(1000)),
            max_entries,
            next_id: 0,
        }
    }

    /// Get the number of recorded batches.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate batches, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &MoveBatch> {
        self.entries.iter()
    }
}

impl UndoStore for MemoryUndoStore {
    fn append(&mut self, records: Vec<UndoRecord>, description: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.entries.len() >= self.max_entries {
            self.entries.pop_front();
        }
        self.entries.push_back(MoveBatch {
            id,
            performed_at: SystemTime::now(),
            description,
            records,
            undone: false,
        });

        id
    }

    fn mark_undone(&mut self, id: u64) -> bool {
        match self.entries.iter_mut().find(|b| b.id == id) {
            Some(batch) => {
                batch.undone = true;
                true
            }
            None => false,
        }
    }

    fn latest_pending(&self) -> Option<&MoveBatch> {
        self.entries.iter().rev().find(|b| !b.undone)
    }
}

/// Replay a batch in reverse: each succeeded record's target is moved
/// back to its source. Per-item failures are captured independently.
pub fn undo_moves(batch: &MoveBatch) -> MutationOutcome {
    let mut restored = 0usize;
    let mut errors = Vec::new();

    for record in batch.records.iter().filter(|r| r.succeeded) {
        match fs::rename(&record.target, &record.source) {
            Ok(()) => restored += 1,
            Err(e) => {
                warn!(path = %record.target.display(), error = %e, "undo failed");
                errors.push(ItemError::new(record.target.clone(), e.to_string()));
            }
        }
    }

    MutationOutcome::new(restored, 0, errors)
}
