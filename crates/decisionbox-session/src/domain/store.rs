//! The reader's progress across every story.

use std::sync::Arc;

use decisionbox_core::storage::{PROGRESS_KEY, SnapshotSink};
use decisionbox_narrative::ProgressRecord;
use tracing::{error, warn};

/// Mapping from story id to at most one progress record, in first-seen order.
///
/// The in-memory store is authoritative. Every mutation hands the complete
/// resulting snapshot to the sink; a crash before the sink writes it loses
/// that one update and nothing else.
pub struct ProgressStore {
    records: Vec<ProgressRecord>,
    sink: Arc<dyn SnapshotSink>,
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore")
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            records: Vec::new(),
            sink,
        }
    }

    /// Creates a store holding records read back from storage. Nothing is
    /// written, since the snapshot came from there.
    #[must_use]
    pub fn restore(records: Vec<ProgressRecord>, sink: Arc<dyn SnapshotSink>) -> Self {
        Self {
            records: dedupe(records),
            sink,
        }
    }

    /// The record for `story_id`, if the reader has made a choice in it.
    #[must_use]
    pub fn get(&self, story_id: &str) -> Option<&ProgressRecord> {
        self.records.iter().find(|r| r.story_id == story_id)
    }

    /// Every record, in first-seen order.
    #[must_use]
    pub fn records(&self) -> &[ProgressRecord] {
        &self.records
    }

    /// Replaces the record with the same story id, or appends it.
    pub fn upsert(&mut self, record: ProgressRecord) {
        match self
            .records
            .iter_mut()
            .find(|r| r.story_id == record.story_id)
        {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        self.persist();
    }

    /// Overwrites the whole mapping. Used for "reset all" and full restores.
    pub fn replace_all(&mut self, records: Vec<ProgressRecord>) {
        self.records = dedupe(records);
        self.persist();
    }

    /// Deletes one story's record. Returns it if there was one.
    pub fn remove_story(&mut self, story_id: &str) -> Option<ProgressRecord> {
        let index = self.records.iter().position(|r| r.story_id == story_id)?;
        let removed = self.records.remove(index);
        self.persist();
        Some(removed)
    }

    fn persist(&self) {
        match serde_json::to_string(&self.records) {
            Ok(payload) => self.sink.submit(PROGRESS_KEY, payload),
            Err(e) => error!(error = %e, "failed to serialize progress snapshot"),
        }
    }
}

/// Collapses repeated story ids, keeping the position of the first and the
/// contents of the last.
fn dedupe(records: Vec<ProgressRecord>) -> Vec<ProgressRecord> {
    let mut unique: Vec<ProgressRecord> = Vec::with_capacity(records.len());
    for record in records {
        match unique.iter_mut().find(|r| r.story_id == record.story_id) {
            Some(existing) => {
                warn!(story_id = %record.story_id, "duplicate progress record collapsed");
                *existing = record;
            }
            None => unique.push(record),
        }
    }
    unique
}
