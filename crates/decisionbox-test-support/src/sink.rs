//! Recording sink — captures snapshots instead of writing them anywhere.

use std::sync::Mutex;

use decisionbox_core::storage::SnapshotSink;

/// A `SnapshotSink` that keeps every submitted `(key, payload)` pair.
#[derive(Debug, Default)]
pub struct RecordingSink {
    submitted: Mutex<Vec<(String, String)>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All submissions, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn submitted(&self) -> Vec<(String, String)> {
        self.submitted.lock().unwrap().clone()
    }

    /// The most recent payload submitted under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn last_for(&self, key: &str) -> Option<String> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, payload)| payload.clone())
    }
}

impl SnapshotSink for RecordingSink {
    fn submit(&self, key: &'static str, payload: String) {
        self.submitted
            .lock()
            .unwrap()
            .push((key.to_owned(), payload));
    }
}
