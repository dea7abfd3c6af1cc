//! Key-value persistence abstraction.
//!
//! The reading session mirrors its state into a durable key-value store.
//! The store only ever sees serialized snapshots; it never interprets or
//! mutates them.

use async_trait::async_trait;

use crate::error::DomainError;

/// Key holding the JSON array of progress records.
pub const PROGRESS_KEY: &str = "@decision_box_progress";

/// Key holding the JSON reader settings object.
pub const SETTINGS_KEY: &str = "@decision_box_settings";

/// Durable string-to-string storage that survives process restarts.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if nothing is stored.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: String) -> Result<(), DomainError>;

    /// Removes every listed key. Missing keys are not an error.
    async fn remove(&self, keys: &[&str]) -> Result<(), DomainError>;
}

/// Fire-and-forget receiver of serialized snapshots.
///
/// Mutations hand their resulting snapshot to a sink and carry on; the sink
/// decides when the bytes reach durable storage. `submit` must not block.
pub trait SnapshotSink: Send + Sync {
    /// Queues `payload` to be stored under `key`.
    fn submit(&self, key: &'static str, payload: String);
}
