//! Test key-value stores — mock `KeyValueStore` implementations for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use decisionbox_core::error::DomainError;
use decisionbox_core::storage::KeyValueStore;
use tokio::sync::{Notify, Semaphore};

/// A key-value store held in memory that also records every `set` call in
/// order, so tests can assert on what was written and when.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl InMemoryKeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one entry. The entry is not
    /// counted as a write.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        store
    }

    /// The value currently stored under `key`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Every `set` call so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        Ok(self.value(key))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError> {
        self.writes
            .lock()
            .unwrap()
            .push((key.to_owned(), value.clone()));
        self.values.lock().unwrap().insert(key.to_owned(), value);
        Ok(())
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), DomainError> {
        let mut values = self.values.lock().unwrap();
        for key in keys {
            values.remove(*key);
        }
        Ok(())
    }
}

/// A key-value store that fails every operation. Useful for testing that
/// persistence failures never reach the reader.
#[derive(Debug)]
pub struct FailingKeyValueStore;

#[async_trait]
impl KeyValueStore for FailingKeyValueStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, DomainError> {
        Err(DomainError::Persistence("storage unavailable".into()))
    }

    async fn set(&self, _key: &str, _value: String) -> Result<(), DomainError> {
        Err(DomainError::Persistence("storage unavailable".into()))
    }

    async fn remove(&self, _keys: &[&str]) -> Result<(), DomainError> {
        Err(DomainError::Persistence("storage unavailable".into()))
    }
}

/// An in-memory store whose writes block until the test releases them.
/// Lets tests hold a write "in flight" and observe what queues behind it.
#[derive(Debug)]
pub struct GatedKeyValueStore {
    inner: InMemoryKeyValueStore,
    started: Notify,
    gate: Semaphore,
}

impl GatedKeyValueStore {
    /// Creates a store with the gate closed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: InMemoryKeyValueStore::new(),
            started: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    /// Waits until a write has entered the store and is blocked on the gate.
    pub async fn wait_for_write(&self) {
        self.started.notified().await;
    }

    /// Lets `count` more writes through.
    pub fn release(&self, count: usize) {
        self.gate.add_permits(count);
    }

    /// The underlying recording store.
    #[must_use]
    pub fn inner(&self) -> &InMemoryKeyValueStore {
        &self.inner
    }
}

impl Default for GatedKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for GatedKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError> {
        self.started.notify_one();
        let permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| DomainError::Persistence(e.to_string()))?;
        permit.forget();
        self.inner.set(key, value).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), DomainError> {
        self.inner.remove(keys).await
    }
}
