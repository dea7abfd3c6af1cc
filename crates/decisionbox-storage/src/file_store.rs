//! Directory-backed implementation of the `KeyValueStore` trait.

use std::fmt::Write as _;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use decisionbox_core::error::DomainError;
use decisionbox_core::storage::KeyValueStore;
use tracing::{debug, info};

/// Stores each key as one file inside a directory.
///
/// Writes go to a temporary file next to the target and are renamed over
/// it, so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Opens (creating if needed) the storage directory.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Persistence` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            DomainError::Persistence(format!("failed to create {}: {e}", dir.display()))
        })?;
        info!(dir = %dir.display(), "file storage opened");
        Ok(Self { dir })
    }

    /// The storage directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The file that holds `key`.
    ///
    /// ASCII letters, digits and `-` are kept; every other byte, `_`
    /// included, becomes `_` followed by two uppercase hex digits. Distinct
    /// keys therefore always get distinct files.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'-' {
                name.push(char::from(byte));
            } else {
                let _ = write!(name, "_{byte:02X}");
            }
        }
        self.dir.join(format!("{name}.json"))
    }
}

fn read_value(path: &Path) -> Result<Option<String>, DomainError> {
    match fs::read_to_string(path) {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DomainError::Persistence(format!(
            "failed to read {}: {e}",
            path.display()
        ))),
    }
}

fn atomic_write(dir: &Path, path: &Path, value: &str) -> Result<(), DomainError> {
    let temp = tempfile::NamedTempFile::new_in(dir).map_err(|e| {
        DomainError::Persistence(format!("failed to create temp file in {}: {e}", dir.display()))
    })?;
    fs::write(temp.path(), value)
        .map_err(|e| DomainError::Persistence(format!("failed to write temp file: {e}")))?;
    temp.persist(path).map_err(|e| {
        DomainError::Persistence(format!("failed to persist {}: {e}", path.display()))
    })?;
    Ok(())
}

fn remove_file(path: &Path) -> Result<(), DomainError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(DomainError::Persistence(format!(
            "failed to remove {}: {e}",
            path.display()
        ))),
    }
}

async fn blocking<T, F>(task: F) -> Result<T, DomainError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, DomainError> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| DomainError::Persistence(format!("storage task failed: {e}")))?
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError> {
        let path = self.path_for(key);
        blocking(move || read_value(&path)).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), DomainError> {
        let dir = self.dir.clone();
        let path = self.path_for(key);
        debug!(key, bytes = value.len(), "writing value");
        blocking(move || atomic_write(&dir, &path, &value)).await
    }

    async fn remove(&self, keys: &[&str]) -> Result<(), DomainError> {
        let paths: Vec<PathBuf> = keys.iter().map(|key| self.path_for(key)).collect();
        blocking(move || paths.iter().try_for_each(|path| remove_file(path))).await
    }
}
