//! The reader facade the presentation layer drives.
//!
//! Owns one session: the catalog, the progress and settings stores, and the
//! write queue mirroring both into durable storage. Every operation except
//! startup, `flush`, `clear_all_data` and `shutdown` is synchronous.

use std::sync::Arc;

use decisionbox_content::{Catalog, CatalogFormat, Story};
use decisionbox_core::clock::{Clock, SystemClock};
use decisionbox_core::error::DomainError;
use decisionbox_core::storage::{KeyValueStore, SnapshotSink};
use decisionbox_narrative::ProgressRecord;
use decisionbox_session::application::{command_handlers, query_handlers};
use decisionbox_session::application::query_handlers::{ProgressSummary, ReadingView};
use decisionbox_session::domain::commands::{MakeChoice, ResetProgress, RestartStory};
use decisionbox_session::domain::settings::{Settings, SettingsPatch, SettingsStore};
use decisionbox_session::domain::store::ProgressStore;
use decisionbox_session::persistence::{self, WriteQueue};
use decisionbox_storage::file_store::FileKeyValueStore;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;

/// A running reader session.
pub struct ReaderApp {
    catalog: Catalog,
    progress: ProgressStore,
    settings: SettingsStore,
    queue: Arc<WriteQueue>,
    storage: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ReaderApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReaderApp")
            .field("catalog", &self.catalog.fingerprint())
            .field("progress", &self.progress)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl ReaderApp {
    /// Loads the catalog named by `config`, opens file storage in its data
    /// directory and restores the saved session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the catalog file cannot be read,
    /// `AppError::Catalog` if it is invalid, and `AppError::Storage` if the
    /// data directory cannot be created.
    pub async fn start(config: &AppConfig) -> Result<Self, AppError> {
        let source = tokio::fs::read(&config.catalog_path).await?;
        let catalog = Catalog::load(&source, CatalogFormat::from_path(&config.catalog_path))?;
        let storage = FileKeyValueStore::open(&config.data_dir)?;

        Ok(Self::with_parts(catalog, Arc::new(storage), Arc::new(SystemClock)).await)
    }

    /// Assembles a session from already-built parts and restores whatever
    /// `storage` holds. Unreadable saved state is replaced by defaults.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub async fn with_parts(
        catalog: Catalog,
        storage: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let records = persistence::load_progress(storage.as_ref()).await;
        let settings = persistence::load_settings(storage.as_ref()).await;

        let queue = Arc::new(WriteQueue::spawn(Arc::clone(&storage)));
        let sink: Arc<dyn SnapshotSink> = queue.clone();

        info!(
            stories = catalog.stories().len(),
            records = records.len(),
            "reader session started"
        );

        Self {
            catalog,
            progress: ProgressStore::restore(records, Arc::clone(&sink)),
            settings: SettingsStore::new(settings, sink),
            queue,
            storage,
            clock,
        }
    }

    /// Every story in the catalog, in catalog order.
    #[must_use]
    pub fn stories(&self) -> &[Story] {
        self.catalog.stories()
    }

    /// The loaded catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The reader's saved record for one story.
    #[must_use]
    pub fn progress(&self, story_id: &str) -> Option<&ProgressRecord> {
        self.progress.get(story_id)
    }

    /// Opens a story at the reader's current chapter.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoryNotFound` for an unknown story.
    pub fn open_story(&self, story_id: &str) -> Result<ReadingView<'_>, DomainError> {
        query_handlers::open_story(story_id, &self.catalog, &self.progress)
    }

    /// Takes a choice in the reader's current chapter.
    ///
    /// # Errors
    ///
    /// See [`command_handlers::handle_make_choice`].
    pub fn make_choice(
        &mut self,
        story_id: &str,
        choice_id: &str,
    ) -> Result<ProgressRecord, DomainError> {
        let command = MakeChoice {
            correlation_id: Uuid::new_v4(),
            story_id: story_id.to_owned(),
            choice_id: choice_id.to_owned(),
        };
        command_handlers::handle_make_choice(
            &command,
            &self.catalog,
            &mut self.progress,
            self.clock.as_ref(),
        )
    }

    /// Discards a story's progress and returns the record to resume from.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StoryNotFound` for an unknown story.
    pub fn restart_story(&mut self, story_id: &str) -> Result<ProgressRecord, DomainError> {
        let command = RestartStory {
            correlation_id: Uuid::new_v4(),
            story_id: story_id.to_owned(),
        };
        command_handlers::handle_restart_story(&command, &self.catalog, &mut self.progress)
    }

    /// Discards progress in every story.
    pub fn reset_progress(&mut self) {
        let command = ResetProgress {
            correlation_id: Uuid::new_v4(),
        };
        command_handlers::handle_reset_progress(&command, &mut self.progress);
    }

    /// The current display settings.
    #[must_use]
    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    /// Applies a partial settings change and persists the result.
    pub fn update_settings(&mut self, patch: SettingsPatch) -> Settings {
        self.settings.update(patch)
    }

    /// The reader's overall progress screen.
    #[must_use]
    pub fn progress_summary(&self) -> ProgressSummary {
        query_handlers::progress_summary(&self.catalog, &self.progress)
    }

    /// Erases all progress and settings, in memory and on disk.
    pub async fn clear_all_data(&mut self) {
        let sink: Arc<dyn SnapshotSink> = self.queue.clone();
        self.progress = ProgressStore::new(sink);
        self.settings.reset();

        // Queued snapshots would otherwise land after the removal.
        self.queue.flush().await;
        persistence::clear_all_data(self.storage.as_ref()).await;
    }

    /// Waits until every change made so far has reached storage.
    pub async fn flush(&self) {
        self.queue.flush().await;
    }

    /// Writes out pending changes and stops the session.
    pub async fn shutdown(self) {
        self.queue.shutdown().await;
        info!("reader session stopped");
    }
}
