//! Query handlers for the reading session.
//!
//! Queries combine the read-only catalog with the progress store into
//! views for the presentation layer. They never mutate anything.

use chrono::{DateTime, Utc};
use decisionbox_content::{Catalog, Chapter, Choice, EndingType, Story};
use decisionbox_core::error::DomainError;
use decisionbox_narrative::{ProgressRecord, ReadingState, completion_percentage};
use serde::Serialize;

use crate::application::command_handlers::current_chapter;
use crate::domain::store::ProgressStore;

const UNKNOWN_STORY_TITLE: &str = "Unknown Story";

/// What the reader sees when they open a story.
#[derive(Debug, Clone)]
pub struct ReadingView<'a> {
    /// The story being read.
    pub story: &'a Story,
    /// The chapter to display.
    pub chapter: &'a Chapter,
    /// The reader's record, if they have made a choice in this story.
    pub progress: Option<&'a ProgressRecord>,
    /// Where the reader stands.
    pub state: ReadingState,
    /// Rough share of the story read.
    pub percentage: f64,
}

impl ReadingView<'_> {
    /// The choices to present; empty once an ending is reached.
    #[must_use]
    pub fn offered_choices(&self) -> &[Choice] {
        self.chapter.offered_choices()
    }
}

/// Opens a story at the reader's current chapter.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` for an unknown story.
pub fn open_story<'a>(
    story_id: &str,
    catalog: &'a Catalog,
    store: &'a ProgressStore,
) -> Result<ReadingView<'a>, DomainError> {
    let story = catalog.find_story(story_id)?;
    let progress = store.get(story_id);
    let chapter = current_chapter(story, progress)?;

    Ok(ReadingView {
        story,
        chapter,
        progress,
        state: ReadingState::of(progress),
        percentage: completion_percentage(story, progress),
    })
}

/// Looks up one chapter of one story.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` for an unknown story and
/// `DomainError::ChapterNotFound` for a chapter the story does not contain.
pub fn find_chapter<'a>(
    story_id: &str,
    chapter_id: &str,
    catalog: &'a Catalog,
) -> Result<&'a Chapter, DomainError> {
    catalog
        .find_story(story_id)?
        .find_chapter(chapter_id)
        .ok_or_else(|| DomainError::ChapterNotFound {
            story_id: story_id.to_owned(),
            chapter_id: chapter_id.to_owned(),
        })
}

/// A story whose ending the reader has reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedStory {
    /// The story identifier.
    pub story_id: String,
    /// Display title.
    pub title: String,
    /// The ending reached.
    pub ending_type: Option<EndingType>,
    /// When the ending was reached.
    pub completed_at: Option<DateTime<Utc>>,
    /// Choices made on the way.
    pub choices_made: usize,
}

/// A story the reader has started but not finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InProgressStory {
    /// The story identifier.
    pub story_id: String,
    /// Display title.
    pub title: String,
    /// The chapter the reader is on.
    pub current_chapter_id: String,
    /// Rough share of the story read.
    pub percentage: f64,
    /// Choices made so far.
    pub choices_made: usize,
}

/// The reader's overall progress screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    /// Finished stories, in first-played order.
    pub completed: Vec<CompletedStory>,
    /// Started stories, in first-played order.
    pub in_progress: Vec<InProgressStory>,
    /// Choices made across every story.
    pub total_choices: usize,
}

/// Summarizes every record in the store.
///
/// Records whose story is no longer in the catalog are still listed, under
/// a placeholder title. Every record without an ending counts as in
/// progress, including one saved before any choice was made.
#[must_use]
pub fn progress_summary(catalog: &Catalog, store: &ProgressStore) -> ProgressSummary {
    let mut summary = ProgressSummary::default();

    for record in store.records() {
        let story = catalog.find_story(&record.story_id).ok();
        let title = story.map_or(UNKNOWN_STORY_TITLE, |s| s.title.as_str());
        summary.total_choices += record.choice_history.len();

        if let ReadingState::Completed(ending_type) = ReadingState::of(Some(record)) {
            summary.completed.push(CompletedStory {
                story_id: record.story_id.clone(),
                title: title.to_owned(),
                ending_type,
                completed_at: record.completed_at,
                choices_made: record.choice_history.len(),
            });
        } else {
            summary.in_progress.push(InProgressStory {
                story_id: record.story_id.clone(),
                title: title.to_owned(),
                current_chapter_id: record.current_chapter_id.clone(),
                percentage: story.map_or(0.0, |s| completion_percentage(s, Some(record))),
                choices_made: record.choice_history.len(),
            });
        }
    }

    summary
}
