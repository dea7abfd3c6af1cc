//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Nothing in this enum is fatal to the process: lookups degrade to a
/// "not found" view, refused transitions leave progress untouched, and
/// persistence failures only mean a snapshot was not saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A story id is absent from the catalog.
    #[error("story not found: {0}")]
    StoryNotFound(String),

    /// A chapter id is absent from its story.
    #[error("chapter {chapter_id} not found in story {story_id}")]
    ChapterNotFound {
        /// The story that was searched.
        story_id: String,
        /// The chapter that could not be resolved.
        chapter_id: String,
    },

    /// A choice id is not offered by the current chapter.
    #[error("choice {choice_id} is not offered by chapter {chapter_id}")]
    ChoiceNotFound {
        /// The chapter the reader is on.
        chapter_id: String,
        /// The requested choice.
        choice_id: String,
    },

    /// A choice points at a chapter that does not exist in the story.
    #[error("choice {choice_id} in story {story_id} points to missing chapter {next_chapter_id}")]
    BrokenReference {
        /// The story containing the defect.
        story_id: String,
        /// The offending choice.
        choice_id: String,
        /// The unresolved target chapter id.
        next_chapter_id: String,
    },

    /// The story has already reached an ending; only a restart leaves it.
    #[error("story already completed: {0}")]
    StoryCompleted(String),

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// A read or write against the persistence collaborator failed.
    #[error("persistence error: {0}")]
    Persistence(String),
}
