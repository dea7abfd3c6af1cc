//! Command handlers for the reading session.
//!
//! Each handler resolves what it needs from the catalog, runs the pure
//! traversal function and writes the outcome to the progress store, which
//! in turn queues the snapshot for persistence. Handlers never await.

use decisionbox_content::{Catalog, Chapter, Story};
use decisionbox_core::clock::Clock;
use decisionbox_core::command::Command;
use decisionbox_core::error::DomainError;
use decisionbox_narrative::{ProgressRecord, apply_choice, restart};
use tracing::{error, info, instrument, warn};

use crate::domain::commands::{MakeChoice, ResetProgress, RestartStory};
use crate::domain::store::ProgressStore;

/// The chapter the reader is on: the one named by their record, or the
/// first chapter when there is no record.
///
/// A record pointing at a chapter the story no longer has (the bundled
/// dataset changed between releases) falls back to the first chapter.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the story has no chapters at all.
pub(crate) fn current_chapter<'a>(
    story: &'a Story,
    record: Option<&ProgressRecord>,
) -> Result<&'a Chapter, DomainError> {
    if let Some(record) = record {
        if let Some(chapter) = story.find_chapter(&record.current_chapter_id) {
            return Ok(chapter);
        }
        warn!(
            story_id = %story.id,
            chapter_id = %record.current_chapter_id,
            "saved chapter no longer exists, falling back to the first chapter"
        );
    }
    story
        .first_chapter()
        .ok_or_else(|| DomainError::Validation(format!("story {} has no chapters", story.id)))
}

/// Handles the `MakeChoice` command: resolves the story, the reader's current
/// chapter and the offered choice, applies it, and upserts the new record.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` for an unknown story,
/// `DomainError::StoryCompleted` if an ending was already reached,
/// `DomainError::ChoiceNotFound` if the current chapter does not offer the
/// choice, and `DomainError::BrokenReference` if the choice leads nowhere.
/// The store is untouched on every error.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        story_id = command.story_id(),
        choice_id = %command.choice_id,
    )
)]
pub fn handle_make_choice(
    command: &MakeChoice,
    catalog: &Catalog,
    store: &mut ProgressStore,
    clock: &dyn Clock,
) -> Result<ProgressRecord, DomainError> {
    let story = catalog.find_story(&command.story_id)?;
    choose_in_story(story, &command.choice_id, store, clock)
}

/// Applies `choice_id` in `story` at the reader's current chapter and
/// upserts the result. Nothing reaches the store unless every step succeeds.
fn choose_in_story(
    story: &Story,
    choice_id: &str,
    store: &mut ProgressStore,
    clock: &dyn Clock,
) -> Result<ProgressRecord, DomainError> {
    let prior = store.get(&story.id);

    if prior.is_some_and(|r| r.is_completed) {
        return Err(DomainError::StoryCompleted(story.id.clone()));
    }

    let chapter = current_chapter(story, prior)?;
    let choice = chapter
        .find_offered_choice(choice_id)
        .ok_or_else(|| DomainError::ChoiceNotFound {
            chapter_id: chapter.id.clone(),
            choice_id: choice_id.to_owned(),
        })?;

    let record = apply_choice(story, chapter, prior, choice, clock).inspect_err(|e| {
        error!(error = %e, "choice refused, story data is inconsistent");
    })?;

    info!(
        chapter_id = %record.current_chapter_id,
        is_completed = record.is_completed,
        "choice recorded"
    );
    store.upsert(record.clone());
    Ok(record)
}

/// Handles the `RestartStory` command: drops the story's record so the story
/// is back to not started, and returns the fresh record to display.
///
/// # Errors
///
/// Returns `DomainError::StoryNotFound` for an unknown story.
#[instrument(
    skip_all,
    fields(
        command = command.command_type(),
        correlation_id = %command.correlation_id,
        story_id = command.story_id(),
    )
)]
pub fn handle_restart_story(
    command: &RestartStory,
    catalog: &Catalog,
    store: &mut ProgressStore,
) -> Result<ProgressRecord, DomainError> {
    let story = catalog.find_story(&command.story_id)?;
    let fresh = restart(story)?;

    if store.remove_story(&story.id).is_some() {
        info!("story progress discarded");
    }
    Ok(fresh)
}

/// Handles the `ResetProgress` command: empties the progress store.
#[instrument(
    skip_all,
    fields(command = command.command_type(), correlation_id = %command.correlation_id)
)]
pub fn handle_reset_progress(command: &ResetProgress, store: &mut ProgressStore) {
    let discarded = store.records().len();
    store.replace_all(Vec::new());
    info!(discarded, "all progress reset");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use decisionbox_content::EndingType;
    use decisionbox_core::error::DomainError;
    use decisionbox_core::storage::PROGRESS_KEY;
    use decisionbox_narrative::{ProgressRecord, completion_percentage};
    use decisionbox_test_support::fixtures::{self, chapter, choice, story};
    use decisionbox_test_support::{FixedClock, RecordingSink};
    use uuid::Uuid;

    use crate::application::command_handlers::{
        choose_in_story, handle_make_choice, handle_reset_progress, handle_restart_story,
    };
    use crate::domain::commands::{MakeChoice, ResetProgress, RestartStory};
    use crate::domain::store::ProgressStore;

    fn make_choice(story_id: &str, choice_id: &str) -> MakeChoice {
        MakeChoice {
            correlation_id: Uuid::new_v4(),
            story_id: story_id.to_owned(),
            choice_id: choice_id.to_owned(),
        }
    }

    #[test]
    fn test_first_choice_creates_record_and_persists_it() {
        // Arrange
        let catalog = fixtures::catalog();
        let sink = Arc::new(RecordingSink::new());
        let mut store = ProgressStore::new(sink.clone());
        let clock = FixedClock::reference();

        // Act
        let record =
            handle_make_choice(&make_choice("demo", "a"), &catalog, &mut store, &clock).unwrap();

        // Assert
        assert_eq!(record.current_chapter_id, "c2");
        assert!(record.is_completed);
        assert_eq!(record.ending_type, Some(EndingType::Good));
        assert_eq!(store.get("demo"), Some(&record));
        let persisted: Vec<ProgressRecord> =
            serde_json::from_str(&sink.last_for(PROGRESS_KEY).unwrap()).unwrap();
        assert_eq!(persisted, vec![record.clone()]);
        let demo = catalog.find_story("demo").unwrap();
        assert!((completion_percentage(demo, Some(&record)) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_successive_choices_continue_from_stored_chapter() {
        let catalog = fixtures::catalog();
        let mut store = ProgressStore::new(Arc::new(RecordingSink::new()));
        let clock = FixedClock::reference();

        handle_make_choice(&make_choice("linear", "next"), &catalog, &mut store, &clock).unwrap();
        let second =
            handle_make_choice(&make_choice("linear", "next"), &catalog, &mut store, &clock)
                .unwrap();

        assert_eq!(second.current_chapter_id, "c3");
        assert_eq!(second.choice_history.len(), 2);
        assert_eq!(second.choice_history[1].chapter_id, "c2");
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_completed_story_refuses_further_choices() {
        // Arrange
        let catalog = fixtures::catalog();
        let sink = Arc::new(RecordingSink::new());
        let mut store = ProgressStore::new(sink.clone());
        let clock = FixedClock::reference();
        handle_make_choice(&make_choice("lighthouse", "climb"), &catalog, &mut store, &clock)
            .unwrap();
        let before = store.get("lighthouse").cloned();

        // Act: `top` lists a `descend` choice but is an ending.
        let result = handle_make_choice(
            &make_choice("lighthouse", "descend"),
            &catalog,
            &mut store,
            &clock,
        );

        // Assert
        assert_eq!(
            result.unwrap_err(),
            DomainError::StoryCompleted("lighthouse".to_owned())
        );
        assert_eq!(store.get("lighthouse").cloned(), before);
        assert_eq!(sink.submitted().len(), 1);
    }

    #[test]
    fn test_choice_not_offered_by_current_chapter_is_rejected() {
        let catalog = fixtures::catalog();
        let mut store = ProgressStore::new(Arc::new(RecordingSink::new()));

        let result = handle_make_choice(
            &make_choice("lighthouse", "sleep"),
            &catalog,
            &mut store,
            &FixedClock::reference(),
        );

        assert_eq!(
            result.unwrap_err(),
            DomainError::ChoiceNotFound {
                chapter_id: "c1".to_owned(),
                choice_id: "sleep".to_owned(),
            }
        );
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_unknown_story_is_not_found() {
        let catalog = fixtures::catalog();
        let mut store = ProgressStore::new(Arc::new(RecordingSink::new()));

        let result = handle_make_choice(
            &make_choice("missing", "a"),
            &catalog,
            &mut store,
            &FixedClock::reference(),
        );

        assert_eq!(
            result.unwrap_err(),
            DomainError::StoryNotFound("missing".to_owned())
        );
    }

    #[test]
    fn test_broken_reference_leaves_store_and_sink_untouched() {
        // Arrange: a graph catalog validation would refuse, with the reader
        // already one step in.
        let corrupt = story(
            "corrupt",
            vec![
                chapter("c1", vec![choice("on", "c2")]),
                chapter("c2", vec![choice("off", "gone")]),
            ],
        );
        let sink = Arc::new(RecordingSink::new());
        let mut store = ProgressStore::new(sink.clone());
        let clock = FixedClock::reference();
        choose_in_story(&corrupt, "on", &mut store, &clock).unwrap();
        let before = store.get("corrupt").cloned();
        let submitted_before = sink.submitted().len();

        // Act
        let result = choose_in_story(&corrupt, "off", &mut store, &clock);

        // Assert
        assert_eq!(
            result.unwrap_err(),
            DomainError::BrokenReference {
                story_id: "corrupt".to_owned(),
                choice_id: "off".to_owned(),
                next_chapter_id: "gone".to_owned(),
            }
        );
        assert_eq!(store.get("corrupt").cloned(), before);
        assert_eq!(store.records().len(), 1);
        assert_eq!(sink.submitted().len(), submitted_before);
    }

    #[test]
    fn test_saved_chapter_missing_from_story_falls_back_to_first_chapter() {
        // Arrange
        let catalog = fixtures::catalog();
        let mut store = ProgressStore::restore(
            vec![ProgressRecord {
                story_id: "linear".to_owned(),
                current_chapter_id: "removed-in-update".to_owned(),
                choice_history: Vec::new(),
                is_completed: false,
                completed_at: None,
                ending_type: None,
            }],
            Arc::new(RecordingSink::new()),
        );

        // Act
        let record = handle_make_choice(
            &make_choice("linear", "next"),
            &catalog,
            &mut store,
            &FixedClock::reference(),
        )
        .unwrap();

        // Assert
        assert_eq!(record.choice_history[0].chapter_id, "c1");
        assert_eq!(record.current_chapter_id, "c2");
    }

    #[test]
    fn test_restart_discards_record_and_returns_fresh_one() {
        // Arrange
        let catalog = fixtures::catalog();
        let sink = Arc::new(RecordingSink::new());
        let mut store = ProgressStore::new(sink.clone());
        let clock = FixedClock::reference();
        handle_make_choice(&make_choice("demo", "a"), &catalog, &mut store, &clock).unwrap();

        // Act
        let fresh = handle_restart_story(
            &RestartStory {
                correlation_id: Uuid::new_v4(),
                story_id: "demo".to_owned(),
            },
            &catalog,
            &mut store,
        )
        .unwrap();

        // Assert
        assert_eq!(fresh.current_chapter_id, "c1");
        assert!(fresh.choice_history.is_empty());
        assert!(!fresh.is_completed);
        assert!(store.get("demo").is_none());
        assert_eq!(sink.last_for(PROGRESS_KEY).unwrap(), "[]");

        // A restarted story can be played again.
        let again =
            handle_make_choice(&make_choice("demo", "a"), &catalog, &mut store, &clock).unwrap();
        assert_eq!(again.choice_history.len(), 1);
    }

    #[test]
    fn test_restart_unknown_story_is_not_found() {
        let catalog = fixtures::catalog();
        let mut store = ProgressStore::new(Arc::new(RecordingSink::new()));

        let result = handle_restart_story(
            &RestartStory {
                correlation_id: Uuid::new_v4(),
                story_id: "nope".to_owned(),
            },
            &catalog,
            &mut store,
        );

        assert_eq!(result.unwrap_err(), DomainError::StoryNotFound("nope".to_owned()));
    }

    #[test]
    fn test_reset_progress_empties_store() {
        let catalog = fixtures::catalog();
        let sink = Arc::new(RecordingSink::new());
        let mut store = ProgressStore::new(sink.clone());
        let clock = FixedClock::reference();
        handle_make_choice(&make_choice("demo", "a"), &catalog, &mut store, &clock).unwrap();
        handle_make_choice(&make_choice("linear", "next"), &catalog, &mut store, &clock).unwrap();

        handle_reset_progress(
            &ResetProgress {
                correlation_id: Uuid::new_v4(),
            },
            &mut store,
        );

        assert!(store.records().is_empty());
        assert_eq!(sink.last_for(PROGRESS_KEY).unwrap(), "[]");
    }
}
