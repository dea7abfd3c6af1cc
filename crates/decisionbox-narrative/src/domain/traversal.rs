//! Choice application, ending detection and completion percentage.

use decisionbox_content::{Chapter, Choice, Story};
use decisionbox_core::clock::Clock;
use decisionbox_core::error::DomainError;
use tracing::debug;

use super::progress::{ChoiceRecord, ProgressRecord};

/// Computes the record that results from taking `choice` in `current_chapter`.
///
/// The prior record is never modified: its history is copied and the new
/// step appended to the copy. Persisting the result is the caller's job.
/// A single clock reading stamps both the history entry and `completed_at`.
///
/// # Errors
///
/// Returns `DomainError::BrokenReference` if the choice targets a chapter the
/// story does not contain. No record is produced in that case.
pub fn apply_choice(
    story: &Story,
    current_chapter: &Chapter,
    prior: Option<&ProgressRecord>,
    choice: &Choice,
    clock: &dyn Clock,
) -> Result<ProgressRecord, DomainError> {
    let Some(next_chapter) = story.find_chapter(&choice.next_chapter_id) else {
        return Err(DomainError::BrokenReference {
            story_id: story.id.clone(),
            choice_id: choice.id.clone(),
            next_chapter_id: choice.next_chapter_id.clone(),
        });
    };

    let now = clock.now_millis();
    let is_terminal = next_chapter.is_terminal();

    let mut choice_history = prior
        .map(|r| r.choice_history.clone())
        .unwrap_or_default();
    choice_history.push(ChoiceRecord {
        chapter_id: current_chapter.id.clone(),
        choice_id: choice.id.clone(),
        timestamp: now,
    });

    debug!(
        story_id = %story.id,
        from = %current_chapter.id,
        to = %next_chapter.id,
        is_terminal,
        "choice applied"
    );

    Ok(ProgressRecord {
        story_id: story.id.clone(),
        current_chapter_id: next_chapter.id.clone(),
        choice_history,
        is_completed: is_terminal,
        completed_at: is_terminal.then_some(now),
        ending_type: next_chapter.ending_type,
    })
}

/// Rough share of the story read, in `[0, 100]`.
///
/// This is a chapter-count heuristic, not an exact fraction: branching
/// graphs have no single length, so the number of choices made plus the
/// chapter currently open is divided by the total chapter count and capped
/// at 100. A completed record is always 100; no record is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn completion_percentage(story: &Story, record: Option<&ProgressRecord>) -> f64 {
    let Some(record) = record else {
        return 0.0;
    };
    if record.is_completed {
        return 100.0;
    }
    if story.chapters.is_empty() {
        return 0.0;
    }

    let read = (record.choice_history.len() + 1) as f64;
    (read / story.chapters.len() as f64 * 100.0).min(100.0)
}

/// A fresh record at the story's first chapter with an empty history.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the story has no chapters, which a
/// validated catalog never contains.
pub fn restart(story: &Story) -> Result<ProgressRecord, DomainError> {
    let first = story.first_chapter().ok_or_else(|| {
        DomainError::Validation(format!("story {} has no chapters", story.id))
    })?;

    Ok(ProgressRecord {
        story_id: story.id.clone(),
        current_chapter_id: first.id.clone(),
        choice_history: Vec::new(),
        is_completed: false,
        completed_at: None,
        ending_type: None,
    })
}
