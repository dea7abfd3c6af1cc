//! The reader's traversal state for one story.

use chrono::{DateTime, Utc};
use decisionbox_content::EndingType;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// One step of the reader's path: the choice taken and where it was taken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceRecord {
    /// The chapter the choice was made in.
    pub chapter_id: String,
    /// The choice taken.
    pub choice_id: String,
    /// When the choice was made, persisted as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

/// Progress of one reader through one story.
///
/// `is_completed` holds exactly when `current_chapter_id` is a terminal
/// chapter reached through a choice. `choice_history` only grows during
/// play and is emptied by a restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// The story this record belongs to.
    pub story_id: String,
    /// The chapter the reader is on.
    pub current_chapter_id: String,
    /// Every choice made, oldest first.
    #[serde(default)]
    pub choice_history: Vec<ChoiceRecord>,
    /// Whether an ending has been reached.
    #[serde(default)]
    pub is_completed: bool,
    /// When the ending was reached.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "chrono::serde::ts_milliseconds_option"
    )]
    pub completed_at: Option<DateTime<Utc>>,
    /// Ending classification of the current chapter. Unrecognised names
    /// read back as `None` rather than rejecting the record.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_ending_type"
    )]
    pub ending_type: Option<EndingType>,
}

fn lenient_ending_type<'de, D>(deserializer: D) -> Result<Option<EndingType>, D::Error>
where
    D: Deserializer<'de>,
{
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.and_then(|name| {
        let parsed = EndingType::from_wire(&name);
        if parsed.is_none() {
            warn!(ending_type = %name, "unrecognised saved ending type ignored");
        }
        parsed
    }))
}

/// Where a reader stands in a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadingState {
    /// No choice made yet.
    NotStarted,
    /// At least one choice made, no ending reached.
    InProgress,
    /// An ending was reached; only a restart leaves this state.
    Completed(Option<EndingType>),
}

impl ReadingState {
    /// Classifies a (possibly absent) record.
    #[must_use]
    pub fn of(record: Option<&ProgressRecord>) -> Self {
        match record {
            Some(r) if r.is_completed => Self::Completed(r.ending_type),
            Some(r) if !r.choice_history.is_empty() => Self::InProgress,
            _ => Self::NotStarted,
        }
    }
}
