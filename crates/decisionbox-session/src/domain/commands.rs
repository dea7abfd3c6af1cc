//! Commands the presentation layer issues against a reading session.

use decisionbox_core::command::Command;
use uuid::Uuid;

/// Command to take a choice in the chapter the reader is on.
#[derive(Debug, Clone)]
pub struct MakeChoice {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story being read.
    pub story_id: String,
    /// The choice picked.
    pub choice_id: String,
}

impl Command for MakeChoice {
    fn command_type(&self) -> &'static str {
        "session.make_choice"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn story_id(&self) -> Option<&str> {
        Some(&self.story_id)
    }
}

/// Command to throw away a story's progress and start from its first chapter.
#[derive(Debug, Clone)]
pub struct RestartStory {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The story to restart.
    pub story_id: String,
}

impl Command for RestartStory {
    fn command_type(&self) -> &'static str {
        "session.restart_story"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }

    fn story_id(&self) -> Option<&str> {
        Some(&self.story_id)
    }
}

/// Command to erase progress in every story.
#[derive(Debug, Clone)]
pub struct ResetProgress {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ResetProgress {
    fn command_type(&self) -> &'static str {
        "session.reset_progress"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
