//! Metadata every reader command carries into its handler span.

use uuid::Uuid;

/// An action the reader takes against their session.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable dotted name, recorded as the `command` span field.
    fn command_type(&self) -> &'static str;

    /// Ties the handler's log lines to the action that caused them.
    fn correlation_id(&self) -> Uuid;

    /// The story the command acts on, or `None` when it spans every story.
    fn story_id(&self) -> Option<&str> {
        None
    }
}
