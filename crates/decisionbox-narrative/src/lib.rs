//! Decision Box — Traversal Engine.
//!
//! Pure functions over a story, the reader's progress record and a choice.
//! Nothing here touches storage or holds state: callers own the records and
//! decide when to persist them.

pub mod domain;

pub use domain::progress::{ChoiceRecord, ProgressRecord, ReadingState};
pub use domain::traversal::{apply_choice, completion_percentage, restart};
