//! Progress records and the transitions between them.

pub mod progress;
pub mod traversal;
