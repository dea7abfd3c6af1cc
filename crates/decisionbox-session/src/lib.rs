//! Decision Box — Reader Session.
//!
//! Responsible for the reader's progress across every story, their
//! display settings, the commands and queries the presentation layer
//! invokes, and mirroring state into durable storage.

pub mod application;
pub mod domain;
pub mod persistence;
