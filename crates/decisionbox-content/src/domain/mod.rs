//! Story graph types and their integrity rules.

pub mod story;
pub mod validation;
