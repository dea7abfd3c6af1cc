//! Decision Box Core — shared abstractions.
//!
//! This crate defines the traits and types every other crate in the
//! workspace depends on: time, errors, commands and the key-value
//! persistence seam. It contains no infrastructure code.

pub mod clock;
pub mod command;
pub mod error;
pub mod storage;
