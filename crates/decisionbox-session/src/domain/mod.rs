//! Session state owned by the reader.

pub mod commands;
pub mod settings;
pub mod store;
