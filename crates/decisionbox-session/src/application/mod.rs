//! Command and query handlers invoked by the presentation layer.

pub mod command_handlers;
pub mod query_handlers;
