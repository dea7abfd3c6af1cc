//! Durable mirroring of session state.

pub mod snapshot;
pub mod write_queue;

pub use snapshot::{clear_all_data, load_progress, load_settings};
pub use write_queue::WriteQueue;
