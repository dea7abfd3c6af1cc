//! Shared test doubles and story fixtures for the Decision Box engine.

mod clock;
pub mod fixtures;
mod sink;
mod storage;

pub use clock::{FixedClock, SteppingClock};
pub use sink::RecordingSink;
pub use storage::{FailingKeyValueStore, GatedKeyValueStore, InMemoryKeyValueStore};
