//! Clock abstraction for deterministic timestamps.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// Abstraction over system time so traversal timestamps can be pinned in tests.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current time truncated to whole milliseconds.
    ///
    /// Progress records are persisted with millisecond resolution, so every
    /// timestamp written into a record goes through this method to keep the
    /// in-memory copy equal to what a later load returns.
    fn now_millis(&self) -> DateTime<Utc> {
        let now = self.now();
        now.duration_trunc(TimeDelta::milliseconds(1)).unwrap_or(now)
    }
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
