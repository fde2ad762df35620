//! Monotonic run clock used to derive test durations.

use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Source of elapsed time since the start of the run.
///
/// Implementations must be monotonic: successive calls never go backwards.
pub trait Clock: Debug {
    fn elapsed(&self) -> Duration;
}

/// Wall-clock implementation backed by [`Instant`], started at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    started: Instant,
}

impl MonotonicClock {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
