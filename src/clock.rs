//! Monotonic stopwatches for traversal timing.
//!
//! Two instances drive every progress bar: one measures the whole traversal
//! (elapsed/ETA), the other measures time since the last redraw (throttling).

use std::time::Duration;

use web_time::Instant;

/// A monotonic stopwatch with rebase-on-read semantics.
///
/// Backed by [`web_time::Instant`], so readings are immune to wall-clock
/// adjustments.
#[derive(Clone, Copy, Debug)]
pub struct Chronometer {
    start: Instant,
}

impl Chronometer {
    /// Creates a stopwatch starting now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Returns the time elapsed since the previous reset and rebases to now.
    pub fn reset(&mut self) -> Duration {
        let previous = self.start;
        self.start = Instant::now();

        self.start.duration_since(previous)
    }

    /// Returns the time elapsed since the last reset without rebasing.
    #[must_use]
    pub fn peek(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Default for Chronometer {
    fn default() -> Self {
        Self::new()
    }
}
