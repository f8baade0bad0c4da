//! A progress bar that fills over a fixed wall-clock duration.
//!
//! Some loops have no countable elements: polling until a deadline,
//! warming up a cache, waiting out a cooldown. [`TimedBar`] covers them:
//! iterating it yields the completed fraction on every tick until the
//! configured duration has elapsed, driving the same engine as the
//! element-counting adapters through its manual-progress path.
//!
//! ```no_run
//! use std::{thread, time::Duration};
//!
//! use inline_progress::timer;
//!
//! let bar = timer(Duration::from_secs(2));
//! bar.set_prefix("warming up ");
//! for _fraction in &bar {
//!     thread::sleep(Duration::from_millis(30));
//! }
//! ```

use std::{io::Write, time::Duration};

use compact_str::CompactString;

use crate::progress::ProgressBar;

/// A duration-driven progress bar.
///
/// Iterate it by reference; each pass is a fresh traversal of the same
/// duration. The internal step scale is one tick per millisecond of
/// duration, fine enough that the rendered tenth-of-a-percent never
/// aliases.
pub struct TimedBar {
    bar: ProgressBar,
    duration: Duration,
}

/// Creates a bar that fills over `duration` of wall-clock time.
#[must_use]
pub fn timer(duration: Duration) -> TimedBar {
    TimedBar::new(duration)
}

impl TimedBar {
    /// Creates a bar that fills over `duration` of wall-clock time.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        let ticks = (duration.as_millis() as u64).max(1);
        Self {
            bar: ProgressBar::new(ticks),
            duration,
        }
    }

    /// Returns a clone of the underlying handle.
    #[must_use]
    pub fn bar(&self) -> ProgressBar {
        self.bar.clone()
    }

    /// Sets the text rendered before the percentage block.
    pub fn set_prefix(&self, prefix: impl Into<CompactString>) {
        self.bar.set_prefix(prefix);
    }

    /// Sets the bar body width in characters.
    pub fn set_bar_width(&self, width: usize) {
        self.bar.set_bar_width(width);
    }

    /// Sets the minimum interval between two throttled redraws.
    pub fn set_min_interval(&self, interval: Duration) {
        self.bar.set_min_interval(interval);
    }

    /// Replaces the output sink (default: standard error).
    pub fn set_sink(&self, sink: impl Write + 'static) {
        self.bar.set_sink(sink);
    }
}

impl IntoIterator for &TimedBar {
    type Item = f64;
    type IntoIter = TimedIter;

    fn into_iter(self) -> Self::IntoIter {
        TimedIter {
            bar: self.bar.clone(),
            duration: self.duration,
            started: false,
            done: false,
        }
    }
}

impl IntoIterator for TimedBar {
    type Item = f64;
    type IntoIter = TimedIter;

    fn into_iter(self) -> Self::IntoIter {
        (&self).into_iter()
    }
}

/// One timed traversal: yields the completed fraction until the duration
/// has elapsed.
pub struct TimedIter {
    bar: ProgressBar,
    duration: Duration,
    started: bool,
    done: bool,
}

impl Iterator for TimedIter {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            self.bar.restart();
        }

        let elapsed = self.bar.get_elapsed().as_secs_f64();
        let total = self.duration.as_secs_f64();
        let fraction = if total > 0.0 {
            elapsed / total
        } else {
            f64::INFINITY
        };

        if fraction >= 1.0 {
            self.bar.set_fraction(1.0);
            self.bar.finish();
            self.done = true;
            return None;
        }

        self.bar.set_fraction(fraction);
        self.bar.refresh();
        Some(fraction)
    }
}

#[cfg(test)]
mod tests {
    use std::{thread, time::Duration};

    use super::timer;
    use crate::progress::test_sink::MemSink;

    /// Zero Duration
    /// An empty span completes on the first tick, with the final draw at
    /// 100%.
    #[test]
    fn test_zero_duration_completes_immediately() {
        let sink = MemSink::new();
        let bar = timer(Duration::ZERO);
        bar.set_sink(sink.clone());

        let ticks = (&bar).into_iter().count();

        assert_eq!(ticks, 0);
        assert_eq!(bar.bar().get_pos(), bar.bar().get_total());
        assert!(sink.frames().last().unwrap().contains("100.0%"));
    }

    /// Timed Traversal
    /// A short span terminates on its own, yields fractions below one on
    /// the way, and ends on a 100% frame.
    #[test]
    fn test_short_span_fills_up() {
        let sink = MemSink::new();
        let bar = timer(Duration::from_millis(40));
        bar.set_sink(sink.clone());
        bar.set_bar_width(8);

        for fraction in &bar {
            assert!((0.0..1.0).contains(&fraction));
            thread::sleep(Duration::from_millis(5));
        }

        let frames = sink.frames();
        let last = frames.last().unwrap();
        assert!(last.contains("100.0%"), "final frame: {last:?}");
        assert!(last.contains(&"#".repeat(8)));
        assert_eq!(bar.bar().get_pos(), bar.bar().get_total());
    }

    /// Restartable
    /// Iterating by reference starts a fresh traversal each time.
    #[test]
    fn test_restartable() {
        let sink = MemSink::new();
        let bar = timer(Duration::from_millis(1));
        bar.set_sink(sink.clone());

        for _ in &bar {
            thread::sleep(Duration::from_millis(1));
        }
        let frames_first = sink.frames().len();

        for _ in &bar {
            thread::sleep(Duration::from_millis(1));
        }

        assert!(sink.frames().len() > frames_first);
        assert_eq!(bar.bar().get_pos(), bar.bar().get_total());
    }
}
