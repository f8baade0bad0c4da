//! Core engine for throttled, in-place progress rendering.
//!
//! This module defines [`ProgressBar`], the central handle that owns the
//! counters, stopwatches, throttling policy and render routine. It is
//! designed around a cheap-to-clone handle:
//!
//! * **Handle:** `ProgressBar` is a thin [`Rc`]-based handle. Cloning it is
//!   a pointer bump, and every clone sees the same underlying state. The
//!   iterator adapters keep one clone to drive updates while the caller
//!   keeps another to append suffix text or adjust configuration from
//!   inside the loop body.
//! * **Single-threaded:** all state is deliberately unsynchronized and the
//!   handle is `!Send`/`!Sync`. Updates happen inline on the thread doing
//!   the iteration; sharing across threads needs caller-side coordination.
//!
//! # Rendering
//!
//! A render writes one line of the form
//!
//! ```text
//! <prefix>{ 42.0%} [#############                 ] ( 1.3s < 1.8s) <suffix>
//! ```
//!
//! preceded by a carriage return so it overwrites the previous line in
//! place, padded with blanks to the widest line drawn so far, and flushed
//! immediately. Renders are throttled to at most one per
//! [`set_min_interval`](ProgressBar::set_min_interval), except the first
//! draw of a traversal and the final draw at its end, which always happen.
//!
//! # Snapshots
//!
//! [`ProgressBar::snapshot`] returns a [`ProgressSnapshot`], a plain-data
//! view of the counters at one instant with the derived completion metrics.

use std::{
    cell::RefCell,
    fmt::{self, Write as _},
    io::{self, Write},
    rc::Rc,
    time::Duration,
};

use compact_str::CompactString;

use crate::clock::Chronometer;

/// Guard against division by zero when the total is zero or unknown.
///
/// Kept tiny on purpose: a zero total makes any nonzero count render as a
/// huge percentage rather than halting the traversal.
const TOTAL_EPSILON: f64 = 1e-13;

/// Default bar body width, in characters.
const DEFAULT_BAR_WIDTH: usize = 30;

/// Default minimum interval between two redraws.
///
/// Found experimentally: bounds redraw overhead without looking laggy.
const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(150);

/// A cheap-to-clone handle to a single-line console progress indicator.
///
/// `ProgressBar` accumulates completed steps against a (possibly unknown)
/// total and redraws a throttled status line on an output sink. It is
/// normally driven by the iterator adapters in [`iter`](crate::iter), but
/// every operation is public so a loop with no natural iterator can drive
/// it by hand via [`update`](Self::update) or
/// [`set_fraction`](Self::set_fraction) + [`refresh`](Self::refresh).
///
/// Cloning a `ProgressBar` is cheap (`Rc` bump) and points to the same
/// underlying state.
#[derive(Clone)]
pub struct ProgressBar {
    state: Rc<RefCell<BarState>>,
}

struct BarState {
    /// Completed steps this traversal. Compared against `total` unclamped,
    /// so overshooting the declared total renders above 100%.
    iterations_done: u64,
    /// Denominator for the completion ratio. 0 means unknown.
    total: u64,

    /// Measures the whole traversal (elapsed/ETA).
    chronometer: Chronometer,
    /// Measures time since the last redraw (throttling).
    refresh: Chronometer,
    min_interval: Duration,

    prefix: CompactString,
    /// Caller-appended text shown after the timing block on the next
    /// render, then cleared.
    suffix: String,

    bar_width: usize,
    /// Widest line drawn so far; shorter lines pad up to it so an
    /// overwritten line leaves no stale tail characters.
    widest: usize,

    sink: Box<dyn Write>,
}

impl ProgressBar {
    /// Creates a bar expecting `total` steps, rendering to standard error.
    #[must_use]
    pub fn new(total: impl Into<u64>) -> Self {
        Self {
            state: Rc::new(RefCell::new(BarState {
                iterations_done: 0,
                total: total.into(),
                chronometer: Chronometer::new(),
                refresh: Chronometer::new(),
                min_interval: DEFAULT_MIN_INTERVAL,
                prefix: CompactString::default(),
                suffix: String::new(),
                bar_width: DEFAULT_BAR_WIDTH,
                widest: 0,
                sink: Box::new(io::stderr()),
            })),
        }
    }

    /// Creates a bar with an unknown total.
    ///
    /// The completion ratio is epsilon-guarded rather than special-cased,
    /// so percentages and ETA are meaningless until a real total is set via
    /// [`set_total`](Self::set_total). The traversal itself is unaffected.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(0_u64)
    }

    // ========================================================================
    // Traversal lifecycle
    // ========================================================================

    /// Starts a fresh traversal: resets both stopwatches and the step
    /// counter.
    ///
    /// Safe to call any number of times; each call re-enters the running
    /// state cleanly, independent of prior traversals.
    pub fn restart(&self) {
        let mut s = self.state.borrow_mut();
        s.chronometer.reset();
        s.refresh.reset();
        s.iterations_done = 0;
    }

    /// Records one completed step and redraws if due.
    ///
    /// A redraw happens when the throttle interval has elapsed, or
    /// unconditionally while no step has completed yet (the guaranteed
    /// first draw of a traversal). Afterwards, drawn or not, the step
    /// counter is incremented and the suffix buffer is cleared.
    pub fn update(&self) {
        let mut s = self.state.borrow_mut();

        if s.iterations_done == 0 || s.refresh.peek() > s.min_interval {
            s.refresh.reset();
            s.render();
        }

        s.iterations_done += 1;
        s.suffix.clear();
    }

    /// Redraws unconditionally: the final draw when a traversal reaches its
    /// end marker.
    ///
    /// Exempt from throttling so a completed traversal always shows its
    /// final counts (100% when the step count matches the total).
    pub fn finish(&self) {
        let mut s = self.state.borrow_mut();
        s.refresh.reset();
        s.render();
        s.suffix.clear();
    }

    /// Redraws if due, without counting a step.
    ///
    /// This drives progress reported via [`set_fraction`](Self::set_fraction)
    /// (no discrete elements to count). The throttle exemptions match
    /// [`update`](Self::update): a bar at 0% or at/past its total always
    /// draws.
    pub fn refresh(&self) {
        let mut s = self.state.borrow_mut();

        let at_start = s.iterations_done == 0;
        let at_end = s.total != 0 && s.iterations_done >= s.total;
        if at_start || at_end || s.refresh.peek() > s.min_interval {
            s.refresh.reset();
            s.render();
        }

        s.suffix.clear();
    }

    // ========================================================================
    // Progress input
    // ========================================================================

    /// Serializes `value` and appends it to the suffix buffer.
    ///
    /// The buffer is shown after the timing block on the next render and
    /// cleared after each update cycle whether or not a render happened.
    /// Returns `&self` so appends chain.
    pub fn append_suffix(&self, value: impl fmt::Display) -> &Self {
        let mut s = self.state.borrow_mut();
        // Writing into a String cannot fail.
        let _ = write!(s.suffix, "{value}");
        drop(s);
        self
    }

    /// Overrides the automatic step counting with an explicit completion
    /// fraction.
    ///
    /// `fraction` is clamped to `[0, 1]` and scaled by the total:
    /// `iterations_done = round(fraction * total)`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn set_fraction(&self, fraction: f64) {
        let mut s = self.state.borrow_mut();
        let fraction = fraction.clamp(0.0, 1.0);
        s.iterations_done = (fraction * s.total as f64).round() as u64;
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Sets the text rendered before the percentage block.
    pub fn set_prefix(&self, prefix: impl Into<CompactString>) {
        self.state.borrow_mut().prefix = prefix.into();
    }

    /// Sets the bar body width in characters.
    ///
    /// Degenerate widths are not rejected; width 0 renders an empty bracket
    /// pair.
    pub fn set_bar_width(&self, width: usize) {
        self.state.borrow_mut().bar_width = width;
    }

    /// Sets the minimum interval between two throttled redraws.
    pub fn set_min_interval(&self, interval: Duration) {
        self.state.borrow_mut().min_interval = interval;
    }

    /// Replaces the output sink. The default is standard error.
    ///
    /// Writes are best-effort: a sink error degrades the display but never
    /// interrupts the traversal being monitored.
    pub fn set_sink(&self, sink: impl Write + 'static) {
        self.state.borrow_mut().sink = Box::new(sink);
    }

    /// Updates the total step count used as the completion denominator.
    pub fn set_total(&self, total: u64) {
        self.state.borrow_mut().total = total;
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Gets the number of steps completed this traversal.
    #[must_use]
    pub fn get_pos(&self) -> u64 {
        self.state.borrow().iterations_done
    }

    /// Gets the total step count (0 when unknown).
    #[must_use]
    pub fn get_total(&self) -> u64 {
        self.state.borrow().total
    }

    /// Gets the time elapsed since the traversal started.
    #[must_use]
    pub fn get_elapsed(&self) -> Duration {
        self.state.borrow().chronometer.peek()
    }

    /// Creates a consistent snapshot of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        let s = self.state.borrow();
        ProgressSnapshot {
            position: s.iterations_done,
            total: s.total,
            elapsed: s.chronometer.peek(),
        }
    }
}

impl Default for ProgressBar {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl fmt::Debug for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.state.borrow();
        f.debug_struct("ProgressBar")
            .field("iterations_done", &s.iterations_done)
            .field("total", &s.total)
            .field("bar_width", &s.bar_width)
            .finish_non_exhaustive()
    }
}

impl BarState {
    /// Composes and writes one status line.
    ///
    /// The completion ratio is not clamped: counts past the total display
    /// above 100% (the glyph repeat counts saturate at the bar width, the
    /// percentage does not).
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    fn render(&mut self) {
        let completion = self.iterations_done as f64 / (self.total as f64 + TOTAL_EPSILON);
        let elapsed = self.chronometer.peek().as_secs_f64();
        // NaN at rest, huge near 0%; accepted so the traversal is never
        // interrupted.
        let eta = elapsed / completion - elapsed;

        let filled =
            ((completion * self.bar_width as f64).round().max(0.0) as usize).min(self.bar_width);

        let mut line = String::new();
        let _ = write!(line, "{}{{{:4.1}%}} [", self.prefix, 100.0 * completion);
        for _ in 0..filled {
            line.push('#');
        }
        for _ in filled..self.bar_width {
            line.push(' ');
        }
        let _ = write!(line, "] ({elapsed:4.1}s < {eta:.1}s) {}", self.suffix);

        self.widest = self.widest.max(line.len());

        let widest = self.widest;
        let _ = write!(self.sink, "\r{line:<widest$}");
        let _ = self.sink.flush();
    }
}

/// A plain-data snapshot of a [`ProgressBar`]'s counters at one instant.
///
/// Holds owned data, so it can be inspected (or serialized, with the
/// `serde` feature) without touching the live bar.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressSnapshot {
    position: u64,
    total: u64,
    elapsed: Duration,
}

impl ProgressSnapshot {
    /// Returns the number of completed steps.
    #[must_use]
    pub const fn position(&self) -> u64 {
        self.position
    }

    /// Returns the total step count (0 when unknown).
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Returns the elapsed traversal time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Returns the completion percentage, using the same epsilon-guarded,
    /// unclamped ratio as the renderer. Overshooting the total yields
    /// values above 100.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn percent(&self) -> f64 {
        100.0 * self.position as f64 / (self.total as f64 + TOTAL_EPSILON)
    }

    /// Returns the estimated seconds remaining: elapsed scaled by the
    /// uncompleted share. NaN or huge near 0% completion, negative past
    /// 100%: the renderer's quirks, reproduced rather than masked.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn eta_secs(&self) -> f64 {
        let completion = self.position as f64 / (self.total as f64 + TOTAL_EPSILON);
        let elapsed = self.elapsed.as_secs_f64();
        elapsed / completion - elapsed
    }
}
