//! # `inline_progress`
//!
//! A single-line console progress indicator for iterators.
//!
//! `inline_progress` wraps a traversal so that every step updates an
//! in-place status line (percentage, bar, elapsed time, ETA and optional
//! caller-appended text) without altering the values produced by iteration.
//! It is designed to be:
//!
//! * **Inline**: updates happen on the thread doing the work, at the loop's
//!   own termination check. No background threads, callbacks or timers.
//! * **Throttled**: redraws are bounded by a minimum interval (default
//!   150 ms), except the guaranteed first draw of a traversal and the final
//!   draw at its end.
//! * **Non-failing**: degenerate configuration (unknown totals, zero bar
//!   width, out-of-range fractions) degrades the display, never the
//!   traversal. A progress indicator must not interrupt the work it
//!   monitors.
//!
//! The ownership of the wrapped sequence follows from how it is passed:
//! `progress(&mut seq)` borrows mutably, `progress(&seq)` borrows
//! immutably, `progress(seq)` takes ownership. Borrowing from a temporary
//! the adapter would outlive is a compile error.
//!
//! ## Modules
//!
//! * [`clock`]: monotonic stopwatches (elapsed/ETA and throttle timing).
//! * [`iter`]: iterator adapters, the extension trait and the façade entry
//!   points.
//! * [`progress`](mod@progress): the core [`ProgressBar`] engine and
//!   snapshot logic.
//! * [`range`]: lazy integer sequences for iterating numeric intervals.
//! * [`timer`](mod@timer): a bar that fills over a fixed wall-clock
//!   duration.
//!
//! ## Example
//!
//! ```no_run
//! use inline_progress::progress;
//!
//! let items = vec![1, 2, 3, 4, 5];
//! let wrapped = progress(&items).with_prefix("crunching ");
//! let bar = wrapped.bar();
//! for item in wrapped {
//!     // ... work ...
//!     bar.append_suffix(item);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod clock;
pub mod iter;
pub mod progress;
pub mod range;
pub mod timer;

pub use clock::Chronometer;
pub use iter::{
    ProgressIter, ProgressIteratorExt, progress, progress_range, progress_with_total,
};
pub use progress::{ProgressBar, ProgressSnapshot};
pub use range::{IntRange, RangeValue};
pub use timer::{TimedBar, TimedIter, timer};
