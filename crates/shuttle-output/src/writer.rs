//! The `OutputWriter` trait implemented by all backend writers.

use crate::{OutputResult, ShuttleRow, StopRow, TripRow};

/// Trait implemented by output backends.
///
/// All methods are infallible from the observer's perspective — errors are
/// stored internally and retrieved with
/// [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write one monitor instant: the shuttle row and one row per stop.
    fn write_snapshot(&mut self, shuttle: &ShuttleRow, stops: &[StopRow]) -> OutputResult<()>;

    /// Write one completed trip.
    fn write_trip(&mut self, row: &TripRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent — safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
