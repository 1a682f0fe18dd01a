//! Simulation observer trait for status reporting and data collection.

use shuttle_model::TripRecord;

use crate::{RunSummary, Snapshot};

/// Callbacks invoked by [`ShuttleSim::run`][crate::ShuttleSim::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.  Observers only read; nothing they do feeds
/// back into the run.
///
/// # Example — status printer
///
/// ```rust,ignore
/// struct StatusPrinter;
///
/// impl SimObserver for StatusPrinter {
///     fn on_snapshot(&mut self, snapshot: &Snapshot) {
///         println!("{snapshot}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called every `monitor_period` time units.
    fn on_snapshot(&mut self, _snapshot: &Snapshot) {}

    /// Called once for every passenger who reached their destination, in
    /// the order they alighted.
    fn on_trip(&mut self, _trip: &TripRecord) {}

    /// Called once after the clock reaches the horizon.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
