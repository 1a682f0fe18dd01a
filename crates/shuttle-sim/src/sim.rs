//! The `ShuttleSim` struct and its run loop.

use shuttle_core::{SimDuration, SimTime};
use shuttle_kernel::Scheduler;
use shuttle_model::ShuttleWorld;
use tracing::{debug, info};

use crate::{RunSummary, SimObserver, SimResult, Snapshot, TripStats};

/// A ready-to-run airport shuttle simulation.
///
/// Wraps the scheduler and drives it in slices between monitor instants:
///
/// ```text
/// while the next report is due before `until`:
///   ① scheduler.run_until(report)
///   ② hand completed trips to the observer
///   ③ capture a Snapshot, hand it to the observer
/// scheduler.run_until(until)
/// ```
///
/// The monitor never touches the world, so a run reports the same results
/// whatever the monitor period.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct ShuttleSim {
    sched:       Scheduler<ShuttleWorld>,
    period:      Option<SimDuration>,
    next_report: Option<SimTime>,
    trips:       TripStats,
    peak_riders: u32,
    over_capacity_reports: u64,
}

impl ShuttleSim {
    pub(crate) fn new(sched: Scheduler<ShuttleWorld>) -> SimResult<Self> {
        let period = sched.world().config.monitor_period;
        let period = if period > 0.0 { Some(SimDuration::new(period)?) } else { None };
        Ok(Self {
            next_report: period.map(|p| SimTime::ZERO.after(p)),
            period,
            sched,
            trips: TripStats::default(),
            peak_riders: 0,
            over_capacity_reports: 0,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.sched.now()
    }

    pub fn world(&self) -> &ShuttleWorld {
        self.sched.world()
    }

    pub fn scheduler(&self) -> &Scheduler<ShuttleWorld> {
        &self.sched
    }

    pub fn end_time(&self) -> SimResult<SimTime> {
        Ok(self.world().config.end_time()?)
    }

    /// Snapshot of the current state, as the monitor would take it.
    pub fn snapshot(&self) -> SimResult<Snapshot> {
        Snapshot::capture(&self.sched)
    }

    // ── Public API ────────────────────────────────────────────────────────

    /// Run to the configured horizon.
    ///
    /// Calls observer hooks at every monitor instant and once at the end.
    /// Use [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        let end = self.end_time()?;
        self.run_until(end, observer)?;
        let summary = self.summary();
        info!(
            seed = summary.seed,
            spawned = summary.spawned,
            completed = summary.completed(),
            mean_wait = summary.trips.mean_wait(),
            aborted = summary.aborted,
            "run finished"
        );
        observer.on_sim_end(&summary);
        Ok(summary)
    }

    /// Advance to `until` (capped at the horizon), reporting along the way.
    ///
    /// Useful for tests and incremental stepping.  `on_sim_end` is not called.
    pub fn run_until<O: SimObserver>(&mut self, until: SimTime, observer: &mut O) -> SimResult<()> {
        let until = until.min(self.end_time()?);
        while let Some(report) = self.next_report.filter(|&r| r <= until) {
            self.sched.run_until(report);
            self.collect_trips(observer);
            let snapshot = self.snapshot()?;
            self.peak_riders = self.peak_riders.max(snapshot.riders);
            if snapshot.over_capacity() {
                self.over_capacity_reports += 1;
            }
            debug!(now = %report, stop = snapshot.stop.0, riders = snapshot.riders, "monitor");
            observer.on_snapshot(&snapshot);
            self.next_report = self.period.map(|p| report.after(p));
        }
        self.sched.run_until(until);
        self.collect_trips(observer);
        Ok(())
    }

    /// Statistics as of the current instant.
    pub fn summary(&self) -> RunSummary {
        let w = self.world();
        let stats = self.sched.stats();
        RunSummary {
            seed:          w.config.seed,
            final_time:    self.now(),
            spawned:       w.census.spawned,
            trips:         self.trips,
            still_waiting: w.census.on_platform(),
            still_riding:  w.census.riding,
            boardings:     w.shuttle.boardings(),
            stops_served:  w.shuttle.stops_served(),
            peak_riders:   self.peak_riders,
            over_capacity_reports: self.over_capacity_reports,
            resumptions:   stats.resumptions,
            aborted:       stats.aborted,
        }
    }

    fn collect_trips<O: SimObserver>(&mut self, observer: &mut O) {
        for trip in self.sched.world_mut().drain_trips() {
            self.trips.record(&trip);
            observer.on_trip(&trip);
        }
    }
}
