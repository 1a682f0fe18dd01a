//! End-of-run statistics.

use std::fmt;

use shuttle_core::SimTime;
use shuttle_model::TripRecord;

/// Running totals over completed trips.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TripStats {
    pub count:    u64,
    pub wait_sum: f64,
    pub wait_max: f64,
    pub ride_sum: f64,
    pub ride_max: f64,
}

impl TripStats {
    pub fn record(&mut self, trip: &TripRecord) {
        let (wait, ride) = (trip.wait(), trip.ride());
        self.count += 1;
        self.wait_sum += wait;
        self.ride_sum += ride;
        self.wait_max = self.wait_max.max(wait);
        self.ride_max = self.ride_max.max(ride);
    }

    pub fn mean_wait(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.wait_sum / self.count as f64 }
    }

    pub fn mean_ride(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.ride_sum / self.count as f64 }
    }
}

/// What a finished (or paused) run looks like.
#[derive(Clone, Debug, PartialEq)]
pub struct RunSummary {
    pub seed:          u64,
    pub final_time:    SimTime,
    /// Passengers who joined a line.
    pub spawned:       u64,
    pub trips:         TripStats,
    /// Still in a line at the end.
    pub still_waiting: u64,
    /// Still aboard at the end.
    pub still_riding:  u64,
    pub boardings:     u64,
    pub stops_served:  u64,
    /// Most riders aboard at any monitor instant.
    pub peak_riders:   u32,
    /// Monitor instants at which riders outnumbered seats.
    pub over_capacity_reports: u64,
    pub resumptions:   u64,
    /// Processes dropped after an error.  Zero in a healthy run.
    pub aborted:       u64,
}

impl RunSummary {
    #[inline]
    pub fn completed(&self) -> u64 {
        self.trips.count
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "seed {} finished at {}", self.seed, self.final_time)?;
        writeln!(f, "  passengers spawned     {:>10}", self.spawned)?;
        writeln!(f, "  trips completed        {:>10}", self.trips.count)?;
        writeln!(f, "  mean / max wait        {:>10.2} / {:.2}", self.trips.mean_wait(), self.trips.wait_max)?;
        writeln!(f, "  mean / max ride        {:>10.2} / {:.2}", self.trips.mean_ride(), self.trips.ride_max)?;
        writeln!(f, "  still waiting / riding {:>10} / {}", self.still_waiting, self.still_riding)?;
        writeln!(f, "  boardings              {:>10}", self.boardings)?;
        writeln!(f, "  stops served           {:>10}", self.stops_served)?;
        writeln!(f, "  peak riders            {:>10}", self.peak_riders)?;
        writeln!(f, "  over-capacity reports  {:>10}", self.over_capacity_reports)?;
        write!(f, "  aborted processes      {:>10}", self.aborted)
    }
}
