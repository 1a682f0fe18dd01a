//! Plain data row types written by output backends.

use shuttle_model::{Direction, TripRecord};
use shuttle_sim::{Snapshot, StopSnapshot};

/// The shuttle's state at one monitor instant.
#[derive(Debug, Clone, PartialEq)]
pub struct ShuttleRow {
    pub time:          f64,
    pub stop:          u16,
    pub direction:     &'static str,
    pub phase:         String,
    pub next_stop:     u16,
    pub riders:        u32,
    pub seats:         u32,
    pub over_capacity: bool,
    pub spawned:       u64,
    pub alighted:      u64,
}

impl From<&Snapshot> for ShuttleRow {
    fn from(s: &Snapshot) -> Self {
        Self {
            time:          s.time.as_f64(),
            stop:          s.stop.0,
            direction:     match s.direction {
                Direction::Up => "up",
                Direction::Down => "down",
            },
            phase:         s.phase.to_string(),
            next_stop:     s.next_stop.0,
            riders:        s.riders,
            seats:         s.seats,
            over_capacity: s.over_capacity(),
            spawned:       s.census.spawned,
            alighted:      s.census.alighted,
        }
    }
}

/// One stop at one monitor instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopRow {
    pub time:            f64,
    pub stop:            u16,
    pub pending_pickup:  u32,
    pub pending_dropoff: u32,
    pub in_line:         u64,
    pub call_lit:        bool,
}

impl StopRow {
    pub fn new(time: f64, s: &StopSnapshot) -> Self {
        Self {
            time,
            stop:            s.stop.0,
            pending_pickup:  s.pending_pickup,
            pending_dropoff: s.pending_dropoff,
            in_line:         s.in_line as u64,
            call_lit:        s.call_lit,
        }
    }
}

/// One completed journey.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripRow {
    pub passenger:   u64,
    pub stream:      &'static str,
    pub origin:      u16,
    pub destination: u16,
    pub joined:      f64,
    pub boarded:     f64,
    pub alighted:    f64,
    pub wait:        f64,
    pub ride:        f64,
}

impl From<&TripRecord> for TripRow {
    fn from(t: &TripRecord) -> Self {
        Self {
            passenger:   t.passenger.0,
            stream:      t.stream.as_str(),
            origin:      t.origin.0,
            destination: t.destination.0,
            joined:      t.joined.as_f64(),
            boarded:     t.boarded.as_f64(),
            alighted:    t.alighted.as_f64(),
            wait:        t.wait(),
            ride:        t.ride(),
        }
    }
}
