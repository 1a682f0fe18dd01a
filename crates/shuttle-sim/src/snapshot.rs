//! Read-only monitor snapshots.

use std::fmt;

use shuttle_core::{SimTime, StopId};
use shuttle_kernel::Scheduler;
use shuttle_model::{Census, Direction, DispatchPhase, ShuttleWorld};

use crate::SimResult;

/// One stop as the monitor sees it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StopSnapshot {
    pub stop:            StopId,
    pub pending_pickup:  u32,
    pub pending_dropoff: u32,
    /// Passengers in the stop's line, head included.
    pub in_line:         usize,
    /// The head of the line has pressed the call button.
    pub call_lit:        bool,
}

/// The state of the shuttle and every stop at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub time:      SimTime,
    pub stop:      StopId,
    pub direction: Direction,
    pub phase:     DispatchPhase,
    /// Where a scan from here would send the shuttle.
    pub next_stop: StopId,
    /// Riders aboard.
    pub riders:    u32,
    pub seats:     u32,
    pub stops:     Vec<StopSnapshot>,
    pub census:    Census,
}

impl Snapshot {
    /// Capture the current state.  Nothing in the scheduler or the world is
    /// modified.
    pub fn capture(sched: &Scheduler<ShuttleWorld>) -> SimResult<Self> {
        let w = sched.world();
        let mut stops = Vec::with_capacity(w.board.len());
        for ((stop, state), (_, handles)) in w.board.iter().zip(w.handles.iter()) {
            stops.push(StopSnapshot {
                stop,
                pending_pickup:  state.pending_pickup,
                pending_dropoff: state.pending_dropoff,
                in_line:         sched.queue(handles.board_queue)?.occupancy(),
                call_lit:        sched.signal(handles.call)?.is_set(),
            });
        }

        Ok(Self {
            time:      sched.now(),
            stop:      w.shuttle.current_stop(),
            direction: w.shuttle.direction(),
            phase:     w.shuttle.phase(),
            next_stop: w.shuttle.projected_next(&w.board, w.config.boundary_rule),
            riders:    w.board.total_dropoff(),
            seats:     w.config.seats,
            census:    w.census.clone(),
            stops,
        })
    }

    /// More riders aboard than there are seats.  Seats are never enforced,
    /// so this can happen in a busy run.
    #[inline]
    pub fn over_capacity(&self) -> bool {
        self.riders > self.seats
    }

    pub fn total_pickup(&self) -> u32 {
        self.stops.iter().map(|s| s.pending_pickup).sum()
    }

    pub fn total_dropoff(&self) -> u32 {
        self.stops.iter().map(|s| s.pending_dropoff).sum()
    }

    /// Passengers waiting in any line.
    pub fn in_lines(&self) -> usize {
        self.stops.iter().map(|s| s.in_line).sum()
    }

    pub fn stop(&self, stop: StopId) -> Option<&StopSnapshot> {
        self.stops.get(stop.index())
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = match self.direction {
            Direction::Up => "UP",
            Direction::Down => "DN",
        };
        let dropping = self.stop(self.next_stop).map_or(0, |s| s.pending_dropoff);
        writeln!(
            f,
            "[{}] at stop {} ({}) going {heading} to {} with {dropping} to drop off there; \
             {} aboard / {} seats{}",
            self.time,
            self.stop.0,
            self.phase,
            self.next_stop.0,
            self.riders,
            self.seats,
            if self.over_capacity() { " OVER CAPACITY" } else { "" },
        )?;
        for s in &self.stops {
            write!(f, "  stop {:>2}: {} riding here", s.stop.0, s.pending_dropoff)?;
            if s.in_line > 0 {
                write!(f, ", {} in line", s.in_line)?;
            }
            if s.pending_pickup > 0 {
                write!(f, ", pickup requested")?;
            }
            if s.call_lit {
                write!(f, " [call]")?;
            }
            writeln!(f)?;
        }
        write!(f, "==================================")
    }
}
