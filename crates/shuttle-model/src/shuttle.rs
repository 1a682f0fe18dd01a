//! The shuttle: its owned state and the dispatch-loop process.

use std::fmt;

use shuttle_core::{BoundaryRule, StopId};
use shuttle_kernel::{Context, KernelResult, Process, Suspend};
use tracing::{debug, trace};

use crate::{Direction, ShuttleWorld, StopBoard, next_stop};

// ── DispatchPhase ─────────────────────────────────────────────────────────────

/// What the shuttle is doing right now.  Each phase except `Alighting`
/// names the suspension the shuttle is parked on.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum DispatchPhase {
    /// At a stop with nothing to do there, deciding or polling.
    #[default]
    Idle,
    /// Doors opening.
    DoorOpen,
    /// Pausing between two boarding exchanges.
    Boarding,
    /// Invitation sent, waiting for the passenger's acknowledgement.
    AwaitingBoarded,
    /// Letting riders off.  Instantaneous.
    Alighting,
    /// Passengers loading and unloading luggage.
    Loading,
    /// Doors closing.
    DoorClosing,
    /// Driving to `to`.
    Traveling { to: StopId },
}

impl fmt::Display for DispatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchPhase::Idle => f.write_str("idle"),
            DispatchPhase::DoorOpen => f.write_str("door opening"),
            DispatchPhase::Boarding => f.write_str("boarding"),
            DispatchPhase::AwaitingBoarded => f.write_str("awaiting boarded"),
            DispatchPhase::Alighting => f.write_str("alighting"),
            DispatchPhase::Loading => f.write_str("loading"),
            DispatchPhase::DoorClosing => f.write_str("door closing"),
            DispatchPhase::Traveling { to } => write!(f, "traveling to stop {}", to.0),
        }
    }
}

// ── ShuttleState ──────────────────────────────────────────────────────────────

/// Position, heading, and progress counters of the shuttle.
///
/// Only the [`Shuttle`] process writes it; everyone else reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShuttleState {
    current_stop: StopId,
    direction:    Direction,
    phase:        DispatchPhase,
    boardings:    u64,
    stops_served: u64,
}

impl ShuttleState {
    pub fn new(start: StopId) -> Self {
        Self {
            current_stop: start,
            direction:    Direction::Up,
            phase:        DispatchPhase::Idle,
            boardings:    0,
            stops_served: 0,
        }
    }

    #[inline]
    pub fn current_stop(&self) -> StopId {
        self.current_stop
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    #[inline]
    pub fn phase(&self) -> DispatchPhase {
        self.phase
    }

    /// Completed boarding exchanges.
    #[inline]
    pub fn boardings(&self) -> u64 {
        self.boardings
    }

    /// Door cycles completed at active stops.
    #[inline]
    pub fn stops_served(&self) -> u64 {
        self.stops_served
    }

    /// The stop a scan from here would pick, computed on a copy of the
    /// heading so the shuttle itself is untouched.
    pub fn projected_next(&self, board: &StopBoard, rule: BoundaryRule) -> StopId {
        let mut heading = self.direction;
        next_stop(board, self.current_stop, &mut heading, rule)
    }
}

// ── Shuttle process ───────────────────────────────────────────────────────────

/// The dispatch loop.
///
/// All of its state lives in [`ShuttleWorld::shuttle`]; on each resumption
/// the recorded phase says which suspension just completed.
#[derive(Debug, Default)]
pub struct Shuttle;

impl Shuttle {
    /// At `current_stop` with the doors shut: open them if the stop is
    /// active, otherwise look for somewhere to go.
    fn decide(cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let w = cx.world_mut();
        let here = w.shuttle.current_stop;
        if w.board.is_active(here) {
            return Self::open_doors(cx);
        }

        let rule = w.config.boundary_rule;
        let next = next_stop(&w.board, here, &mut w.shuttle.direction, rule);
        let hop = w.config.idle_travel_time;
        if next == here {
            w.shuttle.phase = DispatchPhase::Idle;
        } else {
            trace!(from = here.0, to = next.0, "repositioning");
            w.shuttle.phase = DispatchPhase::Traveling { to: next };
        }
        cx.hold(hop)
    }

    fn open_doors(cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let w = cx.world_mut();
        w.shuttle.phase = DispatchPhase::DoorOpen;
        let open = w.config.door_open_time;
        debug!(now = %cx.now(), stop = cx.world().shuttle.current_stop.0, "doors opening");
        cx.hold(open)
    }

    /// Invite the head of the line if anyone is in it, else move on to the
    /// drop-offs.
    fn board_next(cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let here = cx.world().shuttle.current_stop;
        let stop = cx.world().handles[here];
        if cx.occupancy(stop.board_queue)? > 0 {
            cx.set(stop.invite)?;
            cx.world_mut().shuttle.phase = DispatchPhase::AwaitingBoarded;
            return Ok(Suspend::Queue(cx.world().handles.boarded));
        }
        Self::alight_and_load(cx)
    }

    fn alight_and_load(cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let here = cx.world().shuttle.current_stop;
        cx.world_mut().shuttle.phase = DispatchPhase::Alighting;

        let leaving = cx.world().board[here].pending_dropoff;
        if leaving > 0 {
            let get_off = cx.world().handles[here].get_off;
            let released = cx.broadcast(get_off)?;
            cx.world_mut().board[here].pending_dropoff = 0;
            cx.clear_level(get_off)?;
            debug!(now = %cx.now(), stop = here.0, leaving, released, "riders alighting");
        }

        let w = cx.world_mut();
        w.shuttle.phase = DispatchPhase::Loading;
        let (lo, hi) = (w.config.load_time_min, w.config.load_time_max);
        let load = w.dist().uniform_real(lo, hi);
        cx.hold(load)
    }

    /// Doors are shut: settle the stop's pickup count, pick the next stop,
    /// and drive there.
    fn depart(cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let here = cx.world().shuttle.current_stop;
        let line = cx.world().handles[here].board_queue;
        // Anyone who joined during loading keeps the stop active.
        if cx.occupancy(line)? == 0 {
            cx.world_mut().board[here].pending_pickup = 0;
        }

        let w = cx.world_mut();
        w.shuttle.stops_served += 1;
        let rule = w.config.boundary_rule;
        let next = next_stop(&w.board, here, &mut w.shuttle.direction, rule);
        if next == here {
            w.shuttle.phase = DispatchPhase::Idle;
            if w.board.is_active(here) {
                return Self::open_doors(cx);
            }
            let poll = w.config.idle_travel_time;
            return cx.hold(poll);
        }

        let travel = w.config.travel_time(here.distance(next));
        w.shuttle.phase = DispatchPhase::Traveling { to: next };
        debug!(now = %cx.now(), from = here.0, to = next.0, travel, "departing");
        cx.hold(travel)
    }
}

impl Process<ShuttleWorld> for Shuttle {
    fn resume(&mut self, cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let phase = cx.world().shuttle.phase;
        match phase {
            DispatchPhase::Idle => Self::decide(cx),
            DispatchPhase::DoorOpen | DispatchPhase::Boarding => Self::board_next(cx),
            DispatchPhase::AwaitingBoarded => {
                let w = cx.world_mut();
                w.shuttle.boardings += 1;
                w.shuttle.phase = DispatchPhase::Boarding;
                let gap = w.config.boarding_gap;
                cx.hold(gap)
            }
            // Never parked here; recover by finishing the stop.
            DispatchPhase::Alighting => Self::alight_and_load(cx),
            DispatchPhase::Loading => {
                let w = cx.world_mut();
                w.shuttle.phase = DispatchPhase::DoorClosing;
                let close = w.config.door_close_time;
                cx.hold(close)
            }
            DispatchPhase::DoorClosing => Self::depart(cx),
            DispatchPhase::Traveling { to } => {
                cx.world_mut().shuttle.current_stop = to;
                Self::decide(cx)
            }
        }
    }

    fn label(&self) -> &'static str {
        "shuttle"
    }
}
