//! The passenger process and its trip record.

use shuttle_core::{PassengerId, SimTime, StopId};
use shuttle_kernel::{Context, KernelResult, Process, Suspend, Wakeup};
use tracing::debug;

use crate::{ShuttleWorld, Stream};

/// How a passenger picks where to get off.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DestinationRule {
    /// Uniform over the non-terminal stops, excluding the origin.
    UniformNonTerminal,
    Fixed(StopId),
}

/// Lifecycle of one passenger.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PassengerPhase {
    /// In the stop's line, not yet at its head.
    #[default]
    Joining,
    /// Head of the line, call button lit, waiting for an invitation.
    Waiting,
    /// Invited; stepping aboard.
    Boarding,
    /// Aboard, waiting for the doors at the destination.
    Riding,
    Alighted,
}

/// One completed journey.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TripRecord {
    pub passenger:   PassengerId,
    pub stream:      Stream,
    pub origin:      StopId,
    pub destination: StopId,
    /// Joined the line.
    pub joined:      SimTime,
    /// Invited aboard.
    pub boarded:     SimTime,
    pub alighted:    SimTime,
}

impl TripRecord {
    #[inline]
    pub fn wait(&self) -> f64 {
        self.boarded.since(self.joined)
    }

    #[inline]
    pub fn ride(&self) -> f64 {
        self.alighted.since(self.boarded)
    }
}

/// A passenger travelling from `origin` to a destination chosen by `rule`.
///
/// Protocol, against the primitives of its origin stop:
///
/// 1. take a place in the stop's line;
/// 2. at the head of the line, count itself as a pending pickup and light
///    the call button;
/// 3. when invited, stop counting as a pickup, put the button out, and
///    acknowledge with `boarded`;
/// 4. choose the destination and count itself as a pending drop-off there;
/// 5. leave the line, letting the next passenger reach its head;
/// 6. wait for the destination's get-off signal.
#[derive(Clone, Debug)]
pub struct Passenger {
    id:          PassengerId,
    stream:      Stream,
    origin:      StopId,
    rule:        DestinationRule,
    destination: Option<StopId>,
    phase:       PassengerPhase,
    joined:      SimTime,
    boarded:     SimTime,
}

impl Passenger {
    pub(crate) fn new(id: PassengerId, stream: Stream, origin: StopId, rule: DestinationRule) -> Self {
        Self {
            id,
            stream,
            origin,
            rule,
            destination: None,
            phase: PassengerPhase::Joining,
            joined: SimTime::ZERO,
            boarded: SimTime::ZERO,
        }
    }

    #[inline]
    pub fn id(&self) -> PassengerId {
        self.id
    }

    #[inline]
    pub fn origin(&self) -> StopId {
        self.origin
    }

    /// Known once the passenger has boarded.
    #[inline]
    pub fn destination(&self) -> Option<StopId> {
        self.destination
    }

    #[inline]
    pub fn phase(&self) -> PassengerPhase {
        self.phase
    }

    fn choose_destination(&self, world: &mut ShuttleWorld) -> StopId {
        match self.rule {
            DestinationRule::Fixed(d) => d,
            DestinationRule::UniformNonTerminal => world.sample_non_terminal(self.origin),
        }
    }

    fn announce(&mut self, cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let o = self.origin;
        let stop = cx.world().handles[o];
        let w = cx.world_mut();
        w.board[o].pending_pickup += 1;
        w.census.announced();
        cx.set(stop.call)?;
        self.phase = PassengerPhase::Waiting;
        Ok(Suspend::Queue(stop.invite))
    }

    fn board(&mut self, cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        self.phase = PassengerPhase::Boarding;
        self.boarded = cx.now();
        let o = self.origin;
        let stop = cx.world().handles[o];
        let boarded = cx.world().handles.boarded;

        let slot = &mut cx.world_mut().board[o].pending_pickup;
        *slot = slot.saturating_sub(1);
        cx.clear(stop.call)?;
        cx.set(boarded)?;

        let w = cx.world_mut();
        let d = self.choose_destination(w);
        w.board[d].pending_dropoff += 1;
        w.census.boarded(d);
        self.destination = Some(d);
        cx.release(stop.board_queue)?;

        debug!(now = %cx.now(), passenger = self.id.0, from = o.0, to = d.0, "boarded");
        self.phase = PassengerPhase::Riding;
        Ok(Suspend::Wait(cx.world().handles[d].get_off))
    }

    fn alight(&mut self, cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        let Some(d) = self.destination else {
            return Ok(Suspend::Exit);
        };
        let trip = TripRecord {
            passenger:   self.id,
            stream:      self.stream,
            origin:      self.origin,
            destination: d,
            joined:      self.joined,
            boarded:     self.boarded,
            alighted:    cx.now(),
        };
        let w = cx.world_mut();
        w.census.alighted(d);
        w.record_trip(trip);
        self.phase = PassengerPhase::Alighted;
        Ok(Suspend::Exit)
    }
}

impl Process<ShuttleWorld> for Passenger {
    fn resume(&mut self, cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        match (self.phase, cx.wakeup()) {
            (PassengerPhase::Joining, Wakeup::Start) => {
                self.joined = cx.now();
                cx.world_mut().census.joined();
                Ok(Suspend::Acquire(cx.world().handles[self.origin].board_queue))
            }
            (PassengerPhase::Joining, _) => self.announce(cx),
            (PassengerPhase::Waiting, _) => self.board(cx),
            (PassengerPhase::Riding, _) => self.alight(cx),
            // Boarding completes within a single resumption.
            (PassengerPhase::Boarding | PassengerPhase::Alighted, _) => Ok(Suspend::Exit),
        }
    }

    fn label(&self) -> &'static str {
        "passenger"
    }
}
