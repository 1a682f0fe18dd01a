//! The shared world every process of the model runs against.

use shuttle_core::{
    Distributions, LevelId, PassengerId, QueueId, ShuttleConfig, SignalId, StopId,
};
use shuttle_kernel::Scheduler;

use crate::{
    DestinationRule, ModelError, ModelResult, Passenger, ShuttleState, StopBoard, Stream,
    TripRecord,
};

// ── Handles ───────────────────────────────────────────────────────────────────

/// The primitives belonging to one stop.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StopHandles {
    /// The line of passengers waiting to board here.
    pub board_queue: QueueId,
    /// Lit by the head of the line; the stop's call button.
    pub call: SignalId,
    /// The shuttle's invitation to the head of the line.
    pub invite: SignalId,
    /// Raised when the shuttle lets off riders bound for this stop.
    pub get_off: LevelId,
}

/// Every primitive the model uses, registered once per run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Handles {
    stops: Vec<StopHandles>,
    /// A boarding passenger's acknowledgement back to the shuttle.
    pub boarded: SignalId,
}

impl Handles {
    /// Register the per-stop primitives and the shared `boarded` signal.
    pub fn register<W>(sched: &mut Scheduler<W>, stop_count: u16) -> Self {
        let stops = (0..stop_count)
            .map(|s| StopHandles {
                board_queue: sched.add_queue(format!("line@{s}")),
                call:        sched.add_signal(format!("call@{s}")),
                invite:      sched.add_signal(format!("invite@{s}")),
                get_off:     sched.add_level(format!("get-off@{s}")),
            })
            .collect();
        let boarded = sched.add_signal("boarded");
        Self { stops, boarded }
    }

    #[inline]
    pub fn stop(&self, stop: StopId) -> Option<&StopHandles> {
        self.stops.get(stop.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = (StopId, &StopHandles)> + '_ {
        self.stops.iter().enumerate().map(|(i, h)| (StopId(i as u16), h))
    }
}

impl std::ops::Index<StopId> for Handles {
    type Output = StopHandles;

    fn index(&self, stop: StopId) -> &StopHandles {
        &self.stops[stop.index()]
    }
}

// ── Census ────────────────────────────────────────────────────────────────────

/// Live head-count of passengers by lifecycle phase.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Census {
    pub spawned:  u64,
    /// In a stop's line behind its head.
    pub queued:   u64,
    /// Head of a line, announced, not yet invited.
    pub waiting:  u64,
    pub riding:   u64,
    pub alighted: u64,
    /// Riders per destination stop.
    pub riding_to: Vec<u64>,
}

impl Census {
    fn new(stop_count: u16) -> Self {
        Self { riding_to: vec![0; usize::from(stop_count)], ..Self::default() }
    }

    pub(crate) fn joined(&mut self) {
        self.spawned += 1;
        self.queued += 1;
    }

    pub(crate) fn announced(&mut self) {
        self.queued = self.queued.saturating_sub(1);
        self.waiting += 1;
    }

    pub(crate) fn boarded(&mut self, destination: StopId) {
        self.waiting = self.waiting.saturating_sub(1);
        self.riding += 1;
        self.riding_to[destination.index()] += 1;
    }

    pub(crate) fn alighted(&mut self, destination: StopId) {
        self.riding = self.riding.saturating_sub(1);
        let slot = &mut self.riding_to[destination.index()];
        *slot = slot.saturating_sub(1);
        self.alighted += 1;
    }

    /// Passengers who have joined a line and not yet boarded.
    pub fn on_platform(&self) -> u64 {
        self.queued + self.waiting
    }
}

// ── ShuttleWorld ──────────────────────────────────────────────────────────────

/// State shared by the shuttle, passenger, and generator processes.
///
/// The scheduler owns it; processes reach it through their `Context`.
pub struct ShuttleWorld {
    pub config:  ShuttleConfig,
    pub board:   StopBoard,
    pub shuttle: ShuttleState,
    pub handles: Handles,
    pub census:  Census,
    /// Completed trips not yet collected by the run loop.
    trips:       Vec<TripRecord>,
    dist:        Box<dyn Distributions>,
    next_passenger: u64,
}

impl ShuttleWorld {
    /// A world with zeroed stops and no registered primitives.  Most callers
    /// want [`build_scheduler`] instead.
    pub fn new(config: ShuttleConfig, dist: Box<dyn Distributions>) -> Self {
        let n = config.stop_count;
        let shuttle = ShuttleState::new(StopId(config.start_stop));
        Self {
            board: StopBoard::new(n),
            census: Census::new(n),
            handles: Handles::default(),
            trips: Vec::new(),
            next_passenger: 0,
            config,
            shuttle,
            dist,
        }
    }

    #[inline]
    pub fn dist(&mut self) -> &mut dyn Distributions {
        self.dist.as_mut()
    }

    /// Completed trips recorded since the last call.
    pub fn drain_trips(&mut self) -> Vec<TripRecord> {
        std::mem::take(&mut self.trips)
    }

    pub(crate) fn record_trip(&mut self, trip: TripRecord) {
        self.trips.push(trip);
    }

    pub fn check_stop(&self, stop: StopId) -> ModelResult<()> {
        if self.board.contains(stop) {
            Ok(())
        } else {
            Err(ModelError::StopOutOfRange { stop, stop_count: self.config.stop_count })
        }
    }

    /// Build a passenger after checking its stops against this line.
    pub fn new_passenger(
        &mut self,
        stream: Stream,
        origin: StopId,
        rule:   DestinationRule,
    ) -> ModelResult<Passenger> {
        self.check_stop(origin)?;
        match rule {
            DestinationRule::Fixed(d) if d == origin => {
                return Err(ModelError::DestinationIsOrigin(d));
            }
            DestinationRule::Fixed(d) => self.check_stop(d)?,
            DestinationRule::UniformNonTerminal => {
                // A non-terminal origin leaves N − 2 candidates.
                if origin != StopId::TERMINAL && self.config.stop_count < 3 {
                    return Err(ModelError::DestinationIsOrigin(origin));
                }
            }
        }
        Ok(self.admit_passenger(stream, origin, rule))
    }

    /// Build a passenger whose stops are known to be valid.
    pub(crate) fn admit_passenger(
        &mut self,
        stream: Stream,
        origin: StopId,
        rule:   DestinationRule,
    ) -> Passenger {
        let id = PassengerId(self.next_passenger);
        self.next_passenger += 1;
        Passenger::new(id, stream, origin, rule)
    }

    pub(crate) fn sample_group_size(&mut self) -> u32 {
        self.config.group_sizes.sample(self.dist.as_mut())
    }

    /// Uniform non-terminal stop other than `except`.
    pub(crate) fn sample_non_terminal(&mut self, except: StopId) -> StopId {
        let hi = i64::from(self.config.stop_count) - 1;
        loop {
            let s = StopId(self.dist.uniform_int(1, hi) as u16);
            if s != except {
                return s;
            }
        }
    }
}

/// Create a scheduler over a fresh world and register the model's
/// primitives.  No process is spawned.
pub fn build_scheduler(
    config: ShuttleConfig,
    dist:   Box<dyn Distributions>,
) -> ModelResult<Scheduler<ShuttleWorld>> {
    config.validate()?;
    let stop_count = config.stop_count;
    let mut sched = Scheduler::new(ShuttleWorld::new(config, dist));
    let handles = Handles::register(&mut sched, stop_count);
    sched.world_mut().handles = handles;
    Ok(sched)
}
