//! Passenger arrival streams.

use std::fmt;

use shuttle_core::StopId;
use shuttle_kernel::{Context, KernelResult, Process, Suspend, Wakeup};
use tracing::trace;

use crate::{DestinationRule, ShuttleWorld};

/// Where a passenger came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Arrived at the terminal, bound for a lot or floor.
    Airport,
    /// Leaving a lot or floor for the terminal.
    LotDeparture,
    /// Between two non-terminal stops.
    InterStop,
    /// Placed by the run setup rather than a generator.
    Seeded,
}

impl Stream {
    pub const GENERATED: [Stream; 3] = [Stream::Airport, Stream::LotDeparture, Stream::InterStop];

    pub fn as_str(self) -> &'static str {
        match self {
            Stream::Airport => "airport",
            Stream::LotDeparture => "lot_departure",
            Stream::InterStop => "inter_stop",
            Stream::Seeded => "seeded",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Spawns groups of passengers at exponentially distributed intervals
/// until the horizon.
#[derive(Clone, Debug)]
pub struct Generator {
    stream: Stream,
    mean:   f64,
    groups: u64,
}

impl Generator {
    pub fn new(stream: Stream, mean: f64) -> Self {
        Self { stream, mean, groups: 0 }
    }

    /// The configured generator for `stream`, or `None` if it is disabled.
    pub fn for_stream(stream: Stream, world: &ShuttleWorld) -> Option<Self> {
        let means = &world.config.interarrivals;
        let mean = match stream {
            Stream::Airport => means.airport,
            Stream::LotDeparture => means.lot_departure,
            Stream::InterStop => means.inter_stop,
            Stream::Seeded => None,
        }?;
        Some(Self::new(stream, mean))
    }

    #[inline]
    pub fn stream(&self) -> Stream {
        self.stream
    }

    /// Groups spawned so far.
    #[inline]
    pub fn groups(&self) -> u64 {
        self.groups
    }

    fn next_gap(&self, world: &mut ShuttleWorld) -> f64 {
        // `Exp` can return exactly zero.
        world.dist().exponential(self.mean).max(f64::MIN_POSITIVE)
    }

    /// Origin and destination rule for one member of a new group.
    fn route(&self, world: &mut ShuttleWorld) -> (StopId, DestinationRule) {
        let last = i64::from(world.config.stop_count) - 1;
        match self.stream {
            Stream::Airport | Stream::Seeded => (StopId::TERMINAL, DestinationRule::UniformNonTerminal),
            Stream::LotDeparture => {
                let origin = StopId(world.dist().uniform_int(1, last) as u16);
                (origin, DestinationRule::Fixed(StopId::TERMINAL))
            }
            Stream::InterStop => {
                let origin = StopId(world.dist().uniform_int(1, last) as u16);
                let dest = world.sample_non_terminal(origin);
                (origin, DestinationRule::Fixed(dest))
            }
        }
    }

    fn spawn_group(&mut self, cx: &mut Context<'_, ShuttleWorld>) {
        let w = cx.world_mut();
        let size = w.sample_group_size();
        let (origin, rule) = self.route(w);
        self.groups += 1;
        trace!(now = %cx.now(), stream = %self.stream, size, origin = origin.0, "group arrives");
        for _ in 0..size {
            let passenger = cx.world_mut().admit_passenger(self.stream, origin, rule);
            cx.spawn(passenger);
        }
    }
}

impl Process<ShuttleWorld> for Generator {
    fn resume(&mut self, cx: &mut Context<'_, ShuttleWorld>) -> KernelResult<Suspend> {
        if cx.wakeup() != Wakeup::Start {
            self.spawn_group(cx);
        }
        if cx.now().as_f64() >= cx.world().config.horizon {
            return Ok(Suspend::Exit);
        }
        let gap = self.next_gap(cx.world_mut());
        cx.hold(gap)
    }

    fn label(&self) -> &'static str {
        "generator"
    }
}
