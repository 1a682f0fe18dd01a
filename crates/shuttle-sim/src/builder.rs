//! Fluent builder for constructing a [`ShuttleSim`].

use shuttle_core::{Distributions, ShuttleConfig, SimRng, StopId};
use shuttle_model::{DestinationRule, Generator, Shuttle, Stream, build_scheduler};
use tracing::debug;

use crate::{ShuttleSim, SimResult};

/// Fluent builder for [`ShuttleSim`].
///
/// # Required inputs
///
/// - [`ShuttleConfig`] — stop count, horizon, timings, streams, seed, …
///
/// # Optional inputs (have defaults)
///
/// | Method                     | Default                          |
/// |----------------------------|----------------------------------|
/// | `.distributions(d)`        | `SimRng::new(config.seed)`       |
/// | `.initial_passenger(o, r)` | none                             |
///
/// Seeded passengers are spawned first, in the order given, then the
/// shuttle, then one generator per enabled stream.  Disable the streams
/// with `Interarrivals::none()` for a fully scripted run.
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config)
///     .initial_passenger(StopId(0), DestinationRule::Fixed(StopId(2)))
///     .build()?;
/// let summary = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    config: ShuttleConfig,
    dist:   Option<Box<dyn Distributions>>,
    seeded: Vec<(StopId, DestinationRule)>,
}

impl SimBuilder {
    pub fn new(config: ShuttleConfig) -> Self {
        Self { config, dist: None, seeded: Vec::new() }
    }

    /// Replace the seeded RNG with another sampling service.
    pub fn distributions<D: Distributions + 'static>(mut self, dist: D) -> Self {
        self.dist = Some(Box::new(dist));
        self
    }

    /// Place a passenger in `origin`'s line at time zero.
    pub fn initial_passenger(mut self, origin: StopId, rule: DestinationRule) -> Self {
        self.seeded.push((origin, rule));
        self
    }

    /// Validate the configuration, register the primitives, spawn every
    /// process, and return a ready-to-run [`ShuttleSim`].
    pub fn build(self) -> SimResult<ShuttleSim> {
        let dist: Box<dyn Distributions> = match self.dist {
            Some(d) => d,
            None => Box::new(SimRng::new(self.config.seed)),
        };
        let mut sched = build_scheduler(self.config, dist)?;

        for (origin, rule) in self.seeded {
            let passenger = sched.world_mut().new_passenger(Stream::Seeded, origin, rule)?;
            sched.spawn(passenger);
        }
        sched.spawn(Shuttle);
        for stream in Stream::GENERATED {
            if let Some(generator) = Generator::for_stream(stream, sched.world()) {
                sched.spawn(generator);
            }
        }

        debug!(
            stops = sched.world().config.stop_count,
            processes = sched.live_processes(),
            "simulation built"
        );
        ShuttleSim::new(sched)
    }
}
