//! Deterministic simulation RNG and the distribution-sampling interface.
//!
//! # Determinism strategy
//!
//! A run owns exactly one [`SimRng`], seeded from `ShuttleConfig::seed`.
//! Processes are resumed strictly one at a time in a fixed order, so every
//! draw happens at a reproducible point in the event sequence: the same seed
//! always yields the same run.
//!
//! Replication sweeps derive one seed per replication with
//! [`SimRng::child`], which mixes the offset with the golden-ratio constant
//! so neighbouring replications do not share streams.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── Distributions ─────────────────────────────────────────────────────────────

/// Sampling calls the simulation core consumes.
///
/// The core never owns or seeds a generator itself; it borrows whatever
/// implements this trait.  Tests substitute scripted implementations.
pub trait Distributions {
    /// Exponentially distributed value with the given mean.
    fn exponential(&mut self, mean: f64) -> f64;

    /// Uniform integer in `lo..=hi`.  Returns `lo` when `hi <= lo`.
    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64;

    /// Uniform real in `[lo, hi]`.  Returns `lo` when `hi <= lo`.
    fn uniform_real(&mut self, lo: f64, hi: f64) -> f64;

    /// Uniform real in `[0, 1)`.
    fn probability(&mut self) -> f64;
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Simulation-level RNG.
///
/// Used only from the single-threaded scheduler loop.  Parallel replication
/// sweeps give every worker its own `SimRng` seeded via [`SimRng::child`].
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive a child `SimRng` with a different seed offset.
    pub fn child(&mut self, offset: u64) -> SimRng {
        SimRng(SmallRng::seed_from_u64(self.child_seed(offset)))
    }

    /// The seed [`child`][Self::child] would use, for callers that need to
    /// record it (e.g. in a replication summary).
    pub fn child_seed(&mut self, offset: u64) -> u64 {
        self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT)
    }

    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }
}

impl Distributions for SimRng {
    fn exponential(&mut self, mean: f64) -> f64 {
        match Exp::new(1.0 / mean) {
            Ok(exp) => exp.sample(&mut self.0),
            // Non-positive or NaN mean: there is no next arrival.
            Err(_) => f64::INFINITY,
        }
    }

    fn uniform_int(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    fn uniform_real(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    #[inline]
    fn probability(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}
