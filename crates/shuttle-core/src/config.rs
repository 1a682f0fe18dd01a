//! Run configuration.
//!
//! Every timing constant, rate, and policy knob of the model is injected
//! through [`ShuttleConfig`].  `ShuttleConfig::default()` reproduces the
//! reference airport model: 20 stops, one simulated day, doors 2/3, loading
//! 5–15, travel `5·sqrt(distance)`, three passenger streams with mean
//! interarrival 10, groups of 1/2/4 with weights 0.3/0.4/0.3.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to the simulation builder.

use crate::{CoreError, CoreResult, Distributions, SimTime, StopId};

// ── BoundaryRule ──────────────────────────────────────────────────────────────

/// What the scan does with the shuttle's direction at the two end stops.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BoundaryRule {
    /// At stop 0 point up, at stop N−1 point down, before each scan attempt.
    #[default]
    ForceInward,
    /// Keep whatever direction the shuttle has; the scan falls back to
    /// reversal when nothing lies beyond the end.
    Free,
}

// ── Interarrivals ─────────────────────────────────────────────────────────────

/// Mean interarrival time of each passenger stream.  `None` disables a stream.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Interarrivals {
    /// Groups arriving at the terminal, bound for any other stop.
    pub airport: Option<f64>,
    /// Groups leaving a non-terminal stop for the terminal.
    pub lot_departure: Option<f64>,
    /// Groups travelling between two distinct non-terminal stops.
    pub inter_stop: Option<f64>,
}

impl Interarrivals {
    /// All three streams disabled.  Useful for scripted scenarios.
    pub fn none() -> Self {
        Self { airport: None, lot_departure: None, inter_stop: None }
    }
}

impl Default for Interarrivals {
    fn default() -> Self {
        Self { airport: Some(10.0), lot_departure: Some(10.0), inter_stop: Some(10.0) }
    }
}

// ── GroupSizes ────────────────────────────────────────────────────────────────

/// One entry of the group-size distribution.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GroupWeight {
    pub size:        u32,
    pub probability: f64,
}

/// Discrete distribution over travelling-group sizes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct GroupSizes(pub Vec<GroupWeight>);

impl GroupSizes {
    /// Sample a group size by inverse-CDF over the weights in listed order.
    pub fn sample<D: Distributions + ?Sized>(&self, dist: &mut D) -> u32 {
        let x = dist.probability();
        let mut acc = 0.0;
        for w in &self.0 {
            acc += w.probability;
            if x < acc {
                return w.size;
            }
        }
        // Rounding slack in the weights: fall back to the last entry.
        self.0.last().map_or(1, |w| w.size)
    }

    /// Expected group size.
    pub fn mean(&self) -> f64 {
        self.0.iter().map(|w| w.size as f64 * w.probability).sum()
    }
}

impl Default for GroupSizes {
    fn default() -> Self {
        GroupSizes(vec![
            GroupWeight { size: 1, probability: 0.30 },
            GroupWeight { size: 2, probability: 0.40 },
            GroupWeight { size: 4, probability: 0.30 },
        ])
    }
}

// ── ShuttleConfig ─────────────────────────────────────────────────────────────

/// Top-level run configuration.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShuttleConfig {
    /// Number of stops `N` (≥ 2).  Stop 0 is the terminal.
    pub stop_count: u16,

    /// End of the run in virtual time units.
    pub horizon: f64,

    /// Time the doors take to open at an active stop.
    pub door_open_time: f64,

    /// Time the doors take to close before departing.
    pub door_close_time: f64,

    /// Lower bound of the uniformly distributed loading time.
    pub load_time_min: f64,

    /// Upper bound of the uniformly distributed loading time.
    pub load_time_max: f64,

    /// Hold between successive boarding invitations.  Tiny but positive so
    /// one boarding completes before the next invitation goes out.
    pub boarding_gap: f64,

    /// Travel time is `travel_per_sqrt_stop * sqrt(|stops moved|)`.
    pub travel_per_sqrt_stop: f64,

    /// Hold used when leaving an inactive stop, and the idle poll interval
    /// when there is nowhere to go.
    pub idle_travel_time: f64,

    pub interarrivals: Interarrivals,

    pub group_sizes: GroupSizes,

    pub boundary_rule: BoundaryRule,

    /// Seats on the shuttle.  Reported in snapshots, never enforced.
    pub seats: u32,

    /// Monitor snapshot period.  `0` disables snapshots.
    pub monitor_period: f64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Stop the shuttle starts at.
    pub start_stop: u16,
}

impl Default for ShuttleConfig {
    fn default() -> Self {
        Self {
            stop_count:           20,
            horizon:              1440.0 * 60.0,
            door_open_time:       2.0,
            door_close_time:      3.0,
            load_time_min:        5.0,
            load_time_max:        15.0,
            boarding_gap:         1.0e-20,
            travel_per_sqrt_stop: 5.0,
            idle_travel_time:     5.0,
            interarrivals:        Interarrivals::default(),
            group_sizes:          GroupSizes::default(),
            boundary_rule:        BoundaryRule::ForceInward,
            seats:                6,
            monitor_period:       20.0,
            seed:                 42,
            start_stop:           0,
        }
    }
}

impl ShuttleConfig {
    /// The instant at which the run ends.
    pub fn end_time(&self) -> CoreResult<SimTime> {
        SimTime::new(self.horizon)
    }

    /// The highest stop index, `N − 1`.
    #[inline]
    pub fn last_stop(&self) -> StopId {
        StopId(self.stop_count.saturating_sub(1))
    }

    /// Travel time between two stops `distance` apart.
    #[inline]
    pub fn travel_time(&self, distance: u16) -> f64 {
        self.travel_per_sqrt_stop * f64::from(distance).sqrt()
    }

    /// Check every field for a value the model can run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.stop_count < 2 {
            return Err(config_err(format!("stop_count must be >= 2, got {}", self.stop_count)));
        }
        if self.start_stop >= self.stop_count {
            return Err(config_err(format!(
                "start_stop {} is outside 0..{}",
                self.start_stop, self.stop_count
            )));
        }
        positive("horizon", self.horizon)?;
        positive("door_open_time", self.door_open_time)?;
        positive("door_close_time", self.door_close_time)?;
        positive("load_time_min", self.load_time_min)?;
        positive("boarding_gap", self.boarding_gap)?;
        positive("travel_per_sqrt_stop", self.travel_per_sqrt_stop)?;
        positive("idle_travel_time", self.idle_travel_time)?;
        if !(self.load_time_max.is_finite() && self.load_time_max >= self.load_time_min) {
            return Err(config_err(format!(
                "load_time_max {} must be >= load_time_min {}",
                self.load_time_max, self.load_time_min
            )));
        }
        if !(self.monitor_period.is_finite() && self.monitor_period >= 0.0) {
            return Err(config_err(format!("monitor_period {} must be >= 0", self.monitor_period)));
        }

        let streams = [
            ("interarrivals.airport", self.interarrivals.airport),
            ("interarrivals.lot_departure", self.interarrivals.lot_departure),
            ("interarrivals.inter_stop", self.interarrivals.inter_stop),
        ];
        for (name, mean) in streams {
            if let Some(m) = mean {
                positive(name, m)?;
            }
        }
        if self.interarrivals.inter_stop.is_some() && self.stop_count < 3 {
            return Err(config_err(
                "the inter-stop stream needs at least two non-terminal stops".to_string(),
            ));
        }

        self.validate_group_sizes()
    }

    fn validate_group_sizes(&self) -> CoreResult<()> {
        let weights = &self.group_sizes.0;
        if weights.is_empty() {
            return Err(config_err("group_sizes must not be empty".to_string()));
        }
        for w in weights {
            if w.size == 0 {
                return Err(config_err("group sizes must be >= 1".to_string()));
            }
            if !(w.probability.is_finite() && w.probability >= 0.0) {
                return Err(config_err(format!(
                    "group size {} has invalid probability {}",
                    w.size, w.probability
                )));
            }
        }
        let total: f64 = weights.iter().map(|w| w.probability).sum();
        if (total - 1.0).abs() > 1e-6 {
            return Err(config_err(format!("group size probabilities sum to {total}, expected 1")));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(config_err(format!("{name} must be positive and finite, got {v}")))
    }
}

fn config_err(msg: String) -> CoreError {
    CoreError::Config(msg)
}
