//! Simulation time model.
//!
//! # Design
//!
//! Virtual time is a non-negative, finite `f64` wrapped in [`SimTime`].  It
//! is unrelated to wall-clock time; the scheduler is its only writer and it
//! only ever jumps forward to the next pending resumption.
//!
//! Offsets are [`SimDuration`]s.  A duration is strictly positive and finite
//! by construction, so every `hold` a process requests is guaranteed to move
//! it into the future (or, for sub-epsilon gaps such as the boarding gap, to
//! the back of the queue at the current instant).
//!
//! `SimTime` implements `Ord` via `f64::total_cmp`.  NaN never enters the
//! type: constructors reject it.

use std::cmp::Ordering;
use std::fmt;

use crate::{CoreError, CoreResult};

// ── SimTime ───────────────────────────────────────────────────────────────────

/// An absolute instant on the virtual timeline.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(f64);

impl SimTime {
    pub const ZERO: SimTime = SimTime(0.0);

    /// Build an instant; fails on negative, NaN, or infinite values.
    pub fn new(t: f64) -> CoreResult<SimTime> {
        if t.is_finite() && t >= 0.0 {
            Ok(SimTime(t))
        } else {
            Err(CoreError::InvalidTime(t))
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }

    /// The instant `d` after `self`.
    #[inline]
    pub fn after(self, d: SimDuration) -> SimTime {
        SimTime(self.0 + d.0)
    }

    /// Time elapsed from `earlier` to `self`, clamped at zero.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        (self.0 - earlier.0).max(0.0)
    }
}

impl PartialEq for SimTime {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimTime {}

impl PartialOrd for SimTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<SimDuration> for SimTime {
    type Output = SimTime;
    #[inline]
    fn add(self, rhs: SimDuration) -> SimTime {
        self.after(rhs)
    }
}

impl fmt::Display for SimTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={:.3}", self.0)
    }
}

// ── SimDuration ───────────────────────────────────────────────────────────────

/// A strictly positive, finite offset on the virtual timeline.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct SimDuration(f64);

impl SimDuration {
    /// Build a duration.
    ///
    /// # Errors
    /// [`CoreError::InvalidDuration`] if `d <= 0`, NaN, or infinite.
    pub fn new(d: f64) -> CoreResult<SimDuration> {
        if d.is_finite() && d > 0.0 {
            Ok(SimDuration(d))
        } else {
            Err(CoreError::InvalidDuration(d))
        }
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl TryFrom<f64> for SimDuration {
    type Error = CoreError;
    fn try_from(d: f64) -> CoreResult<SimDuration> {
        SimDuration::new(d)
    }
}

impl fmt::Display for SimDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.0)
    }
}
