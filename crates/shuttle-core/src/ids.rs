//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` to allow
//! direct indexing into per-stop and per-process `Vec`s, but callers should
//! prefer the `.index()` helpers for clarity.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl Default for $name {
            /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Slot of a cooperative process in the scheduler's process table.
    pub struct ProcessId(u32);
}

typed_id! {
    /// Index of a stop along the shuttle's line.  Stop 0 is the terminal.
    pub struct StopId(u16);
}

typed_id! {
    /// Handle of a `ResourceQueue` registered with the scheduler.
    pub struct QueueId(u32);
}

typed_id! {
    /// Handle of a single-release `Signal` registered with the scheduler.
    pub struct SignalId(u32);
}

typed_id! {
    /// Handle of a `LevelSignal` registered with the scheduler.
    pub struct LevelId(u32);
}

typed_id! {
    /// Sequential number of a passenger, assigned at spawn time.
    pub struct PassengerId(u64);
}

impl StopId {
    /// The airport terminal.
    pub const TERMINAL: StopId = StopId(0);

    /// Absolute number of stops between `self` and `other`.
    #[inline]
    pub fn distance(self, other: StopId) -> u16 {
        self.0.abs_diff(other.0)
    }
}
