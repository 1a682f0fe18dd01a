//! Directional scan dispatch.
//!
//! The shuttle keeps a persistent [`Direction`].  To pick its next stop it
//! looks strictly ahead for the nearest active stop; only when nothing lies
//! ahead does it turn around and look the other way.  With nothing active
//! anywhere it stays where it is, which is a normal outcome and not an error.

use std::fmt;

use shuttle_core::{BoundaryRule, StopId};

use crate::StopBoard;

/// Travel direction along the line of stops.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards higher stop indices.
    #[default]
    Up,
    /// Towards the terminal.
    Down,
}

impl Direction {
    #[inline]
    pub fn reversed(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// `+1` for up, `-1` for down.
    #[inline]
    pub fn sign(self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }

    /// The direction `rule` imposes at `current`.  Only the two end stops
    /// are affected, and only under [`BoundaryRule::ForceInward`].
    pub fn forced(self, current: StopId, last: StopId, rule: BoundaryRule) -> Direction {
        match rule {
            BoundaryRule::Free => self,
            BoundaryRule::ForceInward if current == StopId::TERMINAL => Direction::Up,
            BoundaryRule::ForceInward if current >= last => Direction::Down,
            BoundaryRule::ForceInward => self,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Up => "up",
            Direction::Down => "down",
        })
    }
}

/// Nearest active stop strictly beyond `current` in `direction`.
pub fn first_active_ahead(board: &StopBoard, current: StopId, direction: Direction) -> Option<StopId> {
    match direction {
        Direction::Up => {
            let start = current.0.checked_add(1)?;
            (start..board.len() as u16).map(StopId).find(|&s| board.is_active(s))
        }
        Direction::Down => (0..current.0).rev().map(StopId).find(|&s| board.is_active(s)),
    }
}

/// Choose the shuttle's next stop and update `direction` in place.
///
/// Before each of the (at most two) scan attempts the boundary rule is
/// applied; the second attempt also reverses.  Returns `current` when no
/// stop is active in either direction.
pub fn next_stop(
    board:     &StopBoard,
    current:   StopId,
    direction: &mut Direction,
    rule:      BoundaryRule,
) -> StopId {
    let last = board.last_stop();
    for attempt in 0..2 {
        *direction = direction.forced(current, last, rule);
        if attempt == 1 {
            *direction = direction.reversed();
        }
        if let Some(stop) = first_active_ahead(board, current, *direction) {
            return stop;
        }
    }
    current
}
