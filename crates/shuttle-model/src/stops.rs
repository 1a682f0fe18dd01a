//! Per-stop request counters.

use shuttle_core::StopId;

/// Outstanding work at one stop.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StopState {
    /// Passengers at the head of this stop's line who have announced
    /// themselves and not yet been invited aboard.
    pub pending_pickup: u32,
    /// Riders bound for this stop who have not yet been let off.
    pub pending_dropoff: u32,
}

impl StopState {
    /// A stop is active when somebody wants to get on or off there.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.pending_pickup > 0 || self.pending_dropoff > 0
    }
}

/// The counters of every stop, indexed by [`StopId`].
///
/// Created zeroed with the run and owned by the world; only the shuttle and
/// passenger processes write to it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StopBoard {
    stops: Vec<StopState>,
}

impl StopBoard {
    pub fn new(stop_count: u16) -> Self {
        Self { stops: vec![StopState::default(); usize::from(stop_count)] }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Highest stop index.
    #[inline]
    pub fn last_stop(&self) -> StopId {
        StopId(self.stops.len().saturating_sub(1) as u16)
    }

    #[inline]
    pub fn contains(&self, stop: StopId) -> bool {
        stop.index() < self.stops.len()
    }

    #[inline]
    pub fn get(&self, stop: StopId) -> Option<&StopState> {
        self.stops.get(stop.index())
    }

    #[inline]
    pub fn get_mut(&mut self, stop: StopId) -> Option<&mut StopState> {
        self.stops.get_mut(stop.index())
    }

    /// `false` for stops off the end of the line.
    #[inline]
    pub fn is_active(&self, stop: StopId) -> bool {
        self.get(stop).is_some_and(StopState::is_active)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StopId, &StopState)> + '_ {
        self.stops.iter().enumerate().map(|(i, s)| (StopId(i as u16), s))
    }

    pub fn active_stops(&self) -> impl Iterator<Item = StopId> + '_ {
        self.iter().filter(|(_, s)| s.is_active()).map(|(id, _)| id)
    }

    pub fn total_pickup(&self) -> u32 {
        self.stops.iter().map(|s| s.pending_pickup).sum()
    }

    pub fn total_dropoff(&self) -> u32 {
        self.stops.iter().map(|s| s.pending_dropoff).sum()
    }

    pub fn as_slice(&self) -> &[StopState] {
        &self.stops
    }
}

impl std::ops::Index<StopId> for StopBoard {
    type Output = StopState;

    fn index(&self, stop: StopId) -> &StopState {
        &self.stops[stop.index()]
    }
}

impl std::ops::IndexMut<StopId> for StopBoard {
    fn index_mut(&mut self, stop: StopId) -> &mut StopState {
        &mut self.stops[stop.index()]
    }
}
