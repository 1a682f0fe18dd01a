//! `ResumptionQueue` — the scheduler's time-ordered set of pending wake-ups.
//!
//! # Ordering
//!
//! Entries are grouped by instant in a `BTreeMap<SimTime, VecDeque<_>>`.
//! Within one instant, entries leave in the order they were pushed, which is
//! the FIFO tie-break the passenger/shuttle handshakes depend on: a process
//! released at `now` runs before a process that suspends at `now` afterwards.
//!
//! # Performance note
//!
//! `BTreeMap` gives O(log W) insert and pop where W = number of distinct
//! pending instants.  Most wake-ups land on a handful of instants (every
//! release during a boarding burst shares one), so W stays small.

use std::collections::{BTreeMap, VecDeque};

use shuttle_core::{LevelId, ProcessId, QueueId, SignalId, SimTime};

/// Why a process is being resumed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Wakeup {
    /// First resumption after `spawn`.
    Start,
    /// A `hold` elapsed.
    Timer,
    /// The process became holder of the queue.
    Acquired(QueueId),
    /// The process consumed one `set` of a single-release signal.
    Signalled(SignalId),
    /// A level signal was (or already is) set.
    Broadcast(LevelId),
}

/// One `(time, process, reason)` entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PendingResumption {
    pub time:    SimTime,
    pub process: ProcessId,
    pub wakeup:  Wakeup,
}

/// A priority queue mapping instants → processes to resume at that instant.
#[derive(Default, Debug)]
pub struct ResumptionQueue {
    inner: BTreeMap<SimTime, VecDeque<(ProcessId, Wakeup)>>,
    /// Cached total entry count for O(1) `len()`.
    total: usize,
}

impl ResumptionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `process` to resume at `time`, behind everything already
    /// queued for that instant.
    pub fn push(&mut self, time: SimTime, process: ProcessId, wakeup: Wakeup) {
        self.inner.entry(time).or_default().push_back((process, wakeup));
        self.total += 1;
    }

    /// Remove and return the earliest entry (FIFO among equal instants).
    pub fn pop(&mut self) -> Option<PendingResumption> {
        let mut slot = self.inner.first_entry()?;
        let time = *slot.key();
        let (process, wakeup) = slot.get_mut().pop_front()?;
        if slot.get().is_empty() {
            slot.remove();
        }
        self.total -= 1;
        Some(PendingResumption { time, process, wakeup })
    }

    /// The earliest instant with at least one entry, or `None` if empty.
    pub fn next_time(&self) -> Option<SimTime> {
        self.inner.keys().next().copied()
    }

    /// Total number of pending entries across all instants.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct instants that have at least one entry.
    pub fn instant_count(&self) -> usize {
        self.inner.len()
    }
}
