//! Synchronisation primitives built atop the scheduler.
//!
//! These types only hold state.  Turning a release into a wake-up (pushing
//! the released process onto the resumption queue) is the scheduler's job,
//! so every mutating method here returns the process(es) it released.
//!
//! | Type            | Release contract                                         |
//! |-----------------|----------------------------------------------------------|
//! | `ResourceQueue` | one holder; FIFO hand-over on `release`                  |
//! | `Signal`        | exactly one waiter per `set`; latches when nobody waits  |
//! | `LevelSignal`   | every current waiter on `set`; stays set until `clear`   |

use std::collections::VecDeque;

use shuttle_core::ProcessId;

// ── ResourceQueue ─────────────────────────────────────────────────────────────

/// Mutual exclusion with FIFO admission.
#[derive(Debug, Default)]
pub struct ResourceQueue {
    name:    String,
    holder:  Option<ProcessId>,
    waiters: VecDeque<ProcessId>,
}

impl ResourceQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), holder: None, waiters: VecDeque::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Take the resource if it is free; otherwise join the back of the line.
    ///
    /// Returns `true` when `process` became holder immediately.
    pub fn acquire(&mut self, process: ProcessId) -> bool {
        if self.holder.is_none() {
            self.holder = Some(process);
            true
        } else {
            self.waiters.push_back(process);
            false
        }
    }

    /// Give the resource up.  The next waiter (if any) becomes holder and is
    /// returned so the caller can schedule it.
    ///
    /// Returns `Err(holder)` if `process` is not the current holder.
    pub fn release(&mut self, process: ProcessId) -> Result<Option<ProcessId>, Option<ProcessId>> {
        if self.holder != Some(process) {
            return Err(self.holder);
        }
        self.holder = self.waiters.pop_front();
        Ok(self.holder)
    }

    pub fn holder(&self) -> Option<ProcessId> {
        self.holder
    }

    /// Holder count (0 or 1) plus queue length.
    pub fn occupancy(&self) -> usize {
        usize::from(self.holder.is_some()) + self.waiters.len()
    }

    pub fn queue_len(&self) -> usize {
        self.waiters.len()
    }
}

// ── Signal ────────────────────────────────────────────────────────────────────

/// Single-release signal: each `set` lets exactly one process through.
///
/// A `set` with nobody waiting latches the flag; the next process to wait
/// consumes the latch and passes without suspending.  Waiting therefore
/// doubles as "queue and auto-clear": whoever is released has already taken
/// the set it was released by.
#[derive(Debug, Default)]
pub struct Signal {
    name:    String,
    latched: bool,
    waiters: VecDeque<ProcessId>,
}

impl Signal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), latched: false, waiters: VecDeque::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Release the longest-waiting process, or latch if nobody waits.
    pub fn set(&mut self) -> Option<ProcessId> {
        match self.waiters.pop_front() {
            Some(p) => Some(p),
            None => {
                self.latched = true;
                None
            }
        }
    }

    /// Consume a latched set, or queue `process`.
    ///
    /// Returns `true` when `process` may proceed immediately.
    pub fn wait(&mut self, process: ProcessId) -> bool {
        if self.latched {
            self.latched = false;
            true
        } else {
            self.waiters.push_back(process);
            false
        }
    }

    /// Drop a latched set.  Already-released processes are unaffected.
    pub fn clear(&mut self) {
        self.latched = false;
    }

    pub fn is_set(&self) -> bool {
        self.latched
    }

    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }
}

// ── LevelSignal ───────────────────────────────────────────────────────────────

/// Level-triggered broadcast: `set` releases everyone currently waiting and
/// the flag stays up until `clear`.
#[derive(Debug, Default)]
pub struct LevelSignal {
    name:    String,
    raised:  bool,
    waiters: Vec<ProcessId>,
}

impl LevelSignal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), raised: false, waiters: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raise the flag and hand back every waiter, oldest first.
    pub fn set(&mut self) -> Vec<ProcessId> {
        self.raised = true;
        std::mem::take(&mut self.waiters)
    }

    /// Pass if the flag is up; otherwise queue `process`.
    pub fn wait(&mut self, process: ProcessId) -> bool {
        if self.raised {
            true
        } else {
            self.waiters.push(process);
            false
        }
    }

    pub fn clear(&mut self) {
        self.raised = false;
    }

    pub fn is_set(&self) -> bool {
        self.raised
    }

    pub fn waiting(&self) -> usize {
        self.waiters.len()
    }
}
