//! The per-resumption handle a process uses to talk to the scheduler.

use shuttle_core::{LevelId, ProcessId, QueueId, SignalId, SimDuration, SimTime};

use crate::scheduler::Kernel;
use crate::{KernelResult, Process, Suspend, Wakeup};

/// Everything a running process may touch during one `resume` call.
///
/// `Context` borrows the scheduler's kernel state and the shared world
/// mutably for the duration of a single resumption.  Only one process runs
/// at a time, so these borrows never overlap and the world needs no locking.
///
/// Non-suspending operations (`set`, `broadcast`, `release`, `spawn`, …) take
/// effect immediately; any process they release is queued behind everything
/// already pending at the current instant.
pub struct Context<'a, W> {
    pub(crate) kernel:  &'a mut Kernel,
    pub(crate) world:   &'a mut W,
    pub(crate) newborn: &'a mut Vec<(ProcessId, Box<dyn Process<W>>)>,
    pub(crate) pid:     ProcessId,
    pub(crate) wakeup:  Wakeup,
}

impl<'a, W> Context<'a, W> {
    /// Current virtual time.
    #[inline]
    pub fn now(&self) -> SimTime {
        self.kernel.now
    }

    /// The running process.
    #[inline]
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Why the running process was resumed.
    #[inline]
    pub fn wakeup(&self) -> Wakeup {
        self.wakeup
    }

    #[inline]
    pub fn world(&self) -> &W {
        self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut W {
        self.world
    }

    // ── Suspensions ───────────────────────────────────────────────────────

    /// Build a `Hold` suspension.
    ///
    /// # Errors
    /// `InvalidDuration` if `duration` is not strictly positive and finite.
    pub fn hold(&self, duration: f64) -> KernelResult<Suspend> {
        Ok(Suspend::Hold(SimDuration::new(duration)?))
    }

    // ── Processes ─────────────────────────────────────────────────────────

    /// Create a new process, runnable at the current instant after everything
    /// already pending for it.
    pub fn spawn<P>(&mut self, process: P) -> ProcessId
    where
        P: Process<W> + 'static,
    {
        let pid = self.kernel.admit();
        self.newborn.push((pid, Box::new(process)));
        pid
    }

    // ── Signals ───────────────────────────────────────────────────────────

    /// Release one waiter of a single-release signal, or latch it.
    pub fn set(&mut self, signal: SignalId) -> KernelResult<()> {
        self.kernel.set_signal(signal)
    }

    /// Drop a latched set.
    pub fn clear(&mut self, signal: SignalId) -> KernelResult<()> {
        self.kernel.signal_mut(signal)?.clear();
        Ok(())
    }

    pub fn is_set(&self, signal: SignalId) -> KernelResult<bool> {
        Ok(self.kernel.signal(signal)?.is_set())
    }

    /// Raise a level signal, releasing every current waiter.  Returns how
    /// many were released.
    pub fn broadcast(&mut self, level: LevelId) -> KernelResult<usize> {
        self.kernel.raise_level(level)
    }

    /// Lower a level signal.  Waiters already released stay released.
    pub fn clear_level(&mut self, level: LevelId) -> KernelResult<()> {
        self.kernel.level_mut(level)?.clear();
        Ok(())
    }

    // ── Resource queues ───────────────────────────────────────────────────

    /// Give up a queue the running process holds.
    ///
    /// # Errors
    /// `NotHolder` if the running process is not the holder.
    pub fn release(&mut self, queue: QueueId) -> KernelResult<()> {
        self.kernel.release_queue(queue, self.pid)
    }

    /// Holder count plus waiters.  Never blocks.
    pub fn occupancy(&self, queue: QueueId) -> KernelResult<usize> {
        Ok(self.kernel.queue(queue)?.occupancy())
    }
}
