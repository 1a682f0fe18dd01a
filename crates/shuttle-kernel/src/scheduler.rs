//! The `Scheduler` and its resumption loop.

use shuttle_core::{LevelId, ProcessId, QueueId, SignalId, SimTime};
use tracing::{trace, warn};

use crate::{
    Context, KernelError, KernelResult, LevelSignal, Process, ResourceQueue, ResumptionQueue,
    Signal, Suspend, Wakeup,
};

// ── Kernel state ──────────────────────────────────────────────────────────────

/// Counters kept by the scheduler over the whole run.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct KernelStats {
    /// Resumptions popped from the queue.
    pub resumptions: u64,
    pub spawned:     u64,
    /// Processes that returned [`Suspend::Exit`].
    pub finished:    u64,
    /// Processes dropped because `resume` (or the suspension they asked
    /// for) failed.
    pub aborted:     u64,
}

/// Outcome of handing a suspension to the kernel.
enum Parked {
    /// Waiting on the queue, a signal, or a timer.
    Suspended,
    /// The suspension was satisfied on the spot; resume again right away.
    Ready(Wakeup),
    Finished,
}

/// The clock, the pending set, and the primitives — everything a running
/// process may reach through its [`Context`].  Kept apart from the process
/// table so a process can be resumed while the kernel is borrowed mutably.
#[derive(Debug, Default)]
pub(crate) struct Kernel {
    pub(crate) now: SimTime,
    pending:        ResumptionQueue,
    queues:         Vec<ResourceQueue>,
    signals:        Vec<Signal>,
    levels:         Vec<LevelSignal>,
    next_pid:       u32,
    stats:          KernelStats,
}

impl Kernel {
    /// Allocate a process id and schedule its first resumption now.
    pub(crate) fn admit(&mut self) -> ProcessId {
        let pid = ProcessId(self.next_pid);
        self.next_pid += 1;
        self.stats.spawned += 1;
        self.pending.push(self.now, pid, Wakeup::Start);
        pid
    }

    pub(crate) fn queue(&self, id: QueueId) -> KernelResult<&ResourceQueue> {
        self.queues.get(id.index()).ok_or(KernelError::UnknownQueue(id))
    }

    fn queue_mut(&mut self, id: QueueId) -> KernelResult<&mut ResourceQueue> {
        self.queues.get_mut(id.index()).ok_or(KernelError::UnknownQueue(id))
    }

    pub(crate) fn signal(&self, id: SignalId) -> KernelResult<&Signal> {
        self.signals.get(id.index()).ok_or(KernelError::UnknownSignal(id))
    }

    pub(crate) fn signal_mut(&mut self, id: SignalId) -> KernelResult<&mut Signal> {
        self.signals.get_mut(id.index()).ok_or(KernelError::UnknownSignal(id))
    }

    pub(crate) fn level(&self, id: LevelId) -> KernelResult<&LevelSignal> {
        self.levels.get(id.index()).ok_or(KernelError::UnknownLevel(id))
    }

    pub(crate) fn level_mut(&mut self, id: LevelId) -> KernelResult<&mut LevelSignal> {
        self.levels.get_mut(id.index()).ok_or(KernelError::UnknownLevel(id))
    }

    pub(crate) fn set_signal(&mut self, id: SignalId) -> KernelResult<()> {
        let released = self.signal_mut(id)?.set();
        if let Some(p) = released {
            self.pending.push(self.now, p, Wakeup::Signalled(id));
        }
        Ok(())
    }

    pub(crate) fn raise_level(&mut self, id: LevelId) -> KernelResult<usize> {
        let released = self.level_mut(id)?.set();
        for &p in &released {
            self.pending.push(self.now, p, Wakeup::Broadcast(id));
        }
        Ok(released.len())
    }

    pub(crate) fn release_queue(&mut self, id: QueueId, process: ProcessId) -> KernelResult<()> {
        let outcome = self.queue_mut(id)?.release(process);
        match outcome {
            Ok(Some(next)) => {
                self.pending.push(self.now, next, Wakeup::Acquired(id));
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(holder) => Err(KernelError::NotHolder { queue: id, process, holder }),
        }
    }

    fn park(&mut self, pid: ProcessId, suspend: Suspend) -> KernelResult<Parked> {
        let parked = match suspend {
            Suspend::Hold(d) => {
                self.pending.push(self.now.after(d), pid, Wakeup::Timer);
                Parked::Suspended
            }
            Suspend::Acquire(q) => {
                if self.queue_mut(q)?.acquire(pid) {
                    Parked::Ready(Wakeup::Acquired(q))
                } else {
                    Parked::Suspended
                }
            }
            Suspend::Queue(s) => {
                if self.signal_mut(s)?.wait(pid) {
                    Parked::Ready(Wakeup::Signalled(s))
                } else {
                    Parked::Suspended
                }
            }
            Suspend::Wait(l) => {
                if self.level_mut(l)?.wait(pid) {
                    Parked::Ready(Wakeup::Broadcast(l))
                } else {
                    Parked::Suspended
                }
            }
            Suspend::Exit => Parked::Finished,
        };
        Ok(parked)
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

/// Discrete-event scheduler over a shared world `W`.
///
/// Owns virtual time, the pending-resumption set, every synchronisation
/// primitive, and every live process.  Processes run one at a time; the
/// scheduler always resumes the entry with the smallest time, FIFO among
/// equal times, and is the only writer of the clock.
///
/// # Example
///
/// ```rust,ignore
/// let mut sched = Scheduler::new(MyWorld::default());
/// let door = sched.add_level("door");
/// sched.spawn(Waiter { door });
/// sched.spawn(Opener { door });
/// sched.run_until(SimTime::new(100.0)?);
/// ```
pub struct Scheduler<W> {
    kernel:    Kernel,
    processes: Vec<Option<Box<dyn Process<W>>>>,
    newborn:   Vec<(ProcessId, Box<dyn Process<W>>)>,
    world:     W,
}

impl<W> Scheduler<W> {
    pub fn new(world: W) -> Self {
        Self {
            kernel:    Kernel::default(),
            processes: Vec::new(),
            newborn:   Vec::new(),
            world,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> SimTime {
        self.kernel.now
    }

    pub fn world(&self) -> &W {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    pub fn into_world(self) -> W {
        self.world
    }

    pub fn stats(&self) -> KernelStats {
        self.kernel.stats
    }

    /// Number of pending resumptions.
    pub fn pending(&self) -> usize {
        self.kernel.pending.len()
    }

    /// Earliest pending resumption time.
    pub fn next_time(&self) -> Option<SimTime> {
        self.kernel.pending.next_time()
    }

    /// Processes spawned and neither finished nor aborted.
    pub fn live_processes(&self) -> usize {
        self.processes.iter().filter(|p| p.is_some()).count()
    }

    // ── Primitive registry ────────────────────────────────────────────────

    pub fn add_queue(&mut self, name: impl Into<String>) -> QueueId {
        self.kernel.queues.push(ResourceQueue::new(name));
        QueueId((self.kernel.queues.len() - 1) as u32)
    }

    pub fn add_signal(&mut self, name: impl Into<String>) -> SignalId {
        self.kernel.signals.push(Signal::new(name));
        SignalId((self.kernel.signals.len() - 1) as u32)
    }

    pub fn add_level(&mut self, name: impl Into<String>) -> LevelId {
        self.kernel.levels.push(LevelSignal::new(name));
        LevelId((self.kernel.levels.len() - 1) as u32)
    }

    pub fn queue(&self, id: QueueId) -> KernelResult<&ResourceQueue> {
        self.kernel.queue(id)
    }

    pub fn signal(&self, id: SignalId) -> KernelResult<&Signal> {
        self.kernel.signal(id)
    }

    pub fn level(&self, id: LevelId) -> KernelResult<&LevelSignal> {
        self.kernel.level(id)
    }

    // ── Processes ─────────────────────────────────────────────────────────

    /// Create a process, runnable at the current instant.
    pub fn spawn<P>(&mut self, process: P) -> ProcessId
    where
        P: Process<W> + 'static,
    {
        let pid = self.kernel.admit();
        self.install(pid, Box::new(process));
        pid
    }

    fn install(&mut self, pid: ProcessId, body: Box<dyn Process<W>>) {
        let idx = pid.index();
        if self.processes.len() <= idx {
            self.processes.resize_with(idx + 1, || None);
        }
        self.processes[idx] = Some(body);
    }

    fn adopt_newborn(&mut self) {
        let born = std::mem::take(&mut self.newborn);
        for (pid, body) in born {
            self.install(pid, body);
        }
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Pop the earliest resumption, advance the clock to it, and resume that
    /// process.  Returns the new time, or `None` if nothing is pending.
    pub fn step(&mut self) -> Option<SimTime> {
        let next = self.kernel.pending.pop()?;
        debug_assert!(next.time >= self.kernel.now, "resumption scheduled in the past");
        self.kernel.now = next.time;
        self.kernel.stats.resumptions += 1;
        self.dispatch(next.process, next.wakeup);
        Some(next.time)
    }

    /// Resume processes until nothing is pending at or before `horizon`,
    /// then move the clock to `horizon`.  Returns the number of resumptions.
    pub fn run_until(&mut self, horizon: SimTime) -> u64 {
        let before = self.kernel.stats.resumptions;
        while let Some(t) = self.kernel.pending.next_time() {
            if t > horizon {
                break;
            }
            self.step();
        }
        if self.kernel.now < horizon {
            self.kernel.now = horizon;
        }
        self.kernel.stats.resumptions - before
    }

    /// Resume processes until nothing is pending.
    ///
    /// Never returns if some process reschedules itself forever; bound such
    /// runs with [`run_until`][Self::run_until].
    pub fn run(&mut self) -> u64 {
        let before = self.kernel.stats.resumptions;
        while self.step().is_some() {}
        self.kernel.stats.resumptions - before
    }

    /// Resume `pid` and keep resuming it while its suspensions are satisfied
    /// on the spot (free queue, latched signal, raised level).
    fn dispatch(&mut self, pid: ProcessId, mut wakeup: Wakeup) {
        let Some(mut body) = self.processes.get_mut(pid.index()).and_then(Option::take) else {
            trace!(%pid, "resumption for a process that is gone");
            return;
        };

        loop {
            let outcome = {
                let mut cx = Context {
                    kernel:  &mut self.kernel,
                    world:   &mut self.world,
                    newborn: &mut self.newborn,
                    pid,
                    wakeup,
                };
                body.resume(&mut cx)
            };
            self.adopt_newborn();

            let parked = outcome.and_then(|suspend| self.kernel.park(pid, suspend));
            match parked {
                Ok(Parked::Suspended) => {
                    self.install(pid, body);
                    return;
                }
                Ok(Parked::Ready(w)) => wakeup = w,
                Ok(Parked::Finished) => {
                    self.kernel.stats.finished += 1;
                    return;
                }
                Err(error) => {
                    warn!(%pid, process = body.label(), now = %self.kernel.now, %error, "process aborted");
                    self.kernel.stats.aborted += 1;
                    return;
                }
            }
        }
    }
}
