//! The `Process` trait — the unit of cooperative execution.

use shuttle_core::{LevelId, QueueId, SignalId, SimDuration};

use crate::{Context, KernelResult};

/// What a process does when it hands control back to the scheduler.
///
/// These are the only suspension points: a process runs uninterrupted from
/// one `resume` call until it returns one of these.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Suspend {
    /// Resume after the given offset.  Build with [`Context::hold`], which
    /// rejects non-positive offsets.
    Hold(SimDuration),
    /// Become holder of the queue (immediately if it is free).
    Acquire(QueueId),
    /// Consume one `set` of a single-release signal.
    Queue(SignalId),
    /// Wait until the level signal is set.
    Wait(LevelId),
    /// Terminate.  The scheduler drops the process.
    Exit,
}

/// A cooperative process.
///
/// Implementations are explicit state machines: `resume` looks at the
/// process's own phase (and, if needed, [`Context::wakeup`]), does the work
/// that happens at this instant, records the next phase, and returns the
/// suspension to wait on.
///
/// An `Err` aborts this process only.  The scheduler logs it and carries on.
///
/// # Example
///
/// ```rust,ignore
/// struct Ticker { left: u32 }
///
/// impl<W> Process<W> for Ticker {
///     fn resume(&mut self, cx: &mut Context<'_, W>) -> KernelResult<Suspend> {
///         if self.left == 0 {
///             return Ok(Suspend::Exit);
///         }
///         self.left -= 1;
///         cx.hold(1.0)
///     }
/// }
/// ```
pub trait Process<W> {
    /// Run until the next suspension point.
    fn resume(&mut self, cx: &mut Context<'_, W>) -> KernelResult<Suspend>;

    /// Short name used in log lines.
    fn label(&self) -> &'static str {
        "process"
    }
}

/// A [`Process`] backed by a closure.  Handy for tests and one-off helpers.
pub struct FnProcess<F> {
    label: &'static str,
    body:  F,
}

/// Wrap a closure as a process.
pub fn from_fn<W, F>(label: &'static str, body: F) -> FnProcess<F>
where
    F: FnMut(&mut Context<'_, W>) -> KernelResult<Suspend>,
{
    FnProcess { label, body }
}

impl<W, F> Process<W> for FnProcess<F>
where
    F: FnMut(&mut Context<'_, W>) -> KernelResult<Suspend>,
{
    fn resume(&mut self, cx: &mut Context<'_, W>) -> KernelResult<Suspend> {
        (self.body)(cx)
    }

    fn label(&self) -> &'static str {
        self.label
    }
}
