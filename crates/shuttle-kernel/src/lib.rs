//! `shuttle-kernel` — discrete-event process scheduler and synchronisation
//! primitives.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                   |
//! |----------------|------------------------------------------------------------|
//! | [`resumption`] | `ResumptionQueue` (`BTreeMap<SimTime, VecDeque<_>>`), `Wakeup` |
//! | [`process`]    | `Process` trait, `Suspend`, `FnProcess`                    |
//! | [`context`]    | `Context<'a, W>` — what a running process can touch        |
//! | [`sync`]       | `ResourceQueue`, `Signal`, `LevelSignal`                   |
//! | [`scheduler`]  | `Scheduler<W>`, `KernelStats`                              |
//! | [`error`]      | `KernelError`, `KernelResult<T>`                           |
//!
//! # Execution model
//!
//! ```text
//! loop:
//!   ① pop the earliest (time, process, wakeup) — FIFO among equal times
//!   ② now := time
//!   ③ process.resume(ctx) → Suspend
//!        Hold(d)     → push (now + d, process, Timer)
//!        Acquire(q)  → holder now? resume again : join q's line
//!        Queue(s)    → latched set? consume, resume again : join s's line
//!        Wait(l)     → level up? resume again : join l's waiters
//!        Exit        → drop the process
//! ```
//!
//! Exactly one process runs at a time, so the shared world `W` is mutated
//! without locks.  Releases made by a running process (`set`, `broadcast`,
//! `release`) queue the released processes at the current instant, behind
//! whatever is already pending for it.

pub mod context;
pub mod error;
pub mod process;
pub mod resumption;
pub mod scheduler;
pub mod sync;

#[cfg(test)]
mod tests;

pub use context::Context;
pub use error::{KernelError, KernelResult};
pub use process::{FnProcess, Process, Suspend, from_fn};
pub use resumption::{PendingResumption, ResumptionQueue, Wakeup};
pub use scheduler::{KernelStats, Scheduler};
pub use sync::{LevelSignal, ResourceQueue, Signal};
