use shuttle_core::{CoreError, LevelId, ProcessId, QueueId, SignalId};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KernelError {
    /// A hold with a non-positive or non-finite offset.  Fatal to the
    /// process that requested it; the scheduler keeps running.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("unknown resource queue {0}")]
    UnknownQueue(QueueId),

    #[error("unknown signal {0}")]
    UnknownSignal(SignalId),

    #[error("unknown level signal {0}")]
    UnknownLevel(LevelId),

    #[error("{process} released queue {queue} it does not hold (holder: {holder:?})")]
    NotHolder {
        queue:   QueueId,
        process: ProcessId,
        holder:  Option<ProcessId>,
    },
}

pub type KernelResult<T> = Result<T, KernelError>;
