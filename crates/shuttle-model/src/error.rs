use shuttle_core::{CoreError, StopId};
use shuttle_kernel::KernelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("{stop} is outside the line of {stop_count} stops")]
    StopOutOfRange { stop: StopId, stop_count: u16 },

    #[error("passenger destination {0} is its own origin")]
    DestinationIsOrigin(StopId),
}

pub type ModelResult<T> = Result<T, ModelError>;
