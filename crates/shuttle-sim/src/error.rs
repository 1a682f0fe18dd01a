use shuttle_core::CoreError;
use shuttle_kernel::KernelError;
use shuttle_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Kernel(#[from] KernelError),

    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

pub type SimResult<T> = Result<T, SimError>;
