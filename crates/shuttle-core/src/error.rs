//! Core error type.
//!
//! Higher crates wrap `CoreError` as one variant of their own enum via
//! `#[from]`, so a duration rejected deep inside a process surfaces with its
//! original message.

use thiserror::Error;

/// The base error type for `shuttle-core` and a common source for sub-crates.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("invalid duration {0}: holds must be strictly positive and finite")]
    InvalidDuration(f64),

    #[error("invalid simulation time {0}")]
    InvalidTime(f64),

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `shuttle-core`.
pub type CoreResult<T> = Result<T, CoreError>;
