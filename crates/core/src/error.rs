//! Centralized error types for the Warden workspace.

use thiserror::Error;

/// Top-level error enum. Variants map to subsystems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum WardenError {
    #[error("Simulation backend error: {0}")]
    Backend(String),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type WardenResult<T> = Result<T, WardenError>;
