//! Error types shared by the world, inventory and settings code.

use thiserror::Error;

/// Errors surfaced synchronously to the caller. None of them is fatal to the
/// frame loop.
#[derive(Error, Debug)]
pub enum SandboxError {
    /// A block type, coordinate or configuration value was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Settings could not be encoded or decoded.
    #[error("settings serialization failed: {0}")]
    Settings(#[from] bincode::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SandboxError {
    pub fn invalid(message: impl Into<String>) -> Self {
        SandboxError::InvalidArgument(message.into())
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, SandboxError::InvalidArgument(_))
    }
}

pub type SandboxResult<T> = Result<T, SandboxError>;
