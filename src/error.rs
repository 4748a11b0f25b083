//! Unified error handling for the chat model.
//!
//! Soft failures (joining while anonymous, sending without a chatee) are
//! reported as `false` by the operations themselves. The variants here are
//! the hard failures: bad caller input, broken registry invariants, calls
//! made in the wrong identity state, and backend replies the model cannot
//! make sense of.

use spachat_proto::ProtoError;
use thiserror::Error;

/// Errors raised by registry, identity and chat operations.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Caller input rejected before any side effect.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A client id is already present in the registry.
    #[error("duplicate client id: {0}")]
    DuplicateId(String),

    /// A backend reply was malformed, incomplete or unexpected.
    /// Session state is left untouched.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The operation is not allowed in the current identity state.
    #[error("invalid state: {0}")]
    InvalidState(String),
}

impl ModelError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::DuplicateId(_) => "duplicate_id",
            Self::Protocol(_) => "protocol_error",
            Self::InvalidState(_) => "invalid_state",
        }
    }
}

impl From<ProtoError> for ModelError {
    fn from(err: ProtoError) -> Self {
        Self::Protocol(err.to_string())
    }
}

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
