//! Error types for frame encoding and decoding.

use thiserror::Error;

/// Convenience type alias for Results using [`ProtoError`].
pub type Result<T, E = ProtoError> = std::result::Result<T, E>;

/// Protocol-level failures.
#[derive(Debug, Error)]
pub enum ProtoError {
    /// The frame was not valid JSON or did not match any known reply shape.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The topic string is not part of the chat protocol.
    #[error("unknown topic: {0}")]
    UnknownTopic(String),
}
