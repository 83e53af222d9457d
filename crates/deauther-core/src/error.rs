//! Bridge error types.

use thiserror::Error;

/// Errors crossing the bridge boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BridgeError {
    /// A message could not be serialized.
    #[error("failed to encode bridge message: {0}")]
    Encode(String),

    /// A message could not be parsed (malformed JSON or unknown command).
    #[error("failed to decode bridge message: {0}")]
    Decode(String),

    /// The bridge is gone and cannot accept messages.
    #[error("bridge disconnected")]
    Disconnected,
}
