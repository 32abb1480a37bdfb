//! Relay error types.

use thiserror::Error;

/// Relay error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// No controller is registered
    #[error("Controller not connected")]
    NotConnected,

    /// The registered controller's channel is gone
    #[error("Controller channel closed")]
    ChannelClosed,

    /// Inbound text is not `device:property:value`
    #[error("Malformed controller message: {0:?}")]
    MalformedMessage(String),

    /// Well-formed inbound update that does not fit the device model
    #[error("Unsupported update for {key}: {reason}")]
    UnsupportedUpdate { key: String, reason: String },
}

/// Result type alias using RelayError.
pub type RelayResult<T> = Result<T, RelayError>;
