//! Control error types.

use homelink_core::{CoreError, Device};
use homelink_relay::RelayError;
use thiserror::Error;

/// Errors surfaced to API callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    /// No controller connected, or its channel just failed
    #[error("Unity client not connected")]
    ControllerUnavailable,

    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// Requested state is neither on nor off
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Volume delta is NaN or infinite
    #[error("Invalid volume change: {0}")]
    InvalidDelta(f64),

    /// Volume requested for a device without volume
    #[error("{} has no volume control", .0.label())]
    UnsupportedProperty(Device),
}

impl From<RelayError> for ControlError {
    fn from(_: RelayError) -> Self {
        ControlError::ControllerUnavailable
    }
}

impl From<CoreError> for ControlError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownDevice(name) => ControlError::UnknownDevice(name),
            CoreError::InvalidState(state) => ControlError::InvalidState(state),
            other => ControlError::InvalidState(other.to_string()),
        }
    }
}

/// Result type alias using ControlError.
pub type ControlResult<T> = Result<T, ControlError>;
