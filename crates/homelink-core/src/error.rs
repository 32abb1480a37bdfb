//! Core error types.

use thiserror::Error;

/// Core error type.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unknown device name
    #[error("Unknown device: {0}")]
    UnknownDevice(String),

    /// Unknown device property
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Power state other than on/off
    #[error("Invalid state '{0}', expected 'on' or 'off'")]
    InvalidState(String),
}

/// Result type alias using CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
