//! Device control service.
//!
//! Each operation reads the last known state, decides what to send, sends it
//! to the controller, and records the result. There is no acknowledgement
//! channel from the controller, so stored state reflects the last command
//! sent rather than a confirmed device state.

mod error;
mod service;

pub use error::{ControlError, ControlResult};
pub use service::{DeviceController, ToggleOutcome, VolumeOutcome};
