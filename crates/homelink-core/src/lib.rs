//! Core types, configuration, and utilities for Homelink.
//!
//! Homelink relays device commands from HTTP clients to a single connected
//! controller and keeps the last commanded state of each household device.

mod config;
mod device;
mod error;
mod logging;

pub use config::{Config, StoreConfig, DEFAULT_BIND_ADDR, DEFAULT_LOG_LEVEL};
pub use device::{
    clamp_volume, Device, DeviceKey, PowerState, Property, MAX_VOLUME, MIN_VOLUME,
};
pub use error::{CoreError, CoreResult};
pub use logging::init_logging;
