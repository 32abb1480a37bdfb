//! Command implementations.

mod controller;
mod device;

pub use controller::run_controller;
pub use device::{run_device, DeviceAction};
