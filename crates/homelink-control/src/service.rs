//! Toggle, volume and query operations for every device.

use crate::{ControlError, ControlResult};
use homelink_core::{clamp_volume, Device, DeviceKey, PowerState};
use homelink_relay::{Command, ConnectionRegistry};
use homelink_store::DeviceStateStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a status change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ToggleOutcome {
    /// Command queued for the controller and recorded.
    Sent { message: String, command: String },
    /// Stored status already matched; nothing was sent.
    AlreadyInState { message: String },
}

impl ToggleOutcome {
    fn sent(command: String) -> Self {
        ToggleOutcome::Sent {
            message: "Command sent".to_string(),
            command,
        }
    }

    fn already(device: Device, state: PowerState) -> Self {
        let verb = if device.label_is_plural() { "are" } else { "is" };
        ToggleOutcome::AlreadyInState {
            message: format!("{} {verb} already {state}.", device.label()),
        }
    }

    pub fn was_sent(&self) -> bool {
        matches!(self, ToggleOutcome::Sent { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ToggleOutcome::Sent { message, .. } | ToggleOutcome::AlreadyInState { message } => {
                message
            }
        }
    }
}

/// Result of a volume change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeOutcome {
    pub message: String,
    pub command: String,
    pub new_volume: u8,
}

/// Issues device commands through the registry and tracks the last
/// commanded state in the store.
#[derive(Debug, Clone)]
pub struct DeviceController {
    store: DeviceStateStore,
    registry: Arc<ConnectionRegistry>,
}

impl DeviceController {
    pub fn new(store: DeviceStateStore, registry: Arc<ConnectionRegistry>) -> Self {
        Self { store, registry }
    }

    pub fn store(&self) -> &DeviceStateStore {
        &self.store
    }

    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    async fn ensure_connected(&self) -> ControlResult<()> {
        if self.registry.is_connected().await {
            Ok(())
        } else {
            Err(ControlError::ControllerUnavailable)
        }
    }

    /// Switch `device` on or off.
    ///
    /// A request matching the stored status is acknowledged without touching
    /// the channel. Otherwise the command is sent and, once queued, recorded
    /// as the device's status. A failed send leaves the store untouched.
    pub async fn toggle(&self, device: Device, desired: PowerState) -> ControlResult<ToggleOutcome> {
        self.ensure_connected().await?;

        let key = DeviceKey::status(device);
        let current = self.store.get(&key).await;
        if current.eq_ignore_ascii_case(desired.as_str()) {
            debug!(device = %device, state = %desired, "Device already in requested state");
            return Ok(ToggleOutcome::already(device, desired));
        }

        let command = Command::status(device, desired).encode();
        if let Err(e) = self.registry.send(command.clone()).await {
            warn!(device = %device, error = %e, "Toggle command not delivered");
            return Err(e.into());
        }
        self.store.set(&key, desired.as_str()).await;

        info!(device = %device, state = %desired, command = %command, "Toggle command sent");
        Ok(ToggleOutcome::sent(command))
    }

    /// Last commanded status. Anything other than exactly `on` reads as off.
    pub async fn query_status(&self, device: Device) -> bool {
        self.store.get(DeviceKey::status(device)).await == PowerState::On.as_str()
    }

    /// Nudge the volume of `device` by `delta`.
    ///
    /// Every call sends; there is no idempotence check for volume. The stored
    /// level becomes `clamp(current + trunc(delta))`.
    pub async fn adjust_volume(&self, device: Device, delta: f64) -> ControlResult<VolumeOutcome> {
        let default = device
            .default_volume()
            .ok_or(ControlError::UnsupportedProperty(device))?;
        if !delta.is_finite() {
            return Err(ControlError::InvalidDelta(delta));
        }
        self.ensure_connected().await?;

        let command = Command::volume(device, delta).encode();
        if let Err(e) = self.registry.send(command.clone()).await {
            warn!(device = %device, error = %e, "Volume command not delivered");
            return Err(e.into());
        }

        let key = DeviceKey::volume(device);
        let current = parse_volume(&self.store.get(&key).await, default);
        let new_volume = clamp_volume(i64::from(current).saturating_add(delta.trunc() as i64));
        self.store.set(&key, &new_volume.to_string()).await;

        info!(
            device = %device,
            delta,
            previous = current,
            new_volume,
            "Volume command sent"
        );
        Ok(VolumeOutcome {
            message: format!("{} volume command sent", device.label()),
            command,
            new_volume,
        })
    }

    /// Last known volume, falling back to the device default when the stored
    /// value is missing or not an integer.
    pub async fn query_volume(&self, device: Device) -> ControlResult<u8> {
        let default = device
            .default_volume()
            .ok_or(ControlError::UnsupportedProperty(device))?;
        Ok(parse_volume(
            &self.store.get(DeviceKey::volume(device)).await,
            default,
        ))
    }
}

/// Stored volume text to a level in [0, 100].
fn parse_volume(raw: &str, default: u8) -> u8 {
    match raw.trim().parse::<i64>() {
        Ok(level) => clamp_volume(level),
        Err(_) => {
            debug!(value = %raw, default, "Stored volume unreadable, using default");
            default
        }
    }
}
