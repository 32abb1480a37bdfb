//! Household device model.
//!
//! The device set is fixed: lamp, TV, radio and kitchen light. Every device
//! has an on/off `status`; TV and radio also carry a `volume` in [0, 100].
//! State is stored under string keys of the form `<device>_<property>`.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lowest storable volume.
pub const MIN_VOLUME: u8 = 0;

/// Highest storable volume.
pub const MAX_VOLUME: u8 = 100;

/// A controllable household device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    Lamp,
    Tv,
    Radio,
    #[serde(rename = "kitchenlight")]
    KitchenLight,
}

impl Device {
    /// All known devices.
    pub const ALL: [Device; 4] = [Device::Lamp, Device::Tv, Device::Radio, Device::KitchenLight];

    /// Wire and key token for this device.
    pub fn as_str(self) -> &'static str {
        match self {
            Device::Lamp => "lamp",
            Device::Tv => "tv",
            Device::Radio => "radio",
            Device::KitchenLight => "kitchenlight",
        }
    }

    /// Human-facing name used in API messages.
    pub fn label(self) -> &'static str {
        match self {
            Device::Lamp => "Lamp",
            Device::Tv => "TV",
            Device::Radio => "Radio",
            Device::KitchenLight => "Kitchen lights",
        }
    }

    /// Whether the label reads as plural ("Kitchen lights are ...").
    pub fn label_is_plural(self) -> bool {
        matches!(self, Device::KitchenLight)
    }

    pub fn supports_volume(self) -> bool {
        self.default_volume().is_some()
    }

    /// Volume assumed when none is stored or the stored value is corrupt.
    pub fn default_volume(self) -> Option<u8> {
        match self {
            Device::Tv => Some(50),
            Device::Radio => Some(6),
            Device::Lamp | Device::KitchenLight => None,
        }
    }

    pub fn supports(self, property: Property) -> bool {
        match property {
            Property::Status => true,
            Property::Volume => self.supports_volume(),
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Device {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "lamp" => Ok(Device::Lamp),
            "tv" => Ok(Device::Tv),
            "radio" => Ok(Device::Radio),
            "kitchenlight" => Ok(Device::KitchenLight),
            _ => Err(CoreError::UnknownDevice(s.to_string())),
        }
    }
}

/// A stored attribute of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Property {
    Status,
    Volume,
}

impl Property {
    pub fn as_str(self) -> &'static str {
        match self {
            Property::Status => "status",
            Property::Volume => "volume",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Property {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "status" => Ok(Property::Status),
            "volume" => Ok(Property::Volume),
            _ => Err(CoreError::UnknownProperty(s.to_string())),
        }
    }
}

/// On/off status of a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PowerState {
    On,
    Off,
}

impl PowerState {
    pub fn as_str(self) -> &'static str {
        match self {
            PowerState::On => "on",
            PowerState::Off => "off",
        }
    }
}

impl From<bool> for PowerState {
    fn from(on: bool) -> Self {
        if on {
            PowerState::On
        } else {
            PowerState::Off
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PowerState {
    type Err = CoreError;

    /// Case-insensitive: "ON", "On" and "on" all parse.
    fn from_str(s: &str) -> CoreResult<Self> {
        if s.eq_ignore_ascii_case("on") {
            Ok(PowerState::On)
        } else if s.eq_ignore_ascii_case("off") {
            Ok(PowerState::Off)
        } else {
            Err(CoreError::InvalidState(s.to_string()))
        }
    }
}

/// Storage key for one device attribute, e.g. `lamp_status` or `tv_volume`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceKey(String);

impl DeviceKey {
    pub fn new(device: Device, property: Property) -> Self {
        Self(format!("{}_{}", device.as_str(), property.as_str()))
    }

    pub fn status(device: Device) -> Self {
        Self::new(device, Property::Status)
    }

    pub fn volume(device: Device) -> Self {
        Self::new(device, Property::Volume)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DeviceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Clamp a computed volume into [MIN_VOLUME, MAX_VOLUME].
pub fn clamp_volume(value: i64) -> u8 {
    value.clamp(i64::from(MIN_VOLUME), i64::from(MAX_VOLUME)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_tokens_roundtrip() {
        for device in Device::ALL {
            assert_eq!(device.as_str().parse::<Device>().unwrap(), device);
        }
        assert_eq!("KitchenLight".parse::<Device>().unwrap(), Device::KitchenLight);
        assert!("toaster".parse::<Device>().is_err());
    }

    #[test]
    fn test_volume_support() {
        assert!(Device::Tv.supports_volume());
        assert!(Device::Radio.supports_volume());
        assert!(!Device::Lamp.supports_volume());
        assert!(!Device::KitchenLight.supports(Property::Volume));
        assert!(Device::KitchenLight.supports(Property::Status));
    }

    #[test]
    fn test_default_volumes() {
        assert_eq!(Device::Tv.default_volume(), Some(50));
        assert_eq!(Device::Radio.default_volume(), Some(6));
        assert_eq!(Device::Lamp.default_volume(), None);
    }

    #[test]
    fn test_power_state_parse_is_case_insensitive() {
        assert_eq!("ON".parse::<PowerState>().unwrap(), PowerState::On);
        assert_eq!("Off".parse::<PowerState>().unwrap(), PowerState::Off);
        assert!(matches!(
            "dim".parse::<PowerState>(),
            Err(CoreError::InvalidState(s)) if s == "dim"
        ));
    }

    #[test]
    fn test_device_keys() {
        assert_eq!(DeviceKey::status(Device::Lamp).as_str(), "lamp_status");
        assert_eq!(DeviceKey::volume(Device::Tv).as_str(), "tv_volume");
        assert_eq!(
            DeviceKey::status(Device::KitchenLight).to_string(),
            "kitchenlight_status"
        );
    }

    #[test]
    fn test_clamp_volume() {
        assert_eq!(clamp_volume(145), 100);
        assert_eq!(clamp_volume(-45), 0);
        assert_eq!(clamp_volume(37), 37);
        assert_eq!(clamp_volume(i64::MIN), 0);
    }

    #[test]
    fn test_device_serde_tokens() {
        let json = serde_json::to_string(&Device::KitchenLight).unwrap();
        assert_eq!(json, "\"kitchenlight\"");
        let state: PowerState = serde_json::from_str("\"on\"").unwrap();
        assert_eq!(state, PowerState::On);
    }
}
