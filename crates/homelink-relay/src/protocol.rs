//! Controller wire protocol.
//!
//! Both directions use one text line per message: `device:property:value`,
//! e.g. `lamp:status:on` or `tv:volume:-10`. Outbound volume values are
//! deltas; inbound volume values are absolute levels reported by the
//! controller.

use crate::{RelayError, RelayResult};
use homelink_core::{clamp_volume, Device, DeviceKey, PowerState, Property};

const SEPARATOR: char = ':';

/// Encode a command as `device:property:value`.
///
/// Device and property tokens are lowercased; the value is written as given.
pub fn encode(device: &str, property: &str, value: &str) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{}",
        device.to_lowercase(),
        property.to_lowercase(),
        value
    )
}

/// Decimal text for a volume delta, keeping sign and fraction (`-10`, `2.5`).
pub fn format_delta(delta: f64) -> String {
    format!("{delta}")
}

/// A command bound for the controller. Built per request and sent once.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub device: Device,
    pub property: Property,
    pub value: String,
}

impl Command {
    pub fn status(device: Device, state: PowerState) -> Self {
        Self {
            device,
            property: Property::Status,
            value: state.as_str().to_string(),
        }
    }

    pub fn volume(device: Device, delta: f64) -> Self {
        Self {
            device,
            property: Property::Volume,
            value: format_delta(delta),
        }
    }

    pub fn encode(&self) -> String {
        encode(self.device.as_str(), self.property.as_str(), &self.value)
    }
}

/// A decoded controller message. Tokens are lowercased but not yet checked
/// against the device model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    pub device: String,
    pub property: String,
    pub value: String,
}

/// A validated store write derived from an [`InboundUpdate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateUpdate {
    pub key: DeviceKey,
    pub value: String,
}

/// Decode one controller message.
///
/// Succeeds only for exactly three non-empty colon-separated parts.
pub fn decode(text: &str) -> RelayResult<InboundUpdate> {
    let parts: Vec<&str> = text.split(SEPARATOR).collect();
    match parts.as_slice() {
        [device, property, value]
            if !device.is_empty() && !property.is_empty() && !value.is_empty() =>
        {
            Ok(InboundUpdate {
                device: device.to_lowercase(),
                property: property.to_lowercase(),
                value: value.to_lowercase(),
            })
        }
        _ => Err(RelayError::MalformedMessage(text.to_string())),
    }
}

impl InboundUpdate {
    /// Storage key, `device_property`.
    pub fn key(&self) -> String {
        format!("{}_{}", self.device, self.property)
    }

    /// Check the update against the device model and normalize the value.
    ///
    /// Status must be `on`/`off`. Volume must be numeric; it is truncated
    /// and clamped into [0, 100].
    pub fn resolve(&self) -> RelayResult<StateUpdate> {
        let unsupported = |reason: &str| RelayError::UnsupportedUpdate {
            key: self.key(),
            reason: reason.to_string(),
        };

        let device: Device = self
            .device
            .parse()
            .map_err(|_| unsupported("unknown device"))?;
        let property: Property = self
            .property
            .parse()
            .map_err(|_| unsupported("unknown property"))?;
        if !device.supports(property) {
            return Err(unsupported("property not supported by device"));
        }

        let value = match property {
            Property::Status => {
                let state: PowerState = self
                    .value
                    .parse()
                    .map_err(|_| unsupported("status must be on or off"))?;
                state.as_str().to_string()
            }
            Property::Volume => {
                let level: f64 = self
                    .value
                    .parse()
                    .map_err(|_| unsupported("volume must be numeric"))?;
                if !level.is_finite() {
                    return Err(unsupported("volume must be finite"));
                }
                clamp_volume(level.trunc() as i64).to_string()
            }
        };

        Ok(StateUpdate {
            key: DeviceKey::new(device, property),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_joins_lowercase_tokens() {
        assert_eq!(encode("tv", "volume", "-10"), "tv:volume:-10");
        assert_eq!(encode("Lamp", "STATUS", "on"), "lamp:status:on");
    }

    #[test]
    fn test_command_encoding() {
        assert_eq!(
            Command::status(Device::KitchenLight, PowerState::Off).encode(),
            "kitchenlight:status:off"
        );
        assert_eq!(Command::volume(Device::Tv, -10.0).encode(), "tv:volume:-10");
        assert_eq!(Command::volume(Device::Radio, 2.5).encode(), "radio:volume:2.5");
    }

    #[test]
    fn test_decode_case_folds() {
        let update = decode("TV:Volume:-10").unwrap();
        assert_eq!(update.key(), "tv_volume");
        assert_eq!(update.value, "-10");

        let update = decode("Lamp:Status:ON").unwrap();
        assert_eq!(update.key(), "lamp_status");
        assert_eq!(update.value, "on");
    }

    #[test]
    fn test_decode_rejects_wrong_part_count() {
        for text in ["tv:volume", "tv:volume:10:extra", "", "hello", "a:b:c:d:e"] {
            assert_eq!(
                decode(text),
                Err(RelayError::MalformedMessage(text.to_string())),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_decode_rejects_empty_parts() {
        assert!(decode("tv::10").is_err());
        assert!(decode(":status:on").is_err());
        assert!(decode("lamp:status:").is_err());
    }

    #[test]
    fn test_resolve_status() {
        let update = decode("lamp:status:ON").unwrap().resolve().unwrap();
        assert_eq!(update.key, DeviceKey::status(Device::Lamp));
        assert_eq!(update.value, "on");

        assert!(decode("lamp:status:dim").unwrap().resolve().is_err());
    }

    #[test]
    fn test_resolve_volume_clamps_and_truncates() {
        let resolve = |text: &str| decode(text).unwrap().resolve().unwrap().value;
        assert_eq!(resolve("tv:volume:55"), "55");
        assert_eq!(resolve("tv:volume:55.9"), "55");
        assert_eq!(resolve("radio:volume:250"), "100");
        assert_eq!(resolve("radio:volume:-4"), "0");

        assert!(decode("tv:volume:loud").unwrap().resolve().is_err());
        assert!(decode("tv:volume:inf").unwrap().resolve().is_err());
    }

    #[test]
    fn test_resolve_rejects_unknown_targets() {
        assert!(matches!(
            decode("toaster:status:on").unwrap().resolve(),
            Err(RelayError::UnsupportedUpdate { key, .. }) if key == "toaster_status"
        ));
        assert!(decode("lamp:colour:red").unwrap().resolve().is_err());
        assert!(decode("lamp:volume:10").unwrap().resolve().is_err());
    }
}
