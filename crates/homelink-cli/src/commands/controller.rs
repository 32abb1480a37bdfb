//! Simulated controller.
//!
//! Connects to the controller channel, applies every command it receives to
//! a local model of the household and reports the resulting state back, the
//! way a real client would after driving its scene.

use crate::client::ApiClient;
use crate::output;
use anyhow::{Context, Result};
use futures_util::{SinkExt, StreamExt};
use homelink_core::{clamp_volume, Device, PowerState, Property};
use homelink_relay::{decode, encode};
use std::collections::HashMap;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// Local stand-in for the devices a controller drives.
#[derive(Debug, Clone)]
pub struct SimulatedHome {
    power: HashMap<Device, PowerState>,
    volume: HashMap<Device, u8>,
}

impl Default for SimulatedHome {
    fn default() -> Self {
        let mut volume = HashMap::new();
        for device in Device::ALL {
            if let Some(level) = device.default_volume() {
                volume.insert(device, level);
            }
        }
        Self {
            power: HashMap::new(),
            volume,
        }
    }
}

impl SimulatedHome {
    pub fn power(&self, device: Device) -> PowerState {
        self.power.get(&device).copied().unwrap_or(PowerState::Off)
    }

    pub fn volume(&self, device: Device) -> Option<u8> {
        self.volume.get(&device).copied()
    }

    /// Apply one command and return the report to send back, if any.
    ///
    /// Volume commands carry a delta; the report carries the new absolute
    /// level.
    pub fn apply(&mut self, text: &str) -> Option<String> {
        let command = match decode(text) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Ignoring command");
                return None;
            }
        };
        let device: Device = command.device.parse().ok()?;
        let property: Property = command.property.parse().ok()?;

        match property {
            Property::Status => {
                let state: PowerState = command.value.parse().ok()?;
                self.power.insert(device, state);
                Some(encode(device.as_str(), property.as_str(), state.as_str()))
            }
            Property::Volume => {
                let delta: f64 = command.value.parse().ok()?;
                let current = self.volume(device)?;
                let level = clamp_volume(i64::from(current) + delta.trunc() as i64);
                self.volume.insert(device, level);
                Some(encode(device.as_str(), property.as_str(), &level.to_string()))
            }
        }
    }
}

/// Act as the controller until the server closes the channel or Ctrl+C.
pub async fn run_controller(client: &ApiClient) -> Result<()> {
    let url = client.controller_url();
    let (socket, _) = connect_async(url.as_str())
        .await
        .with_context(|| format!("Failed to connect to {url}"))?;
    info!(url = %url, "Connected as controller");
    println!("Connected to {url} as controller. Press Ctrl+C to stop.");

    let (mut sink, mut stream) = socket.split();
    let mut home = SimulatedHome::default();

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    let text = text.as_str();
                    println!("<- {text}");
                    if let Some(report) = home.apply(text) {
                        println!("-> {report}");
                        sink.send(Message::Text(report.into()))
                            .await
                            .context("Failed to report state")?;
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    println!("Server closed the channel");
                    break;
                }
                Some(Ok(other)) => debug!(frame = ?other, "Ignoring frame"),
                Some(Err(e)) => return Err(e).context("Controller channel failed"),
            },
            _ = tokio::signal::ctrl_c() => {
                let _ = sink.send(Message::Close(None)).await;
                break;
            }
        }
    }

    println!("Final state:");
    for device in Device::ALL {
        let state = match home.volume(device) {
            Some(level) => format!("{}, volume {}", home.power(device), level),
            None => home.power(device).to_string(),
        };
        output::print_row(device.label(), &state);
    }
    Ok(())
}
