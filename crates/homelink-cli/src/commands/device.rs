//! Device commands: power, status and volume.

use crate::client::{ApiClient, ClientResult};
use crate::output::{self, OutputFormat};
use anyhow::Result;
use clap::Subcommand;
use homelink_core::{Device, PowerState};
use serde_json::Value;

/// What to do with a device.
#[derive(Debug, Clone, Subcommand)]
pub enum DeviceAction {
    /// Switch the device on
    On,
    /// Switch the device off
    Off,
    /// Show whether the device is on
    Status,
    /// Same as status
    Info,
    /// Change the volume by a relative amount (TV and radio)
    Volume {
        /// Amount to add, e.g. 5 or -10
        #[arg(allow_negative_numbers = true)]
        delta: Option<f64>,
    },
}

/// Run one action against `device`.
pub async fn run_device(
    client: &ApiClient,
    device: Device,
    action: DeviceAction,
    format: &OutputFormat,
) -> Result<()> {
    match action {
        DeviceAction::On => set_power(client, device, PowerState::On, format).await,
        DeviceAction::Off => set_power(client, device, PowerState::Off, format).await,
        DeviceAction::Status | DeviceAction::Info => {
            let on = client.status(device).await?;
            match format {
                OutputFormat::Text => {
                    println!("{} {} {}.", device.label(), verb(device), PowerState::from(on))
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ device.as_str(): on }))
                }
            }
            Ok(())
        }
        DeviceAction::Volume { delta: Some(delta) } => {
            let body = client.change_volume(device, delta).await?;
            output::print_response(&body, format);
            Ok(())
        }
        DeviceAction::Volume { delta: None } => {
            let level = client.volume(device).await?;
            match format {
                OutputFormat::Text => println!("{} volume is {}.", device.label(), level),
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({ format!("{}_volume", device.as_str()): level })
                    )
                }
            }
            Ok(())
        }
    }
}

/// Outcome of a power command.
#[derive(Debug, Clone, PartialEq)]
enum PowerChange {
    /// Status already matched; no request was made.
    Already(String),
    /// Server response to the POST.
    Sent(Value),
}

/// Read the status first and skip the POST when nothing would change.
async fn apply_power(
    client: &ApiClient,
    device: Device,
    desired: PowerState,
) -> ClientResult<PowerChange> {
    let current = PowerState::from(client.status(device).await?);
    if current == desired {
        let message = format!("{} {} already {}.", device.label(), verb(device), desired);
        return Ok(PowerChange::Already(message));
    }
    let body = client.set_power(device, desired).await?;
    Ok(PowerChange::Sent(body))
}

async fn set_power(
    client: &ApiClient,
    device: Device,
    desired: PowerState,
    format: &OutputFormat,
) -> Result<()> {
    match apply_power(client, device, desired).await? {
        PowerChange::Already(message) => output::print_message(&message, format),
        PowerChange::Sent(body) => output::print_response(&body, format),
    }
    Ok(())
}

fn verb(device: Device) -> &'static str {
    if device.label_is_plural() {
        "are"
    } else {
        "is"
    }
}
