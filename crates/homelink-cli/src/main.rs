//! homelinkctl - command-line client for the Homelink control API.

mod client;
mod commands;
mod output;
#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand};
use client::{ApiClient, DEFAULT_BASE_URL};
use commands::DeviceAction;
use homelink_core::{init_logging, Device};
use output::OutputFormat;
use tracing::debug;

/// homelinkctl - switch and query household devices through Homelink.
#[derive(Parser)]
#[command(name = "homelinkctl")]
#[command(about = "Control Homelink devices from the command line")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Control API base URL
    #[arg(long, env = "HOMELINK_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Desk lamp
    Lamp {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Television
    Tv {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Radio
    Radio {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Kitchen lights
    Kitchenlight {
        #[command(subcommand)]
        action: DeviceAction,
    },
    /// Act as the controller client, applying commands to a simulated home
    Controller,
}

impl Commands {
    fn device_action(self) -> Option<(Device, DeviceAction)> {
        match self {
            Commands::Lamp { action } => Some((Device::Lamp, action)),
            Commands::Tv { action } => Some((Device::Tv, action)),
            Commands::Radio { action } => Some((Device::Radio, action)),
            Commands::Kitchenlight { action } => Some((Device::KitchenLight, action)),
            Commands::Controller => None,
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging("homelinkctl", &cli.log_level, None);

    let client = ApiClient::new(&cli.base_url);
    let format = cli.format;
    debug!(base_url = client.base_url(), "Using control API");

    let result = match cli.command.device_action() {
        Some((device, action)) => commands::run_device(&client, device, action, &format).await,
        None => commands::run_controller(&client).await,
    };

    if let Err(e) = result {
        output::print_error(&format!("{:#}", e), &format);
        std::process::exit(1);
    }
}
