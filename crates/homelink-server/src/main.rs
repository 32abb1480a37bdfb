//! Homelink server - relays device commands from the HTTP API to the controller.

use anyhow::Context;
use clap::Parser;
use homelink_core::{init_logging, Config};
use homelink_server::AppState;
use homelink_store::create_store;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::info;

/// Homelink server command-line interface.
#[derive(Parser)]
#[command(name = "homelink-server")]
#[command(about = "Control API and controller channel for Homelink devices")]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, env = "HOMELINK_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address, e.g. 0.0.0.0:8001
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Keep device state in Redis
    #[arg(long)]
    use_redis: bool,
}

impl Cli {
    /// Flags win over the environment and the config file.
    fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.bind_addr = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.use_redis {
            config.store.use_redis = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);

    init_logging("homelink-server", &config.log_level, config.log_path.clone());

    let store = create_store(&config.store)
        .await
        .context("Failed to open device state store")?;
    let state = AppState::new(store);

    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!(
        addr = %listener.local_addr()?,
        store = state.controller.store().backend_name(),
        "Homelink server listening"
    );

    homelink_server::serve(listener, state, shutdown_signal())
        .await
        .context("Server error")?;

    info!("Homelink server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
