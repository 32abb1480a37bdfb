//! # Observability
//!
//! Centralized tracing setup for the Homelink services.
//!
//! Services call `observability::init_with_config()` once at startup and use
//! standard `tracing` macros everywhere else. Where the output goes is decided
//! here and nowhere else:
//!
//! - no `log_path`: compact human-readable lines on stderr
//! - with `log_path`: structured JSONL appended to that file, optionally
//!   mirrored on stderr
//!
//! ```rust,ignore
//! fn main() {
//!     observability::init_with_config(observability::LogConfig {
//!         service_name: "homelink-server".into(),
//!         default_level: "debug".into(),
//!         ..Default::default()
//!     });
//!     tracing::info!("ready");
//! }
//! ```

mod file;
mod json_layer;

use std::path::PathBuf;

pub use file::FileLogWriter;
pub use json_layer::{JsonLayer, LogEntry};

/// Configuration for the logging system.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Name of the service (e.g., "homelink-server", "homelinkctl").
    /// Included in every JSONL line for filtering.
    pub service_name: String,

    /// Default log level filter (e.g., "debug", "info", "warn").
    /// Can be overridden by `RUST_LOG` environment variable.
    pub default_level: String,

    /// Optional JSONL log file. When unset, logs go to stderr only.
    pub log_path: Option<PathBuf>,

    /// Also emit logs to stderr when writing to a file.
    pub also_stderr: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown".into(),
            default_level: "info".into(),
            log_path: None,
            also_stderr: true,
        }
    }
}

/// Initialize the observability layer with default settings.
pub fn init(service_name: &str) {
    init_with_config(LogConfig {
        service_name: service_name.into(),
        ..Default::default()
    });
}

/// Initialize the observability layer with custom configuration.
///
/// Falls back to stderr output if the log file cannot be opened. Calling this
/// twice is harmless; the second subscriber is ignored.
pub fn init_with_config(config: LogConfig) {
    if let Some(path) = config.log_path.clone() {
        match file::init_file_subscriber(&config, &path) {
            Ok(()) => return,
            Err(e) => {
                eprintln!(
                    "failed to open log file {}: {}, logging to stderr",
                    path.display(),
                    e
                );
            }
        }
    }

    use tracing_subscriber::util::SubscriberInitExt;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(&config.default_level))
        .with_target(true)
        .compact()
        .finish()
        .try_init();
}

/// Build the filter from `RUST_LOG`, or the given default level.
pub(crate) fn env_filter(default_level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level))
}

/// Re-export tracing macros for convenience.
/// Services can use `observability::info!()` or `tracing::info!()`.
pub use tracing::{debug, error, info, instrument, trace, warn};

/// Re-export Level for advanced filtering.
pub use tracing::Level;
