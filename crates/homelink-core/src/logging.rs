//! Logging initialization.
//!
//! Thin wrapper over the observability crate so binaries share one setup.

use std::path::PathBuf;

/// Initialize the logging system for a Homelink service.
///
/// * `service_name` - tag written into every JSONL line
/// * `level` - default level when `RUST_LOG` is unset
/// * `log_path` - optional JSONL file; stderr only when `None`
pub fn init_logging(service_name: &str, level: &str, log_path: Option<PathBuf>) {
    observability::init_with_config(observability::LogConfig {
        service_name: service_name.into(),
        default_level: level.into(),
        log_path,
        also_stderr: true,
    });
}
