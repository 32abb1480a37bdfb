//! Runtime configuration.
//!
//! Resolved once at process start: defaults, then an optional JSON file, then
//! environment variables. The result is passed by value into the components
//! that need it and never re-read.

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Default HTTP listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8001";

/// State store backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Use Redis instead of the process-local map.
    pub use_redis: bool,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_db: i64,
    /// Pre-populate the volatile store with the demo scene.
    pub seed_demo_state: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            use_redis: false,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_db: 0,
            seed_demo_state: false,
        }
    }
}

impl StoreConfig {
    /// Connection URL for the Redis backend.
    pub fn redis_url(&self) -> String {
        format!(
            "redis://{}:{}/{}",
            self.redis_host, self.redis_port, self.redis_db
        )
    }
}

/// Main server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Optional JSONL log file.
    pub log_path: Option<PathBuf>,
    /// HTTP listen address.
    pub bind_addr: String,
    pub store: StoreConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_path: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            store: StoreConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file, then apply the environment.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        config.load_from_env()?;
        Ok(config)
    }

    /// Load configuration from a specific JSON file.
    pub fn load_from_file(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Override configuration from process environment variables.
    fn load_from_env(&mut self) -> CoreResult<()> {
        self.apply_env(|name| std::env::var(name).ok())
    }

    /// Override configuration from an environment lookup.
    ///
    /// `USE_REDIS` accepts `true`, `1` or `yes` (any case) as enabled; any
    /// other value disables Redis.
    pub fn apply_env<F>(&mut self, lookup: F) -> CoreResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("HOMELINK_LOG_LEVEL") {
            self.log_level = level;
        }
        if let Some(path) = lookup("HOMELINK_LOG_PATH") {
            self.log_path = Some(PathBuf::from(path));
        }
        if let Some(bind) = lookup("HOMELINK_BIND") {
            self.bind_addr = bind;
        }
        if let Some(flag) = lookup("USE_REDIS") {
            self.store.use_redis = parse_flag(&flag);
        }
        if let Some(host) = lookup("HOMELINK_REDIS_HOST") {
            self.store.redis_host = host;
        }
        if let Some(port) = lookup("HOMELINK_REDIS_PORT") {
            self.store.redis_port = port.parse().map_err(|_| {
                CoreError::Config(format!("HOMELINK_REDIS_PORT is not a port: {port}"))
            })?;
        }
        if let Some(db) = lookup("HOMELINK_REDIS_DB") {
            self.store.redis_db = db.parse().map_err(|_| {
                CoreError::Config(format!("HOMELINK_REDIS_DB is not a number: {db}"))
            })?;
        }
        if let Some(flag) = lookup("HOMELINK_SEED_DEMO_STATE") {
            self.store.seed_demo_state = parse_flag(&flag);
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}
