//! Device state storage for Homelink.
//!
//! Two interchangeable backends sit behind the [`StateStore`] trait:
//! - **Redis**: durable, shared between processes
//! - **Memory**: process-local map, lost on restart
//!
//! The backend is chosen once at startup by [`create_store`]. Callers use the
//! [`DeviceStateStore`] wrapper, which never fails: reads fall back to
//! defaults and writes are best-effort. The stored state is a cache of what
//! was last commanded, not a source of truth.

mod device_states;
mod memory;
mod redis_store;
mod traits;

pub use device_states::{DeviceStateStore, DEFAULT_VALUE};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use traits::StateStore;

use homelink_core::StoreConfig;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Redis connection or command error
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Any other backend failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Build the configured backend and wrap it.
///
/// With `use_redis` the Redis server must be reachable now; there is no
/// fallback to the volatile map.
pub async fn create_store(config: &StoreConfig) -> StoreResult<DeviceStateStore> {
    let backend: Arc<dyn StateStore> = if config.use_redis {
        let url = config.redis_url();
        let store = RedisStore::connect(&url).await?;
        info!(url = %url, "Using Redis for device state");
        Arc::new(store)
    } else if config.seed_demo_state {
        info!("Using in-memory device state (demo scene)");
        Arc::new(MemoryStore::with_demo_scene())
    } else {
        info!("Using in-memory device state");
        Arc::new(MemoryStore::new())
    };

    Ok(DeviceStateStore::new(backend))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_memory_store() {
        let store = create_store(&StoreConfig::default()).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
        assert_eq!(store.get("lamp_status").await, "off");
    }

    #[tokio::test]
    async fn test_create_seeded_memory_store() {
        let config = StoreConfig {
            seed_demo_state: true,
            ..Default::default()
        };
        let store = create_store(&config).await.unwrap();
        assert_eq!(store.get("lamp_status").await, "on");
        assert_eq!(store.get("radio_volume").await, "6");
    }

    #[tokio::test]
    async fn test_create_redis_store_unreachable_fails() {
        let config = StoreConfig {
            use_redis: true,
            redis_host: "127.0.0.1".to_string(),
            redis_port: 1,
            ..Default::default()
        };
        assert!(create_store(&config).await.is_err());
    }
}
