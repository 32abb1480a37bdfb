//! Infallible access to device state.

use crate::StateStore;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Value returned for keys that were never set or could not be read.
pub const DEFAULT_VALUE: &str = "off";

/// Shared handle to the selected backend.
///
/// Backend failures never reach the caller: a failed read yields
/// [`DEFAULT_VALUE`] and a failed write is logged and dropped.
#[derive(Clone)]
pub struct DeviceStateStore {
    backend: Arc<dyn StateStore>,
}

impl DeviceStateStore {
    pub fn new(backend: Arc<dyn StateStore>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// Stored value for `key`, or `"off"` when absent or unreadable.
    pub async fn get(&self, key: impl AsRef<str>) -> String {
        let key = key.as_ref();
        match self.backend.get(key).await {
            Ok(Some(value)) => value,
            Ok(None) => DEFAULT_VALUE.to_string(),
            Err(e) => {
                warn!(key = %key, error = %e, "State read failed, using default");
                DEFAULT_VALUE.to_string()
            }
        }
    }

    /// Overwrite `key`. Best-effort.
    pub async fn set(&self, key: impl AsRef<str>, value: &str) {
        let key = key.as_ref();
        match self.backend.set(key, value).await {
            Ok(()) => debug!(key = %key, value = %value, "State updated"),
            Err(e) => warn!(key = %key, value = %value, error = %e, "State write failed"),
        }
    }
}

impl fmt::Debug for DeviceStateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceStateStore")
            .field("backend", &self.backend_name())
            .finish()
    }
}
