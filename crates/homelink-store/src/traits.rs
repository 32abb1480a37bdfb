//! Storage trait definitions.

use crate::StoreResult;
use async_trait::async_trait;

/// A string key/value backend for device attributes.
///
/// Single-key operations only: no transactions, no versioning. Concurrent
/// writers to the same key race and the last write wins.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Retrieve a value, `None` if the key was never set.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Store a value, overwriting unconditionally.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Short backend name for logs and health output.
    fn backend_name(&self) -> &'static str;
}
