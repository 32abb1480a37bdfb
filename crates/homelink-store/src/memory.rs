//! Process-local volatile backend.

use crate::{StateStore, StoreResult};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory store. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with the given entries.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: RwLock::new(data),
        }
    }

    /// The scene a fresh demo deployment starts with: lamp and kitchen light
    /// on, TV and radio off at their default volumes.
    pub fn with_demo_scene() -> Self {
        Self::with_entries([
            ("lamp_status", "on"),
            ("tv_status", "off"),
            ("radio_status", "off"),
            ("kitchenlight_status", "on"),
            ("tv_volume", "50"),
            ("radio_volume", "6"),
        ])
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.data.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.data.write().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_get_set() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("tv_status").await.unwrap(), None);

        store.set("tv_status", "on").await.unwrap();
        assert_eq!(store.get("tv_status").await.unwrap(), Some("on".to_string()));

        store.set("tv_status", "off").await.unwrap();
        assert_eq!(store.get("tv_status").await.unwrap(), Some("off".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_demo_scene() {
        let store = MemoryStore::with_demo_scene();
        assert_eq!(store.len(), 6);
        assert_eq!(store.get("kitchenlight_status").await.unwrap().as_deref(), Some("on"));
        assert_eq!(store.get("tv_volume").await.unwrap().as_deref(), Some("50"));
    }
}
