//! Typed key-value settings.
//!
//! Values are stored as JSON so they stay readable in the database and
//! tolerate added fields.

mod backend;
mod memory;
mod sqlite;

pub use backend::SettingsBackend;
pub use memory::MemoryBackend;
pub use sqlite::SqliteBackend;

use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("database error: {0}")]
    Database(#[from] async_sqlite::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(serde_json::Error),
    #[error("deserialization error for '{key}': {source}")]
    Deserialization {
        key: String,
        source: serde_json::Error,
    },
}

/// Typed settings provider over a [`SettingsBackend`].
#[derive(Clone)]
pub struct SettingsProvider {
    backend: Arc<dyn SettingsBackend>,
}

impl SettingsProvider {
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Provider backed by a fresh [`MemoryBackend`].
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, SettingsError> {
        match self.backend.load(key).await? {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|source| SettingsError::Deserialization {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Get a typed value, or `default` if the key is absent.
    pub async fn get_or<T: DeserializeOwned>(
        &self,
        key: &str,
        default: T,
    ) -> Result<T, SettingsError> {
        Ok(self.get(key).await?.unwrap_or(default))
    }

    pub async fn set<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let json = serde_json::to_string(value).map_err(SettingsError::Serialization)?;
        self.backend.store(key, json).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), SettingsError> {
        self.backend.remove(key).await
    }

    pub async fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        self.backend.keys(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[tokio::test]
    async fn test_typed_roundtrip_in_memory() {
        let settings = SettingsProvider::in_memory();
        let mut widths = BTreeMap::new();
        widths.insert("kcal".to_string(), 120u32);

        settings.set("tables/widths", &widths).await.unwrap();
        let loaded: Option<BTreeMap<String, u32>> = settings.get("tables/widths").await.unwrap();
        assert_eq!(loaded, Some(widths));

        assert_eq!(settings.get_or("missing", 7u32).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_prefix_listing_is_sorted() {
        let settings = SettingsProvider::in_memory();
        settings.set("users/b/preferences", &1).await.unwrap();
        settings.set("users/a/preferences", &2).await.unwrap();
        settings.set("theme", &"dark").await.unwrap();

        assert_eq!(
            settings.keys_with_prefix("users/").await.unwrap(),
            ["users/a/preferences", "users/b/preferences"]
        );

        settings.delete("users/a/preferences").await.unwrap();
        assert_eq!(settings.keys_with_prefix("users/").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_bad_payload_reports_key() {
        let backend = MemoryBackend::new();
        backend.store("broken", "{not json".to_string()).await.unwrap();
        let settings = SettingsProvider::new(backend);

        let err = settings.get::<u32>("broken").await.unwrap_err();
        assert!(err.to_string().contains("'broken'"));
    }
}
