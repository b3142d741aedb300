//! Storage seam under [`SettingsProvider`](super::SettingsProvider).

use async_trait::async_trait;

use super::SettingsError;

/// Keyed JSON documents.
///
/// Backends store the text they are given; the provider owns the encoding.
#[async_trait]
pub trait SettingsBackend: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, SettingsError>;

    /// Insert or replace the document under `key`.
    async fn store(&self, key: &str, json: String) -> Result<(), SettingsError>;

    async fn remove(&self, key: &str) -> Result<(), SettingsError>;

    /// Keys starting with `prefix`, ascending.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, SettingsError>;
}
