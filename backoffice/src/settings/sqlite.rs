//! SQLite document store.

use std::path::Path;

use async_sqlite::Client;
use async_trait::async_trait;
use dashmap::DashMap;
use rusqlite::OptionalExtension;

use super::{SettingsBackend, SettingsError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS documents (
    key        TEXT PRIMARY KEY,
    json       TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Settings documents in a SQLite file.
///
/// A document read once is served from a [`DashMap`] afterwards. Writes reach
/// the database before the cache.
pub struct SqliteBackend {
    client: Client,
    cache: DashMap<String, String>,
}

impl SqliteBackend {
    /// Open (or create) the database at `path`. Missing parent directories
    /// are created.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let client = async_sqlite::ClientBuilder::new().path(path).open().await?;
        client.conn(|conn| conn.execute(SCHEMA, [])).await?;
        log::debug!("settings database at {}", path.display());

        Ok(Self {
            client,
            cache: DashMap::new(),
        })
    }

    /// When the document under `key` was last written (RFC 3339, UTC).
    pub async fn updated_at(&self, key: &str) -> Result<Option<String>, SettingsError> {
        let key = key.to_string();
        let stamp = self
            .client
            .conn(move |conn| {
                conn.query_row(
                    "SELECT updated_at FROM documents WHERE key = ?1",
                    [&key],
                    |row| row.get::<_, String>(0),
                )
                .optional()
            })
            .await?;
        Ok(stamp)
    }
}

#[async_trait]
impl SettingsBackend for SqliteBackend {
    async fn load(&self, key: &str) -> Result<Option<String>, SettingsError> {
        if let Some(doc) = self.cache.get(key) {
            return Ok(Some(doc.value().clone()));
        }

        let owned = key.to_string();
        let loaded = self
            .client
            .conn(move |conn| {
                conn.query_row("SELECT json FROM documents WHERE key = ?1", [&owned], |row| {
                    row.get::<_, String>(0)
                })
                .optional()
            })
            .await?;

        if let Some(doc) = &loaded {
            self.cache.insert(key.to_string(), doc.clone());
        }
        Ok(loaded)
    }

    async fn store(&self, key: &str, json: String) -> Result<(), SettingsError> {
        let owned = key.to_string();
        let body = json.clone();
        let now = chrono::Utc::now().to_rfc3339();

        self.client
            .conn(move |conn| {
                conn.execute(
                    "INSERT INTO documents (key, json, updated_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE
                     SET json = excluded.json, updated_at = excluded.updated_at",
                    rusqlite::params![owned, body, now],
                )
            })
            .await?;

        self.cache.insert(key.to_string(), json);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SettingsError> {
        let owned = key.to_string();
        self.client
            .conn(move |conn| conn.execute("DELETE FROM documents WHERE key = ?1", [&owned]))
            .await?;
        self.cache.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, SettingsError> {
        // `LIKE` ignores ASCII case; compare the leading characters exactly.
        let prefix = prefix.to_string();
        let len = prefix.chars().count() as i64;
        let keys = self
            .client
            .conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT key FROM documents WHERE substr(key, 1, ?2) = ?1 ORDER BY key",
                )?;
                let rows = stmt.query_map(rusqlite::params![prefix, len], |row| {
                    row.get::<_, String>(0)
                })?;
                rows.collect::<Result<Vec<_>, _>>()
            })
            .await?;
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn temp_db(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("backoffice-sqlite-{}", std::process::id()));
        let path = dir.join(name);
        let _ = std::fs::remove_file(&path);
        path
    }

    #[tokio::test]
    async fn test_store_load_remove() {
        let path = temp_db("roundtrip.db");
        let backend = SqliteBackend::open(&path).await.unwrap();

        assert_eq!(backend.load("users/u1/preferences").await.unwrap(), None);
        assert_eq!(backend.updated_at("users/u1/preferences").await.unwrap(), None);

        backend.store("users/u1/preferences", r#"{"a":1}"#.into()).await.unwrap();
        backend.store("users/u1/preferences", r#"{"a":2}"#.into()).await.unwrap();
        assert_eq!(
            backend.load("users/u1/preferences").await.unwrap().as_deref(),
            Some(r#"{"a":2}"#)
        );
        let stamp = backend.updated_at("users/u1/preferences").await.unwrap().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(&stamp).is_ok());

        // A fresh connection sees what the first one wrote.
        drop(backend);
        let reopened = SqliteBackend::open(&path).await.unwrap();
        assert_eq!(
            reopened.load("users/u1/preferences").await.unwrap().as_deref(),
            Some(r#"{"a":2}"#)
        );

        reopened.remove("users/u1/preferences").await.unwrap();
        assert_eq!(reopened.load("users/u1/preferences").await.unwrap(), None);

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_prefix_listing_is_case_sensitive() {
        let path = temp_db("keys.db");
        let backend = SqliteBackend::open(&path).await.unwrap();

        for key in [
            "users/ab/preferences",
            "users/AB/preferences",
            "users/a_/preferences",
            "users/a%/preferences",
            "theme",
        ] {
            backend.store(key, "{}".into()).await.unwrap();
        }

        assert_eq!(backend.keys("users/ab/").await.unwrap(), ["users/ab/preferences"]);
        assert_eq!(backend.keys("users/a_").await.unwrap(), ["users/a_/preferences"]);
        assert_eq!(backend.keys("users/a%").await.unwrap(), ["users/a%/preferences"]);
        assert_eq!(backend.keys("users/").await.unwrap().len(), 4);
        assert_eq!(backend.keys("").await.unwrap().len(), 5);
        assert!(backend.keys("nobody/").await.unwrap().is_empty());

        let _ = std::fs::remove_file(&path);
    }
}
