//! Per-user preference documents.
//!
//! Each user has one JSON document of UI preferences, stored under
//! `users/{id}/preferences`. Tables keep their column preferences under their
//! own key in that document (for example `productTable`), so writing one
//! table's preferences must leave the rest of the document alone.

use async_trait::async_trait;
use datagrid::{PreferenceError, PreferenceSink, Preferences};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::settings::{SettingsError, SettingsProvider};

/// Preference key of the products table.
pub const PRODUCT_TABLE: &str = "productTable";
pub const USER_TABLE: &str = "userTable";
pub const RECIPE_TABLE: &str = "recipeTable";

/// A user's preference document.
pub type PreferenceDocument = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
    #[error("invalid preference document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("profile has no user id")]
    MissingUser,
}

/// Reads and merges per-user preference documents.
#[derive(Clone)]
pub struct ProfileStore {
    settings: SettingsProvider,
}

impl ProfileStore {
    pub fn new(settings: SettingsProvider) -> Self {
        Self { settings }
    }

    fn key(user_id: &str) -> String {
        format!("users/{}/preferences", user_id)
    }

    /// The whole document; empty if the user has none yet.
    pub async fn document(&self, user_id: &str) -> Result<PreferenceDocument, ProfileError> {
        if user_id.is_empty() {
            return Err(ProfileError::MissingUser);
        }
        Ok(self
            .settings
            .get::<PreferenceDocument>(&Self::key(user_id))
            .await?
            .unwrap_or_default())
    }

    pub async fn replace_document(
        &self,
        user_id: &str,
        document: &PreferenceDocument,
    ) -> Result<(), ProfileError> {
        if user_id.is_empty() {
            return Err(ProfileError::MissingUser);
        }
        self.settings.set(&Self::key(user_id), document).await?;
        Ok(())
    }

    /// Column preferences saved for one table, used to seed it.
    pub async fn table_preferences(
        &self,
        user_id: &str,
        table_key: &str,
    ) -> Result<Option<Preferences>, ProfileError> {
        let mut document = self.document(user_id).await?;
        match document.remove(table_key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Write one table's column preferences, keeping every other entry of the
    /// document.
    pub async fn update_table_preferences(
        &self,
        user_id: &str,
        table_key: &str,
        preferences: &Preferences,
    ) -> Result<(), ProfileError> {
        let mut document = self.document(user_id).await?;
        document.insert(table_key.to_string(), serde_json::to_value(preferences)?);
        self.replace_document(user_id, &document).await?;
        log::debug!("saved {} preferences for user {}", table_key, user_id);
        Ok(())
    }

    /// Ids of users that have a preference document.
    pub async fn users(&self) -> Result<Vec<String>, ProfileError> {
        Ok(self
            .settings
            .keys_with_prefix("users/")
            .await?
            .into_iter()
            .filter_map(|key| {
                key.strip_prefix("users/")
                    .and_then(|rest| rest.strip_suffix("/preferences"))
                    .map(str::to_string)
            })
            .collect())
    }
}

/// Writes a table's column preferences into a user's profile.
///
/// A profile without an id (not signed in, or not loaded yet) turns every
/// write into a no-op.
#[derive(Clone)]
pub struct TablePreferenceSink {
    store: ProfileStore,
    user_id: String,
    table_key: String,
}

impl TablePreferenceSink {
    pub fn new(store: ProfileStore, user_id: impl Into<String>, table_key: impl Into<String>) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            table_key: table_key.into(),
        }
    }
}

#[async_trait]
impl PreferenceSink for TablePreferenceSink {
    async fn save(&self, preferences: Preferences) -> Result<(), PreferenceError> {
        if self.user_id.is_empty() {
            log::debug!("no user id; {} preferences not saved", self.table_key);
            return Ok(());
        }
        self.store
            .update_table_preferences(&self.user_id, &self.table_key, &preferences)
            .await
            .map_err(PreferenceError::sink)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn prefs(hidden: &str, width: (&str, u32)) -> Preferences {
        let mut p = Preferences::default();
        p.column_visibility.insert(hidden.into(), false);
        p.column_sizing.insert(width.0.into(), width.1);
        p
    }

    #[tokio::test]
    async fn test_update_merges_into_document() {
        let store = ProfileStore::new(SettingsProvider::in_memory());
        let mut document = PreferenceDocument::new();
        document.insert("theme".into(), json!("dark"));
        store.replace_document("u1", &document).await.unwrap();

        let p = prefs("tags", ("name", 240));
        store.update_table_preferences("u1", PRODUCT_TABLE, &p).await.unwrap();
        store
            .update_table_preferences("u1", USER_TABLE, &prefs("goal", ("user", 300)))
            .await
            .unwrap();

        let document = store.document("u1").await.unwrap();
        assert_eq!(document.get("theme"), Some(&json!("dark")));
        assert_eq!(
            document.get(PRODUCT_TABLE),
            Some(&json!({
                "columnVisibility": { "tags": false },
                "columnSizing": { "name": 240 }
            }))
        );
        assert_eq!(store.table_preferences("u1", PRODUCT_TABLE).await.unwrap(), Some(p));
        assert_eq!(store.users().await.unwrap(), ["u1"]);
    }

    #[tokio::test]
    async fn test_missing_table_entry_is_none() {
        let store = ProfileStore::new(SettingsProvider::in_memory());
        assert_eq!(store.table_preferences("u1", RECIPE_TABLE).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_sink_without_user_is_a_no_op() {
        let settings = SettingsProvider::in_memory();
        let store = ProfileStore::new(settings.clone());
        let sink = TablePreferenceSink::new(store, "", PRODUCT_TABLE);

        sink.save(prefs("kcal", ("kcal", 90))).await.unwrap();
        assert!(settings.keys_with_prefix("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_sink_writes_profile() {
        let store = ProfileStore::new(SettingsProvider::in_memory());
        let sink = TablePreferenceSink::new(store.clone(), "u9", PRODUCT_TABLE);

        let p = prefs("fat", ("brand", 180));
        sink.save(p.clone()).await.unwrap();
        assert_eq!(store.table_preferences("u9", PRODUCT_TABLE).await.unwrap(), Some(p));
    }
}
