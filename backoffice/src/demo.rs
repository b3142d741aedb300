//! The `backoffice` command: print the products table for a JSON export.

use std::path::{Path, PathBuf};

use clap::Parser;
use datagrid::Table;
use serde_json::Value;
use thiserror::Error;

use crate::columns::{product_columns, product_key};
use crate::config::BackofficeConfig;
use crate::model::{ProductRow, map_records_lossy};
use crate::profile::{PRODUCT_TABLE, ProfileStore, TablePreferenceSink};
use crate::render::render_text;
use crate::settings::{SettingsError, SettingsProvider, SqliteBackend};

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0} must contain a JSON array of product records")]
    NotAnArray(PathBuf),
    #[error(transparent)]
    Settings(#[from] SettingsError),
}

/// Print the products table of a JSON export.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "backoffice")]
#[command(about = "Render the back-office products table", long_about = None)]
#[command(version)]
pub struct DemoArgs {
    /// JSON array of raw product records
    #[arg(value_name = "PRODUCTS_JSON")]
    pub products: PathBuf,

    /// Global filter; several words are AND-combined
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    pub query: Vec<String>,
}

impl DemoArgs {
    /// The query words joined with spaces, if any were given.
    pub fn query_text(&self) -> Option<String> {
        (!self.query.is_empty()).then(|| self.query.join(" "))
    }
}

/// Read a JSON array of raw product records and map them into rows. Records
/// that fail to map are skipped.
pub async fn load_products(path: &Path) -> Result<Vec<ProductRow>, DemoError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| DemoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|source| DemoError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let Value::Array(records) = value else {
        return Err(DemoError::NotAnArray(path.to_path_buf()));
    };

    let rows = map_records_lossy(&records, ProductRow::from_record);
    log::info!("loaded {} of {} products from {}", rows.len(), records.len(), path.display());
    Ok(rows)
}

/// Settings stored in the configured database, or in memory when there is
/// none.
pub async fn open_settings(config: &BackofficeConfig) -> Result<SettingsProvider, DemoError> {
    Ok(match &config.settings_db {
        Some(path) => SettingsProvider::new(SqliteBackend::open(path).await?),
        None => SettingsProvider::in_memory(),
    })
}

/// Build the products table for the configured user, seeded with their saved
/// column preferences and persisting changes back to their profile.
pub async fn products_table(
    rows: Vec<ProductRow>,
    store: &ProfileStore,
    config: &BackofficeConfig,
) -> Table<ProductRow> {
    let initial = if config.user_id.is_empty() {
        None
    } else {
        match store.table_preferences(&config.user_id, PRODUCT_TABLE).await {
            Ok(prefs) => prefs,
            Err(e) => {
                log::warn!("ignoring saved product table preferences: {}", e);
                None
            }
        }
    };

    let locale = config.locale.as_str();
    Table::builder(product_columns(locale), product_key)
        .data(rows)
        .initial_preferences(initial.unwrap_or_default())
        .on_preferences_change(TablePreferenceSink::new(
            store.clone(),
            config.user_id.clone(),
            PRODUCT_TABLE,
        ))
        .preference_debounce(config.preference_debounce)
        .display_locale(locale)
        .page_size(config.page_size)
        .enable_row_selection(true)
        .build()
}

/// Load, filter and render. Returns the rendered text.
pub async fn run(args: &DemoArgs, config: &BackofficeConfig) -> Result<String, DemoError> {
    let rows = load_products(&args.products).await?;
    let settings = open_settings(config).await?;
    let store = ProfileStore::new(settings);

    let table = products_table(rows, &store, config).await;
    if let Some(query) = args.query_text() {
        table.set_global_filter(&query);
    }
    let text = render_text(&table.view());
    table.dispose();
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let err = DemoArgs::try_parse_from(["backoffice"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let parsed = DemoArgs::try_parse_from(["backoffice", "p.json"]).unwrap();
        assert_eq!(parsed.query_text(), None);

        let parsed = DemoArgs::try_parse_from(["backoffice", "p.json", "greek", "yog"]).unwrap();
        assert_eq!(parsed.products, PathBuf::from("p.json"));
        assert_eq!(parsed.query_text().as_deref(), Some("greek yog"));
    }

    #[test]
    fn test_query_may_start_with_a_dash() {
        let parsed = DemoArgs::try_parse_from(["backoffice", "p.json", "-", "bar"]).unwrap();
        assert_eq!(parsed.query_text().as_deref(), Some("- bar"));
    }
}
