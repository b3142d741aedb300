//! Admin back-office tables built on [`datagrid`].
//!
//! Maps raw product, user and recipe records into typed rows, declares the
//! column sets of each table, persists column preferences per user and
//! provides the cross-entity quick search.

pub mod columns;
pub mod config;
pub mod demo;
pub mod logging;
pub mod model;
pub mod paths;
pub mod profile;
pub mod render;
pub mod search;
pub mod settings;

pub use config::BackofficeConfig;
pub use profile::{ProfileStore, TablePreferenceSink};
pub use search::{Catalog, SearchResult, global_search};
pub use settings::SettingsProvider;
