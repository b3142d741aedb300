//! Runtime configuration.

use std::path::PathBuf;
use std::time::Duration;

use datagrid::pagination::DEFAULT_PAGE_SIZE;
use datagrid::preferences::DEFAULT_DEBOUNCE;
use log::LevelFilter;

use crate::model::{Locale, UnknownLocale};
use crate::paths;

pub const ENV_LOCALE: &str = "BACKOFFICE_LOCALE";
pub const ENV_PAGE_SIZE: &str = "BACKOFFICE_PAGE_SIZE";
pub const ENV_DEBOUNCE_MS: &str = "BACKOFFICE_DEBOUNCE_MS";
pub const ENV_DB: &str = "BACKOFFICE_DB";
pub const ENV_LOG_LEVEL: &str = "BACKOFFICE_LOG_LEVEL";
pub const ENV_LOG_FILE: &str = "BACKOFFICE_LOG_FILE";
pub const ENV_USER: &str = "BACKOFFICE_USER";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0}")]
    Locale(#[from] UnknownLocale),
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} is not a log level: '{value}'")]
    InvalidLogLevel { var: &'static str, value: String },
}

/// Back-office settings.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use backoffice::config::BackofficeConfig;
/// use backoffice::model::Locale;
///
/// let config = BackofficeConfig::new()
///     .with_locale(Locale::Es)
///     .with_preference_debounce(Duration::from_millis(500));
/// assert_eq!(config.locale, Locale::Es);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackofficeConfig {
    /// Display locale of the tables.
    ///
    /// Default: `en`
    pub locale: Locale,

    /// Default: 10
    pub page_size: usize,

    /// Delay before column preferences are written.
    ///
    /// Default: 1 second
    pub preference_debounce: Duration,

    /// Settings database. `None` keeps settings in memory.
    ///
    /// Default: `settings.db` in the platform data directory
    pub settings_db: Option<PathBuf>,

    /// Default: `latest.log` in the platform cache directory
    pub log_file: Option<PathBuf>,

    /// Default: `info`
    pub log_level: LevelFilter,

    /// Profile whose preferences are read and written. Empty disables
    /// preference writes.
    ///
    /// Default: `local`
    pub user_id: String,
}

impl Default for BackofficeConfig {
    fn default() -> Self {
        Self {
            locale: Locale::En,
            page_size: DEFAULT_PAGE_SIZE,
            preference_debounce: DEFAULT_DEBOUNCE,
            settings_db: paths::settings_db(),
            log_file: paths::log_file(),
            log_level: LevelFilter::Info,
            user_id: "local".to_string(),
        }
    }
}

impl BackofficeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_preference_debounce(mut self, delay: Duration) -> Self {
        self.preference_debounce = delay;
        self
    }

    pub fn with_settings_db(mut self, path: Option<PathBuf>) -> Self {
        self.settings_db = path;
        self
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_file = path;
        self
    }

    pub fn with_log_level(mut self, level: LevelFilter) -> Self {
        self.log_level = level;
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Defaults overridden by `BACKOFFICE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(ENV_LOCALE) {
            config.locale = value.parse()?;
        }
        if let Some(value) = get(ENV_PAGE_SIZE) {
            config.page_size = parse_number(ENV_PAGE_SIZE, &value)? as usize;
        }
        if let Some(value) = get(ENV_DEBOUNCE_MS) {
            config.preference_debounce = Duration::from_millis(parse_number(ENV_DEBOUNCE_MS, &value)?);
        }
        if let Some(value) = get(ENV_DB) {
            config.settings_db = match value.trim() {
                ":memory:" => None,
                path => Some(PathBuf::from(path)),
            };
        }
        if let Some(value) = get(ENV_LOG_FILE) {
            config.log_file = Some(PathBuf::from(value.trim()));
        }
        if let Some(value) = get(ENV_LOG_LEVEL) {
            config.log_level = value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidLogLevel {
                    var: ENV_LOG_LEVEL,
                    value: value.clone(),
                })?;
        }
        if let Some(value) = lookup(ENV_USER) {
            config.user_id = value.trim().to_string();
        }

        Ok(config)
    }
}

fn parse_number(var: &'static str, value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            var,
            value: value.to_string(),
        })
}
