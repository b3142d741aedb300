//! File logging for the binary.

use std::fs::{self, File};
use std::path::PathBuf;

use simplelog::{ConfigBuilder, WriteLogger};

use crate::config::BackofficeConfig;
use crate::paths;

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("no log file location available")]
    NoLogFile,
    #[error("cannot open log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(#[from] log::SetLoggerError),
}

/// Start logging to the configured file, archiving the previous log first.
///
/// Only records from this workspace's crates are written. Returns the path
/// of the new log.
pub fn init(config: &BackofficeConfig) -> Result<PathBuf, LoggingError> {
    let path = config.log_file.clone().ok_or(LoggingError::NoLogFile)?;
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)?;
    }
    paths::rotate_logs(&path);

    let file = File::create(&path)?;
    let logger_config = ConfigBuilder::new()
        .add_filter_allow_str("backoffice")
        .add_filter_allow_str("datagrid")
        .build();
    WriteLogger::init(config.log_level, logger_config, file)?;

    log::info!("logging at {} to {}", config.log_level, path.display());
    Ok(path)
}
