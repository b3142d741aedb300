//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;

const QUALIFIER: &str = "app";
const ORGANIZATION: &str = "backoffice";
const APPLICATION: &str = "backoffice";

const LATEST_LOG: &str = "latest.log";

/// Archived logs kept by [`rotate_logs`].
pub const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Persistent application data.
///
/// - Linux: `$XDG_DATA_HOME/backoffice` or `~/.local/share/backoffice`
/// - macOS: `~/Library/Application Support/app.backoffice.backoffice`
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Regenerable data such as logs.
///
/// - Linux: `$XDG_CACHE_HOME/backoffice` or `~/.cache/backoffice`
/// - macOS: `~/Library/Caches/app.backoffice.backoffice`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Settings database holding user preference documents.
pub fn settings_db() -> Option<PathBuf> {
    data_dir().map(|dir| dir.join("settings.db"))
}

pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(LATEST_LOG))
}

/// Archive `log_file` under a timestamped name and prune old archives in
/// the same directory. Call before opening a new log.
pub fn rotate_logs(log_file: &Path) {
    let Some(dir) = log_file.parent() else { return };

    if log_file.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S%.3f");
        let archived = dir.join(format!("{}.log", timestamp));
        if let Err(e) = fs::rename(log_file, &archived) {
            log::warn!("could not archive {}: {}", log_file.display(), e);
        }
    }

    prune_old_logs(dir, log_file, MAX_OLD_LOGS);
}

/// Remove the oldest `.log` files in `dir` (other than `keep`) beyond `max`.
fn prune_old_logs(dir: &Path, keep: &Path, max: usize) {
    let Ok(entries) = fs::read_dir(dir) else { return };

    let mut logs: Vec<_> = entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let path = e.path();
            path.extension().is_some_and(|ext| ext == "log") && path != keep
        })
        .collect();

    if logs.len() <= max {
        return;
    }

    logs.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    for entry in logs.iter().take(logs.len() - max) {
        let _ = fs::remove_file(entry.path());
    }
}
