//! Default configuration values for the scheme-colors settings.
//!
//! These functions are used by `serde`'s `default` attribute in the
//! configuration structures when a value is missing from the settings file.

use super::{LoggingConfig, PathsConfig, WatcherConfig};
use std::path::PathBuf;

pub(super) fn default_logging_config() -> LoggingConfig {
    LoggingConfig {
        level: default_log_level(),
        file_path: default_log_file_path(),
        format: default_log_format(),
    }
}

/// `"info"`.
pub(super) fn default_log_level() -> String {
    "info".to_string()
}

/// No log file by default.
pub(super) fn default_log_file_path() -> Option<PathBuf> {
    None
}

/// `"text"`.
pub(super) fn default_log_format() -> String {
    "text".to_string()
}

pub(super) fn default_watcher_config() -> WatcherConfig {
    WatcherConfig {
        enabled: default_watcher_enabled(),
        debounce_ms: default_debounce_ms(),
    }
}

pub(super) fn default_watcher_enabled() -> bool {
    true
}

/// Editors commonly emit several events per save; 200 ms folds them into one reload.
pub(super) fn default_debounce_ms() -> u64 {
    200
}

pub(super) fn default_paths_config() -> PathsConfig {
    PathsConfig {
        extra_data_dirs: Vec::new(),
    }
}
