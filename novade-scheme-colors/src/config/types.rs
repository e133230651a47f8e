//! Configuration data structures for the scheme-colors settings file.
//!
//! These structs are populated by deserializing `scheme-colors.toml` and
//! apply default values for missing fields via [`super::defaults`]. Unknown
//! fields are rejected with `#[serde(deny_unknown_fields)]`.

use super::defaults;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration settings for the logging subsystem.
///
/// # Examples
///
/// ```
/// use novade_scheme_colors::config::LoggingConfig;
///
/// let log_config: LoggingConfig = toml::from_str("level = \"debug\"").unwrap();
/// assert_eq!(log_config.level, "debug");
/// assert_eq!(log_config.format, "text");
/// assert_eq!(log_config.file_path, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum log level: "trace", "debug", "info", "warn" or "error" (case-insensitive).
    #[serde(default = "defaults::default_log_level")]
    pub level: String,
    /// Optional log file. Relative paths are resolved against the app state directory.
    #[serde(default = "defaults::default_log_file_path")]
    pub file_path: Option<PathBuf>,
    /// "text" or "json".
    #[serde(default = "defaults::default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        defaults::default_logging_config()
    }
}

/// Settings for watching the active scheme file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WatcherConfig {
    /// Reload colors automatically when the scheme file changes.
    #[serde(default = "defaults::default_watcher_enabled")]
    pub enabled: bool,
    /// Quiet period after the last change before colors are reloaded.
    #[serde(default = "defaults::default_debounce_ms")]
    pub debounce_ms: u64,
}

impl WatcherConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        defaults::default_watcher_config()
    }
}

/// Additional search locations for scheme files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Data directories searched after `$XDG_DATA_HOME` and before `$XDG_DATA_DIRS`.
    #[serde(default)]
    pub extra_data_dirs: Vec<PathBuf>,
}

/// Root of `scheme-colors.toml`.
///
/// ```
/// use novade_scheme_colors::config::SchemeColorsConfig;
///
/// let config: SchemeColorsConfig = toml::from_str(r#"
/// [watcher]
/// debounce_ms = 50
/// "#).unwrap();
/// assert!(config.watcher.enabled);
/// assert_eq!(config.watcher.debounce_ms, 50);
/// assert_eq!(config.logging.level, "info");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemeColorsConfig {
    #[serde(default = "defaults::default_logging_config")]
    pub logging: LoggingConfig,
    #[serde(default = "defaults::default_watcher_config")]
    pub watcher: WatcherConfig,
    #[serde(default = "defaults::default_paths_config")]
    pub paths: PathsConfig,
}
