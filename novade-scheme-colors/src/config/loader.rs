//! Loading and validation of `scheme-colors.toml`.
//!
//! [`ConfigLoader::load()`] reads the settings file from NovaDE's app config
//! directory (see [`crate::paths::get_app_config_dir`]). A missing or empty
//! file yields the defaults. The result is validated: log level and format are
//! normalized to lowercase, relative log file paths are resolved against the
//! app state directory, and extra data directories must be absolute.

use super::SchemeColorsConfig;
use crate::error::{ConfigError, SchemeError};
use crate::paths::{get_app_config_dir, get_app_state_dir};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::debug;

/// File name of the settings file inside the app config directory.
pub const CONFIG_FILE_NAME: &str = "scheme-colors.toml";

/// Upper bound for `watcher.debounce_ms`.
const MAX_DEBOUNCE_MS: u64 = 10_000;

/// Namespace for configuration loading.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads and validates the settings from the app config directory.
    ///
    /// # Errors
    ///
    /// Fails if the config directory cannot be determined, the file exists but
    /// cannot be read or parsed, or validation fails.
    pub fn load() -> Result<SchemeColorsConfig, SchemeError> {
        let path = get_app_config_dir()?.join(CONFIG_FILE_NAME);
        Self::load_from(&path)
    }

    /// Loads and validates the settings from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<SchemeColorsConfig, SchemeError> {
        let mut config = match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => SchemeColorsConfig::default(),
            Ok(content) => toml::from_str(&content).map_err(ConfigError::ParseError)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No settings file at {:?}, using defaults", path);
                SchemeColorsConfig::default()
            }
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source,
                }
                .into());
            }
        };

        Self::validate_config(&mut config)?;
        Ok(config)
    }

    /// Normalizes and checks a parsed configuration in place.
    pub fn validate_config(config: &mut SchemeColorsConfig) -> Result<(), SchemeError> {
        let level_lower = config.logging.level.to_lowercase();
        match level_lower.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => config.logging.level = level_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log level: '{}'. Must be one of trace, debug, info, warn, error.",
                    config.logging.level
                ))
                .into());
            }
        }

        let format_lower = config.logging.format.to_lowercase();
        match format_lower.as_str() {
            "text" | "json" => config.logging.format = format_lower,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "Invalid log format: '{}'. Must be one of text, json.",
                    config.logging.format
                ))
                .into());
            }
        }

        if let Some(file_path) = &config.logging.file_path {
            if !file_path.is_absolute() {
                config.logging.file_path = Some(get_app_state_dir()?.join(file_path));
            }
        }

        if config.watcher.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ConfigError::ValidationError(format!(
                "watcher.debounce_ms must be at most {}, got {}",
                MAX_DEBOUNCE_MS, config.watcher.debounce_ms
            ))
            .into());
        }

        if let Some(relative) = config.paths.extra_data_dirs.iter().find(|d| !d.is_absolute()) {
            return Err(ConfigError::ValidationError(format!(
                "paths.extra_data_dirs entries must be absolute, got {:?}",
                relative
            ))
            .into());
        }

        Ok(())
    }
}
