//! Settings for the scheme-colors crate.
//!
//! The settings live in `scheme-colors.toml` inside NovaDE's app config
//! directory and control logging, scheme file watching and extra search
//! paths for scheme files.
//!
//! - [`types`]: the deserialized structures ([`SchemeColorsConfig`] and its sections).
//! - [`defaults`]: default values used by `serde` for missing fields.
//! - [`loader`]: [`ConfigLoader`], which reads, parses and validates the file.
//!
//! ```rust,ignore
//! use novade_scheme_colors::config::ConfigLoader;
//!
//! let config = ConfigLoader::load()?;
//! novade_scheme_colors::logging::init_logging(&config.logging, false)?;
//! ```

pub mod defaults;
pub mod loader;
pub mod types;

pub use loader::{ConfigLoader, CONFIG_FILE_NAME};
pub use types::{LoggingConfig, PathsConfig, SchemeColorsConfig, WatcherConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let config = SchemeColorsConfig::default();
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.watcher.debounce(), Duration::from_millis(200));
        assert!(config.paths.extra_data_dirs.is_empty());
    }

    #[test]
    fn test_deserialize_partial_sections() {
        let config: SchemeColorsConfig = toml::from_str("[logging]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, "text");
        assert_eq!(config.watcher, WatcherConfig::default());
    }
}
