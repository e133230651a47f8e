//! # NovaDE Scheme Colors (`novade-scheme-colors`)
//!
//! Supplies the NovaDE panel with the semantic colors of a KDE-format color
//! scheme and keeps them current while the scheme file changes on disk.
//!
//! ## Overview
//!
//! - **Scheme resolution** ([`scheme`]): maps a scheme name, an absolute path
//!   or the special name `"kdeglobals"` to a `*.colors` file on the XDG data
//!   search path ([`paths`]).
//! - **Scheme files** ([`kconfig`]): a lenient reader for the KConfig INI format.
//! - **Palette extraction** ([`palette`]): 13 semantic colors read from either
//!   the window-manager or the Plasma-theme groups, or synthesized from a
//!   single seed [`Color`].
//! - **Live state** ([`scheme_colors`]): [`SchemeColors`] holds the current
//!   palette, watches the scheme file ([`watcher`]) and publishes changes on a
//!   `tokio::sync::broadcast` channel.
//! - **Ambient services**: errors ([`error`]), `tracing`-based logging
//!   ([`logging`]) and the `scheme-colors.toml` settings file ([`config`]).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use novade_scheme_colors::{ColorSource, ConfigLoader, SchemeColors, SchemeError, XdgLocator};
//!
//! fn main() -> Result<(), SchemeError> {
//!     let config = ConfigLoader::load()?;
//!     novade_scheme_colors::init_logging(&config.logging, false)?;
//!
//!     let locator = XdgLocator::with_extra_data_dirs(config.paths.extra_data_dirs.clone());
//!     let colors = SchemeColors::with_watcher_config("kdeglobals", ColorSource::PlasmaTheme, &locator, &config.watcher);
//!     tracing::info!("Panel background: {:?}", colors.background_color());
//!     Ok(())
//! }
//! ```

pub mod color;
pub mod config;
pub mod error;
pub mod kconfig;
pub mod logging;
pub mod palette;
pub mod paths;
pub mod scheme;
pub mod scheme_colors;
pub mod watcher;

pub use color::{Color, ColorParseError};
pub use config::{ConfigLoader, LoggingConfig, PathsConfig, SchemeColorsConfig, WatcherConfig};
pub use error::{ConfigError, LoggingError, SchemeError};
pub use kconfig::KConfig;
pub use logging::{init_logging, init_logging_with_console, init_minimal_logging, ConsoleTarget};
pub use palette::{ColorSource, SchemePalette};
pub use paths::{ResourceLocator, SearchPaths, XdgLocator};
pub use scheme::{possible_scheme_file, scheme_name, KDEGLOBALS};
pub use scheme_colors::{SchemeColors, SchemeColorsEvent};
pub use watcher::SchemeWatcher;
