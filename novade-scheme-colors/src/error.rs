//! Error handling for the NovaDE scheme-colors crate.
//!
//! This module provides the error types used throughout the crate. They are
//! defined with the `thiserror` crate for ergonomic error definition and
//! handling.
//!
//! The main error type is [`SchemeError`], which encapsulates more specific
//! errors like [`ConfigError`] and [`LoggingError`]. Color parsing errors live
//! next to the color type in [`crate::color::ColorParseError`].
//!
//! # Examples
//!
//! ```rust,ignore
//! use novade_scheme_colors::error::SchemeError;
//!
//! fn resolve_or_fail(name: &str) -> Result<(), SchemeError> {
//!     if name.is_empty() {
//!         return Err(SchemeError::InvalidInput("empty scheme name".to_string()));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the scheme-colors crate.
#[derive(Debug, Error)]
pub enum SchemeError {
    /// Errors related to reading, parsing or validating configuration files,
    /// both color-scheme files and this crate's own settings.
    #[error("Configuration Error: {0}")]
    Config(#[from] ConfigError),

    /// Errors that occur while setting up the logging system.
    #[error("Logging Error: {0}")]
    Logging(#[from] LoggingError),

    /// General I/O errors not covered by other specific variants.
    #[error("I/O Error: {0}")]
    Io(#[from] io::Error),

    /// The file watcher could not be created or could not attach to a path.
    #[error("Failed to watch {path:?}: {source}")]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },

    /// Errors due to invalid input provided to a function or method.
    #[error("Invalid Input: {0}")]
    InvalidInput(String),

    /// Catch-all for unexpected internal errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// Error type for configuration-related operations.
///
/// Typically wrapped by [`SchemeError::Config`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An error occurred while attempting to read a configuration file.
    #[error("Failed to read configuration file from {path:?}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The crate settings file is not valid TOML or does not match the schema.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid after successful parsing.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),

    /// A required base directory (e.g., XDG config/data home) could not be determined.
    #[error("Could not determine base directory for {dir_type}")]
    DirectoryUnavailable { dir_type: String },
}

/// Error type for logging-related operations.
#[derive(Error, Debug)]
pub enum LoggingError {
    /// Failed to initialize the logging system, e.g. a global subscriber is already set.
    #[error("Failed to initialize logging: {0}")]
    InitializationError(String),

    /// Failed to set or parse a log filter.
    #[error("Failed to set log filter: {0}")]
    FilterError(String),

    /// An I/O error occurred during logging, such as failing to create a log directory.
    #[error("Logging I/O error: {0}")]
    IoError(#[from] io::Error),
}
