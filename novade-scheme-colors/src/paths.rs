//! Resource and configuration path resolution.
//!
//! Scheme files live on the XDG data search path (`color-schemes/*.colors`)
//! and the active scheme name is read from the user configuration directory.
//! The [`ResourceLocator`] trait captures exactly those two lookups so the host
//! application can inject its own resolver; [`XdgLocator`] is the default
//! implementation following the XDG Base Directory Specification, and
//! [`SearchPaths`] is a fixed list of directories.
//!
//! [`get_app_config_dir()`] resolves NovaDE's own configuration directory,
//! where this crate's settings file lives.

use crate::error::{ConfigError, SchemeError};
use directories_next::{BaseDirs, ProjectDirs};
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "NovaDE";
const APPLICATION: &str = "NovaDE";

const DEFAULT_XDG_DATA_DIRS: &str = "/usr/local/share:/usr/share";

/// Resolves logical resource names and the user configuration directory.
pub trait ResourceLocator: Send + Sync {
    /// Returns the first existing file `<data dir>/<relative>` in search order.
    fn standard_path(&self, relative: &str) -> Option<PathBuf>;

    /// Returns the active user configuration directory (e.g. `~/.config`).
    fn config_dir(&self) -> Option<PathBuf>;
}

/// A fixed set of search directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPaths {
    /// User configuration directory, where `kdeglobals` is looked up.
    pub config_dir: Option<PathBuf>,
    /// Data directories in priority order.
    pub data_dirs: Vec<PathBuf>,
}

impl SearchPaths {
    /// Creates search paths from an explicit config dir and data dirs.
    pub fn new(config_dir: Option<PathBuf>, data_dirs: Vec<PathBuf>) -> Self {
        SearchPaths { config_dir, data_dirs }
    }
}

impl ResourceLocator for SearchPaths {
    fn standard_path(&self, relative: &str) -> Option<PathBuf> {
        first_existing(&self.data_dirs, relative)
    }

    fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir.clone()
    }
}

/// Locator following the XDG Base Directory Specification.
///
/// Data search order is `$XDG_DATA_HOME`, then any extra directories, then each
/// entry of `$XDG_DATA_DIRS` (default `/usr/local/share:/usr/share`).
/// Directories are resolved on every lookup so environment changes are honored.
#[derive(Debug, Clone, Default)]
pub struct XdgLocator {
    extra_data_dirs: Vec<PathBuf>,
}

impl XdgLocator {
    /// Creates a locator using only the XDG directories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a locator that also searches `extra_data_dirs` after the user data dir.
    pub fn with_extra_data_dirs(extra_data_dirs: Vec<PathBuf>) -> Self {
        XdgLocator { extra_data_dirs }
    }

    /// The full data search path in priority order.
    pub fn data_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if let Ok(data_home) = get_data_base_dir() {
            dirs.push(data_home);
        }
        dirs.extend(self.extra_data_dirs.iter().cloned());

        let system_dirs = env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_XDG_DATA_DIRS.to_string());
        dirs.extend(
            system_dirs
                .split(':')
                .filter(|d| !d.is_empty())
                .map(PathBuf::from)
                // Relative entries are invalid per the XDG spec.
                .filter(|d| d.is_absolute()),
        );

        let mut seen = HashSet::new();
        dirs.retain(|dir| seen.insert(dir.clone()));
        dirs
    }
}

impl ResourceLocator for XdgLocator {
    fn standard_path(&self, relative: &str) -> Option<PathBuf> {
        first_existing(&self.data_dirs(), relative)
    }

    fn config_dir(&self) -> Option<PathBuf> {
        get_config_base_dir().ok()
    }
}

fn first_existing(dirs: &[PathBuf], relative: &str) -> Option<PathBuf> {
    let relative = Path::new(relative);
    let found = dirs.iter().map(|dir| dir.join(relative)).find(|candidate| candidate.is_file());
    debug!("Resolved {:?} to {:?}", relative, found);
    found
}

/// Returns the base directory for user-specific configuration files
/// (`$XDG_CONFIG_HOME`, e.g. `~/.config`).
///
/// # Errors
/// Returns [`ConfigError::DirectoryUnavailable`] if no home directory can be determined.
pub fn get_config_base_dir() -> Result<PathBuf, SchemeError> {
    match env::var("XDG_CONFIG_HOME") {
        Ok(dir) if Path::new(&dir).is_absolute() => return Ok(PathBuf::from(dir)),
        _ => {}
    }
    BaseDirs::new()
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            SchemeError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "Config Base".to_string(),
            })
        })
}

/// Returns the base directory for user-specific data files
/// (`$XDG_DATA_HOME`, e.g. `~/.local/share`).
///
/// # Errors
/// Returns [`ConfigError::DirectoryUnavailable`] if no home directory can be determined.
pub fn get_data_base_dir() -> Result<PathBuf, SchemeError> {
    match env::var("XDG_DATA_HOME") {
        Ok(dir) if Path::new(&dir).is_absolute() => return Ok(PathBuf::from(dir)),
        _ => {}
    }
    BaseDirs::new()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            SchemeError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "Data Base".to_string(),
            })
        })
}

/// Returns the application-specific configuration directory for NovaDE
/// (e.g. `~/.config/NovaDE/NovaDE` on Linux).
///
/// # Errors
/// Returns [`ConfigError::DirectoryUnavailable`] if the directory cannot be determined.
pub fn get_app_config_dir() -> Result<PathBuf, SchemeError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| {
            SchemeError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "App Config".to_string(),
            })
        })
}

/// Returns the application-specific state directory for NovaDE
/// (e.g. `~/.local/state/NovaDE/NovaDE` on Linux). Relative log file paths resolve here.
///
/// # Errors
/// Returns [`ConfigError::DirectoryUnavailable`] if no home directory can be determined.
pub fn get_app_state_dir() -> Result<PathBuf, SchemeError> {
    BaseDirs::new()
        .map(|dirs| {
            #[cfg(target_os = "linux")]
            {
                match env::var("XDG_STATE_HOME") {
                    Ok(state_home) if !state_home.is_empty() => PathBuf::from(state_home),
                    _ => dirs.home_dir().join(".local/state"),
                }
            }
            #[cfg(not(target_os = "linux"))]
            {
                dirs.data_local_dir().to_path_buf()
            }
        })
        .map(|base| base.join(ORGANIZATION).join(APPLICATION))
        .ok_or_else(|| {
            SchemeError::Config(ConfigError::DirectoryUnavailable {
                dir_type: "App State".to_string(),
            })
        })
}
