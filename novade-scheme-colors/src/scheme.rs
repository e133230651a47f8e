//! Mapping scheme names to `.colors` files and back.

use crate::kconfig::KConfig;
use crate::paths::ResourceLocator;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Scheme name that means "whatever the user's global settings select".
pub const KDEGLOBALS: &str = "kdeglobals";

const SCHEMES_DIR: &str = "color-schemes";
const SCHEME_EXTENSION: &str = ".colors";

/// Resolves `scheme` to an existing color-scheme file.
///
/// `scheme` may be an absolute path to a `*colors` file, the special name
/// [`KDEGLOBALS`], or a scheme name such as `"Breeze Dark"`. Names are looked
/// up as `color-schemes/<name>.colors` on the data search path; if that fails,
/// the lookup is retried with whitespace and dashes removed (`"BreezeDark"`).
pub fn possible_scheme_file(scheme: &str, locator: &dyn ResourceLocator) -> Option<PathBuf> {
    if is_existing_scheme_path(Path::new(scheme)) {
        return Some(PathBuf::from(scheme));
    }

    let mut scheme = scheme.to_string();
    if scheme == KDEGLOBALS {
        if let Some(settings_file) = locator.config_dir().map(|dir| dir.join(KDEGLOBALS)) {
            if settings_file.exists() {
                let settings = KConfig::open_or_empty(&settings_file);
                scheme = settings.group("General").read_entry_or("ColorScheme", "");
                debug!("{:?} selects color scheme {:?}", settings_file, scheme);
            }
        }
    }

    let found = locator
        .standard_path(&scheme_relative_path(&scheme))
        .or_else(|| locator.standard_path(&scheme_relative_path(&simplified_scheme_name(&scheme))));

    match found {
        Some(path) if path.exists() => Some(path),
        _ => {
            debug!("No color scheme file found for {:?}", scheme);
            None
        }
    }
}

/// Display name of the scheme stored in `file`.
///
/// Returns `""` unless `file` is an absolute, existing path ending in
/// `colors`. Otherwise returns `[General] Name`, defaulting to the file name
/// without its `.colors` extension.
pub fn scheme_name(file: &Path) -> String {
    if !is_existing_scheme_path(file) {
        return String::new();
    }

    let file_name = file.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let fallback = file_name.strip_suffix(SCHEME_EXTENSION).unwrap_or(&file_name);

    KConfig::open_or_empty(file).group("General").read_entry_or("Name", fallback)
}

fn is_existing_scheme_path(path: &Path) -> bool {
    path.is_absolute() && path.to_string_lossy().ends_with("colors") && path.exists()
}

fn scheme_relative_path(scheme: &str) -> String {
    format!("{}/{}{}", SCHEMES_DIR, scheme, SCHEME_EXTENSION)
}

/// `" Breeze  Dark-High "` → `"BreezeDarkHigh"`.
fn simplified_scheme_name(scheme: &str) -> String {
    scheme.split_whitespace().collect::<String>().replace('-', "")
}
