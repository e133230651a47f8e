//! Reader for KDE-style INI configuration files.
//!
//! Color schemes (`*.colors`) and `kdeglobals` use the KConfig text format:
//!
//! ```text
//! # comment
//! [General]
//! Name=Breeze Dark
//! Name[de]=Breeze Dunkel
//!
//! [Colors:Window]
//! BackgroundNormal=49,54,59
//! ```
//!
//! Only reading is supported. Parsing is lenient in the same way the desktop
//! toolkit is: malformed lines are skipped, repeated groups merge and a
//! repeated key keeps its last value.

use crate::color::Color;
use crate::error::ConfigError;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the group holding entries that appear before any group header.
pub const DEFAULT_GROUP: &str = "<default>";

/// A parsed KConfig file: a set of named groups of string entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KConfig {
    groups: HashMap<String, HashMap<String, String>>,
    /// Group names in first-seen order.
    order: Vec<String>,
}

impl KConfig {
    /// An empty config, as produced for a file that does not exist.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parses KConfig text.
    pub fn parse(content: &str) -> Self {
        let mut config = KConfig::default();
        let mut current = DEFAULT_GROUP.to_string();

        for (line_no, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if line.starts_with('[') {
                match parse_group_header(line) {
                    Some(name) => {
                        config.ensure_group(&name);
                        current = name;
                    }
                    None => debug!("Skipping malformed group header on line {}: {:?}", line_no + 1, raw_line),
                }
                continue;
            }

            let Some((raw_key, raw_value)) = line.split_once('=') else {
                debug!("Skipping line {} without '=': {:?}", line_no + 1, raw_line);
                continue;
            };
            let key = strip_option_markers(raw_key.trim());
            if key.is_empty() {
                debug!("Skipping entry with empty key on line {}", line_no + 1);
                continue;
            }

            let value = unescape(raw_value.trim());
            config.ensure_group(&current);
            if let Some(group) = config.groups.get_mut(&current) {
                group.insert(key.to_string(), value);
            }
        }

        config
    }

    /// Reads and parses the file at `path`.
    ///
    /// Bytes that are not valid UTF-8 are replaced with U+FFFD, so a stray
    /// legacy-encoded entry does not hide the rest of the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let bytes = fs::read(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        let content = String::from_utf8_lossy(&bytes);
        if matches!(content, Cow::Owned(_)) {
            debug!("{:?} is not valid UTF-8, invalid bytes replaced", path);
        }
        Ok(Self::parse(&content))
    }

    /// Reads the file at `path`, falling back to an empty config when it is
    /// missing or unreadable.
    pub fn open_or_empty(path: &Path) -> Self {
        match Self::open(path) {
            Ok(config) => config,
            Err(ConfigError::ReadError { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file {:?} does not exist, using empty config", path);
                Self::empty()
            }
            Err(e) => {
                warn!("Using empty config for {:?}: {}", path, e);
                Self::empty()
            }
        }
    }

    /// Returns a read-only view of the group `name`. A missing group yields an empty view.
    pub fn group<'a>(&'a self, name: &'a str) -> ConfigGroup<'a> {
        ConfigGroup {
            name,
            entries: self.groups.get(name),
        }
    }

    /// Returns `true` if a header for `name` appeared in the file.
    pub fn has_group(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    /// Group names in the order they first appeared.
    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    fn ensure_group(&mut self, name: &str) {
        if !self.groups.contains_key(name) {
            self.groups.insert(name.to_string(), HashMap::new());
            self.order.push(name.to_string());
        }
    }
}

/// Borrowed view of a single group.
#[derive(Debug, Clone, Copy)]
pub struct ConfigGroup<'a> {
    name: &'a str,
    entries: Option<&'a HashMap<String, String>>,
}

impl<'a> ConfigGroup<'a> {
    /// The group name this view was requested for.
    pub fn name(&self) -> &str {
        self.name
    }

    /// `true` if the group does not exist or has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.map_or(true, HashMap::is_empty)
    }

    /// Raw value of `key`.
    pub fn read_entry(&self, key: &str) -> Option<&'a str> {
        self.entries.and_then(|e| e.get(key)).map(String::as_str)
    }

    /// Value of `key`, or `default` when absent.
    pub fn read_entry_or(&self, key: &str, default: &str) -> String {
        self.read_entry(key).unwrap_or(default).to_string()
    }

    /// `key` parsed as a color. Missing or unparsable values yield `None`.
    pub fn read_color(&self, key: &str) -> Option<Color> {
        let raw = self.read_entry(key)?;
        match Color::from_kconfig(raw) {
            Ok(color) => Some(color),
            Err(e) => {
                debug!("Ignoring invalid color [{}] {}={:?}: {}", self.name, key, raw, e);
                None
            }
        }
    }

    /// All keys in this group, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> {
        self.entries.into_iter().flat_map(|e| e.keys().map(String::as_str))
    }
}

/// `[A]` → `A`, `[A][B]` → `A/B`. Returns `None` for unterminated or empty headers.
fn parse_group_header(line: &str) -> Option<String> {
    let mut parts = Vec::new();
    let mut rest = line;
    while let Some(stripped) = rest.strip_prefix('[') {
        let end = stripped.find(']')?;
        let part = &stripped[..end];
        // "[$i]" after a header marks the group immutable; it is not a subgroup.
        if !part.starts_with('$') {
            parts.push(part.to_string());
        }
        rest = stripped[end + 1..].trim_start();
    }
    if !rest.is_empty() || parts.is_empty() || parts.iter().any(String::is_empty) {
        return None;
    }
    Some(parts.join("/"))
}

/// Removes trailing `[$e]`-style option markers, keeping locale suffixes like `[de]`.
fn strip_option_markers(key: &str) -> &str {
    let mut key = key;
    while key.ends_with(']') {
        match key.rfind("[$") {
            Some(start) => key = key[..start].trim_end(),
            None => break,
        }
    }
    key
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('s') => out.push(' '),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BREEZE_SNIPPET: &str = r#"
# Breeze excerpt
[ColorEffects:Disabled]
Color=56,56,56

[Colors:Window]
BackgroundNormal=239,240,241
ForegroundNegative = 218,68,83
ForegroundNeutral=246,116,0

[General]
ColorScheme=Breeze
Name=Breeze
Name[de]=Breeze-Standard
shadeSortColumn=true

[WM]
activeBackground=71,80,87
activeForeground=252,252,252
"#;

    #[test]
    fn test_parse_groups_and_entries() {
        let config = KConfig::parse(BREEZE_SNIPPET);
        assert!(config.has_group("Colors:Window"));
        assert!(config.has_group("ColorEffects:Disabled"));
        assert!(!config.has_group("Colors:View"));

        let window = config.group("Colors:Window");
        assert_eq!(window.read_entry("BackgroundNormal"), Some("239,240,241"));
        assert_eq!(window.read_entry("ForegroundNegative"), Some("218,68,83"));
        assert_eq!(window.read_color("ForegroundNeutral"), Some(Color::rgb(246, 116, 0)));

        let names: Vec<&str> = config.group_names().collect();
        assert_eq!(names, vec!["ColorEffects:Disabled", "Colors:Window", "General", "WM"]);
    }

    #[test]
    fn test_locale_keys_do_not_shadow_plain_key() {
        let config = KConfig::parse(BREEZE_SNIPPET);
        let general = config.group("General");
        assert_eq!(general.read_entry("Name"), Some("Breeze"));
        assert_eq!(general.read_entry("Name[de]"), Some("Breeze-Standard"));
    }

    #[test]
    fn test_missing_group_and_key() {
        let config = KConfig::parse(BREEZE_SNIPPET);
        let missing = config.group("Colors:Tooltip");
        assert!(missing.is_empty());
        assert_eq!(missing.read_entry("BackgroundNormal"), None);
        assert_eq!(missing.read_color("BackgroundNormal"), None);
        assert_eq!(config.group("General").read_entry_or("Missing", "fallback"), "fallback");
    }

    #[test]
    fn test_invalid_color_reads_as_none() {
        let config = KConfig::parse("[Colors:Button]\nBackgroundNormal=not-a-color\nForegroundNormal=\n");
        let button = config.group("Colors:Button");
        assert_eq!(button.read_color("BackgroundNormal"), None);
        assert_eq!(button.read_color("ForegroundNormal"), None);
    }

    #[test]
    fn test_default_group_nested_groups_and_markers() {
        let text = "Version=2\n[Colors][Header]\nBackgroundNormal[$e]=1,2,3\n[General][$i]\nName=Locked\n";
        let config = KConfig::parse(text);
        assert_eq!(config.group(DEFAULT_GROUP).read_entry("Version"), Some("2"));
        assert_eq!(config.group("Colors/Header").read_color("BackgroundNormal"), Some(Color::rgb(1, 2, 3)));
        assert_eq!(config.group("General").read_entry("Name"), Some("Locked"));
    }

    #[test]
    fn test_repeated_groups_merge_and_last_value_wins() {
        let text = "[WM]\nactiveBackground=1,1,1\n[General]\nName=x\n[WM]\nactiveBackground=2,2,2\nactiveForeground=3,3,3\n";
        let config = KConfig::parse(text);
        let wm = config.group("WM");
        assert_eq!(wm.read_color("activeBackground"), Some(Color::rgb(2, 2, 2)));
        assert_eq!(wm.read_color("activeForeground"), Some(Color::rgb(3, 3, 3)));
        assert_eq!(config.group_names().count(), 2);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let text = "[Broken\njust text\n=novalue\n; semicolon comment\n[Ok]\nkey=value\n";
        let config = KConfig::parse(text);
        assert!(!config.has_group("Broken"));
        assert_eq!(config.group("Ok").read_entry("key"), Some("value"));
        assert_eq!(config.group(DEFAULT_GROUP).keys().count(), 0);
    }

    #[test]
    fn test_value_escapes() {
        let config = KConfig::parse("[General]\nName=\\sPadded\\tTab\\\\Slash\\q\n");
        assert_eq!(config.group("General").read_entry("Name"), Some(" Padded\tTab\\Slash\\q"));
    }

    #[test]
    fn test_open_and_open_or_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[General]\nName=From Disk").unwrap();
        let config = KConfig::open(file.path()).unwrap();
        assert_eq!(config.group("General").read_entry("Name"), Some("From Disk"));

        let missing = file.path().with_extension("does-not-exist");
        assert!(matches!(KConfig::open(&missing), Err(ConfigError::ReadError { .. })));
        assert_eq!(KConfig::open_or_empty(&missing), KConfig::empty());
    }

    #[test]
    fn test_open_tolerates_legacy_encoded_entries() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[General]\nName=Default\nName[fr]=D\xE9faut\n\n[WM]\nactiveBackground=1,2,3\n")
            .unwrap();

        let config = KConfig::open(file.path()).unwrap();
        assert_eq!(config.group("WM").read_color("activeBackground"), Some(Color::rgb(1, 2, 3)));
        assert_eq!(config.group("General").read_entry("Name"), Some("Default"));
        assert_eq!(config.group("General").read_entry("Name[fr]"), Some("D\u{FFFD}faut"));
    }
}
