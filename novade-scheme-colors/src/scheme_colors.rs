//! Observable color state for the panel.
//!
//! [`SchemeColors`] owns the palette of one color scheme and republishes it
//! through a `tokio::sync::broadcast` channel whenever it is (re)loaded. When
//! created from a scheme file it watches that file and reloads on change. A
//! missing or unreadable file never clears the palette: the last successful
//! read wins.

use crate::color::Color;
use crate::config::WatcherConfig;
use crate::kconfig::KConfig;
use crate::palette::{ColorSource, SchemePalette};
use crate::paths::ResourceLocator;
use crate::scheme::{possible_scheme_file, scheme_name};
use crate::watcher::SchemeWatcher;
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Capacity of the change-notification channel.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Change notifications published by [`SchemeColors`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemeColorsEvent {
    /// The palette was (re)loaded. Sent on every successful read, even if no color changed.
    ColorsChanged(SchemePalette),
    /// The scheme file path changed.
    SchemeFileChanged(Option<PathBuf>),
}

#[derive(Debug, Default)]
struct ColorState {
    scheme_name: String,
    scheme_file: Option<PathBuf>,
    palette: SchemePalette,
}

struct Inner {
    source: ColorSource,
    watcher_config: WatcherConfig,
    state: RwLock<ColorState>,
    watcher: Mutex<Option<SchemeWatcher>>,
    events: broadcast::Sender<SchemeColorsEvent>,
}

/// Shared handle to the semantic colors of a scheme.
///
/// Cloning is cheap; all clones observe the same state. Watching stops when
/// the last clone is dropped.
///
/// ```rust,ignore
/// use novade_scheme_colors::{ColorSource, SchemeColors, XdgLocator};
///
/// let colors = SchemeColors::new("kdeglobals", ColorSource::PlasmaTheme, &XdgLocator::new());
/// let mut changes = colors.subscribe();
/// println!("background: {:?}", colors.background_color());
/// ```
#[derive(Clone)]
pub struct SchemeColors {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for SchemeColors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.read();
        f.debug_struct("SchemeColors")
            .field("scheme_name", &state.scheme_name)
            .field("scheme_file", &state.scheme_file)
            .field("source", &self.inner.source)
            .field("palette", &state.palette)
            .finish()
    }
}

impl SchemeColors {
    /// Loads the scheme `scheme` and watches its file with default watcher settings.
    ///
    /// See [`SchemeColors::with_watcher_config`].
    pub fn new(scheme: &str, source: ColorSource, locator: &dyn ResourceLocator) -> Self {
        Self::with_watcher_config(scheme, source, locator, &WatcherConfig::default())
    }

    /// Loads the scheme `scheme` (a name, `"kdeglobals"`, or an absolute path).
    ///
    /// If the scheme resolves to a file, the file and scheme name are recorded
    /// and, when `watcher_config.enabled`, the file is watched for changes. If
    /// it does not resolve, the palette stays empty. Failing to start the
    /// watcher is logged and otherwise ignored.
    pub fn with_watcher_config(
        scheme: &str,
        source: ColorSource,
        locator: &dyn ResourceLocator,
        watcher_config: &WatcherConfig,
    ) -> Self {
        let colors = Self::empty(source, watcher_config.clone());

        match possible_scheme_file(scheme, locator) {
            Some(file) => {
                colors.inner.state.write().scheme_name = scheme_name(&file);
                colors.set_scheme_file(Some(file));
            }
            None => warn!("Color scheme {:?} could not be resolved to a file", scheme),
        }

        colors.update_scheme();
        colors
    }

    /// Synthesizes colors around a single `seed` color.
    ///
    /// Button colors are taken from the `fallback` scheme when it resolves;
    /// otherwise they stay undefined. The result has no scheme file and an
    /// empty scheme name, and is never reloaded.
    pub fn from_seed(
        seed: Color,
        fallback: Option<&str>,
        source: ColorSource,
        locator: &dyn ResourceLocator,
    ) -> Self {
        let fallback_config = match fallback.and_then(|name| possible_scheme_file(name, locator)) {
            Some(file) => KConfig::open_or_empty(&file),
            None => {
                debug!("No fallback scheme for seed {}, button colors stay undefined", seed);
                KConfig::empty()
            }
        };

        let colors = Self::empty(
            source,
            WatcherConfig {
                enabled: false,
                ..WatcherConfig::default()
            },
        );
        let palette = SchemePalette::from_seed(seed, &fallback_config);
        colors.inner.state.write().palette = palette;
        colors.emit(SchemeColorsEvent::ColorsChanged(palette));
        colors
    }

    fn empty(source: ColorSource, watcher_config: WatcherConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        SchemeColors {
            inner: Arc::new(Inner {
                source,
                watcher_config,
                state: RwLock::new(ColorState::default()),
                watcher: Mutex::new(None),
                events,
            }),
        }
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<SchemeColorsEvent> {
        self.inner.events.subscribe()
    }

    /// Rereads the scheme file and publishes the new palette.
    ///
    /// Returns `true` if the palette was replaced. Without a scheme file, or
    /// if the file is missing or unreadable, the current colors are kept and
    /// `false` is returned.
    pub fn update_scheme(&self) -> bool {
        let Some(file) = self.scheme_file() else {
            return false;
        };
        if !file.exists() {
            debug!("Scheme file {:?} does not exist, keeping current colors", file);
            return false;
        }

        let config = match KConfig::open(&file) {
            Ok(config) => config,
            Err(e) => {
                warn!("Keeping current colors: {}", e);
                return false;
            }
        };

        let palette = SchemePalette::from_config(&config, self.inner.source);
        self.inner.state.write().palette = palette;
        info!(
            "Loaded {} of 13 colors from {:?} ({})",
            palette.defined_count(),
            file,
            self.inner.source
        );
        self.emit(SchemeColorsEvent::ColorsChanged(palette));
        true
    }

    /// Replaces the scheme file path.
    ///
    /// Does nothing if `file` equals the current path. Otherwise publishes
    /// [`SchemeColorsEvent::SchemeFileChanged`] and, when watching is enabled,
    /// moves the watcher to the new file. A file that does not exist yet is
    /// still watched as long as its directory exists. Colors are not reread;
    /// call [`SchemeColors::update_scheme`] for that.
    pub fn set_scheme_file(&self, file: Option<PathBuf>) {
        // The watcher must follow `scheme_file`; both change under this lock.
        let mut slot = self.inner.watcher.lock();
        {
            let mut state = self.inner.state.write();
            if state.scheme_file == file {
                return;
            }
            state.scheme_file = file.clone();
        }
        debug!("Scheme file set to {:?}", file);
        self.retarget_watcher(&mut slot, file.as_deref());
        self.emit(SchemeColorsEvent::SchemeFileChanged(file));
    }

    fn retarget_watcher(&self, slot: &mut Option<SchemeWatcher>, file: Option<&Path>) {
        if !self.inner.watcher_config.enabled {
            return;
        }
        // Stop the old watcher before starting a new one.
        *slot = None;

        let Some(file) = file else {
            return;
        };
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let result = SchemeWatcher::watch(file, self.inner.watcher_config.debounce(), move |changed| {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let colors = SchemeColors { inner };
            // Events for a file we no longer track can still be in flight.
            if colors.scheme_file().as_deref() == Some(changed) {
                colors.update_scheme();
            }
        });
        match result {
            Ok(watcher) => *slot = Some(watcher),
            Err(e) => warn!("Colors for {:?} will not refresh automatically: {}", file, e),
        }
    }

    fn emit(&self, event: SchemeColorsEvent) {
        // Sending fails only when nobody is subscribed.
        if self.inner.events.send(event).is_err() {
            debug!("No subscribers for scheme color change");
        }
    }

    /// `true` while the scheme file is being watched.
    pub fn is_watching(&self) -> bool {
        self.inner.watcher.lock().is_some()
    }

    /// The file the active watcher follows, if any.
    pub fn watched_file(&self) -> Option<PathBuf> {
        self.inner.watcher.lock().as_ref().map(|w| w.path().to_path_buf())
    }

    pub fn scheme_name(&self) -> String {
        self.inner.state.read().scheme_name.clone()
    }

    pub fn scheme_file(&self) -> Option<PathBuf> {
        self.inner.state.read().scheme_file.clone()
    }

    pub fn color_source(&self) -> ColorSource {
        self.inner.source
    }

    /// Snapshot of all colors.
    pub fn palette(&self) -> SchemePalette {
        self.inner.state.read().palette
    }

    pub fn background_color(&self) -> Option<Color> {
        self.palette().background
    }

    pub fn text_color(&self) -> Option<Color> {
        self.palette().text
    }

    pub fn inactive_background_color(&self) -> Option<Color> {
        self.palette().inactive_background
    }

    pub fn inactive_text_color(&self) -> Option<Color> {
        self.palette().inactive_text
    }

    pub fn highlight_color(&self) -> Option<Color> {
        self.palette().highlight
    }

    pub fn highlighted_text_color(&self) -> Option<Color> {
        self.palette().highlighted_text
    }

    pub fn positive_text_color(&self) -> Option<Color> {
        self.palette().positive_text
    }

    pub fn neutral_text_color(&self) -> Option<Color> {
        self.palette().neutral_text
    }

    pub fn negative_text_color(&self) -> Option<Color> {
        self.palette().negative_text
    }

    pub fn button_text_color(&self) -> Option<Color> {
        self.palette().button_text
    }

    pub fn button_background_color(&self) -> Option<Color> {
        self.palette().button_background
    }

    pub fn button_hover_color(&self) -> Option<Color> {
        self.palette().button_hover
    }

    pub fn button_focus_color(&self) -> Option<Color> {
        self.palette().button_focus
    }
}
