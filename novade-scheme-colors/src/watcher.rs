//! Scheme file watching.
//!
//! [`SchemeWatcher`] watches the *parent directory* of a scheme file so that
//! atomic replacements (write to a temp file, rename over the original) are
//! seen as well as in-place writes. Bursts of events are coalesced: the
//! callback runs once the file has been quiet for the debounce window.

use crate::error::SchemeError;
use notify::{event::EventKind, Event, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Decides which raw filesystem events concern the watched file.
#[derive(Debug, Clone)]
struct WatchTarget {
    path: PathBuf,
    file_name: OsString,
    parent: PathBuf,
    canonical_parent: PathBuf,
}

impl WatchTarget {
    fn new(path: &Path) -> Result<Self, SchemeError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| SchemeError::InvalidInput(format!("{:?} does not name a file", path)))?
            .to_os_string();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        // Some backends report canonical paths (e.g. /private/var on macOS).
        let canonical_parent = fs::canonicalize(&parent).unwrap_or_else(|_| parent.clone());
        Ok(WatchTarget {
            path: path.to_path_buf(),
            file_name,
            parent,
            canonical_parent,
        })
    }

    fn matches_path(&self, event_path: &Path) -> bool {
        if event_path.file_name() != Some(self.file_name.as_os_str()) {
            return false;
        }
        match event_path.parent() {
            Some(p) => p == self.parent || p == self.canonical_parent,
            None => false,
        }
    }

    /// Create, modify and remove events touching the watched file.
    fn is_relevant(&self, event: &Event) -> bool {
        let kind_matches = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_));
        kind_matches && event.paths.iter().any(|p| self.matches_path(p))
    }
}

/// Keeps a scheme file under observation until dropped.
pub struct SchemeWatcher {
    _watcher: RecommendedWatcher,
    path: PathBuf,
}

impl std::fmt::Debug for SchemeWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemeWatcher").field("path", &self.path).finish()
    }
}

impl SchemeWatcher {
    /// Starts watching `path`, calling `on_change(path)` after each burst of
    /// changes once `debounce` has elapsed without further events.
    ///
    /// The callback runs on a dedicated thread. The thread ends when the
    /// returned watcher is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemeError::InvalidInput`] if `path` has no file name and
    /// [`SchemeError::Watch`] if the watcher cannot be created or the parent
    /// directory cannot be watched.
    pub fn watch<F>(path: &Path, debounce: Duration, on_change: F) -> Result<Self, SchemeError>
    where
        F: Fn(&Path) + Send + 'static,
    {
        let target = WatchTarget::new(path)?;
        let (tx, rx) = channel::<notify::Result<Event>>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                // The receiver is gone only while the watcher is being dropped.
                let _ = tx.send(res);
            },
            notify::Config::default(),
        )
        .map_err(|source| SchemeError::Watch {
            path: path.to_path_buf(),
            source,
        })?;

        watcher
            .watch(&target.parent, RecursiveMode::NonRecursive)
            .map_err(|source| SchemeError::Watch {
                path: target.parent.clone(),
                source,
            })?;
        debug!("Watching directory {:?} for changes to {:?}", target.parent, target.file_name);

        let thread_target = target.clone();
        thread::Builder::new()
            .name("scheme-watcher".to_string())
            .spawn(move || run_event_loop(rx, thread_target, debounce, on_change))?;

        info!("Scheme file watcher started for {:?}", path);
        Ok(SchemeWatcher {
            _watcher: watcher,
            path: target.path,
        })
    }

    /// The watched scheme file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn run_event_loop<F>(rx: Receiver<notify::Result<Event>>, target: WatchTarget, debounce: Duration, on_change: F)
where
    F: Fn(&Path),
{
    loop {
        match rx.recv() {
            Ok(Ok(event)) => {
                if !target.is_relevant(&event) {
                    continue;
                }
                debug!("Change detected for {:?}: {:?}", target.path, event.kind);
                if !wait_until_quiet(&rx, &target, debounce) {
                    break;
                }
                on_change(&target.path);
            }
            Ok(Err(e)) => error!("Error receiving file event for {:?}: {}", target.path, e),
            Err(_) => break,
        }
    }
    debug!("Scheme watcher thread for {:?} stopped", target.path);
}

/// Swallows further relevant events until `debounce` passes without one.
/// Returns `false` if the channel disconnected.
fn wait_until_quiet(rx: &Receiver<notify::Result<Event>>, target: &WatchTarget, debounce: Duration) -> bool {
    let mut deadline = Instant::now() + debounce;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match rx.recv_timeout(remaining) {
            Ok(Ok(event)) => {
                if target.is_relevant(&event) {
                    deadline = Instant::now() + debounce;
                }
            }
            Ok(Err(e)) => warn!("Error receiving file event for {:?}: {}", target.path, e),
            Err(RecvTimeoutError::Timeout) => return true,
            Err(RecvTimeoutError::Disconnected) => return false,
        }
    }
}
