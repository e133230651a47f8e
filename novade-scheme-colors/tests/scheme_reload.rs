use novade_scheme_colors::{
    Color, ColorSource, SchemeColors, SchemeColorsEvent, SearchPaths, WatcherConfig, KDEGLOBALS,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::sync::broadcast::{error::TryRecvError, Receiver};

const BREEZE: &str = "[General]\nName=Breeze\n\n[WM]\nactiveBackground=227,229,231\nactiveForeground=35,38,39\n";
const BREEZE_EDITED: &str = "[General]\nName=Breeze\n\n[WM]\nactiveBackground=10,20,30\nactiveForeground=240,240,240\n";
const BREEZE_REPLACED: &str = "[General]\nName=Breeze\n\n[WM]\nactiveBackground=1,2,3\n";

struct Desktop {
    config: TempDir,
    data: TempDir,
    locator: SearchPaths,
}

impl Desktop {
    fn new() -> Self {
        let config = TempDir::new().unwrap();
        let data = TempDir::new().unwrap();
        fs::create_dir_all(data.path().join("color-schemes")).unwrap();
        let locator = SearchPaths::new(Some(config.path().to_path_buf()), vec![data.path().to_path_buf()]);
        Desktop { config, data, locator }
    }

    fn scheme_path(&self, stem: &str) -> PathBuf {
        self.data.path().join("color-schemes").join(format!("{}.colors", stem))
    }

    fn select_scheme(&self, name: &str) {
        fs::write(
            self.config.path().join(KDEGLOBALS),
            format!("[General]\nColorScheme={}\n", name),
        )
        .unwrap();
    }
}

fn fast_watcher() -> WatcherConfig {
    WatcherConfig {
        enabled: true,
        debounce_ms: 50,
    }
}

/// Waits for the next `ColorsChanged`, skipping other events.
fn next_colors(rx: &mut Receiver<SchemeColorsEvent>, timeout: Duration) -> Option<Color> {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        match rx.try_recv() {
            Ok(SchemeColorsEvent::ColorsChanged(palette)) => return palette.background,
            Ok(_) => {}
            Err(TryRecvError::Empty) => thread::sleep(Duration::from_millis(20)),
            Err(e) => panic!("event channel failed: {:?}", e),
        }
    }
    None
}

fn replace_atomically(path: &Path, content: &str) {
    let tmp = path.with_extension("colors.tmp");
    fs::write(&tmp, content).unwrap();
    fs::rename(&tmp, path).unwrap();
}

#[test]
fn test_kdeglobals_scheme_reloads_on_edit() {
    let desktop = Desktop::new();
    let path = desktop.scheme_path("Breeze");
    fs::write(&path, BREEZE).unwrap();
    desktop.select_scheme("Breeze");

    let colors = SchemeColors::with_watcher_config(KDEGLOBALS, ColorSource::WindowManager, &desktop.locator, &fast_watcher());
    assert_eq!(colors.scheme_file(), Some(path.clone()));
    assert_eq!(colors.scheme_name(), "Breeze");
    assert_eq!(colors.background_color(), Some(Color::rgb(227, 229, 231)));
    assert!(colors.is_watching());

    let mut rx = colors.subscribe();
    fs::write(&path, BREEZE_EDITED).unwrap();

    assert_eq!(next_colors(&mut rx, Duration::from_secs(5)), Some(Color::rgb(10, 20, 30)));
    assert_eq!(colors.text_color(), Some(Color::rgb(240, 240, 240)));
}

#[test]
fn test_deleted_file_keeps_colors_and_atomic_replace_reloads() {
    let desktop = Desktop::new();
    let path = desktop.scheme_path("Breeze");
    fs::write(&path, BREEZE).unwrap();

    let colors = SchemeColors::with_watcher_config("Breeze", ColorSource::WindowManager, &desktop.locator, &fast_watcher());
    let mut rx = colors.subscribe();

    fs::remove_file(&path).unwrap();
    assert_eq!(next_colors(&mut rx, Duration::from_millis(500)), None);
    assert_eq!(colors.background_color(), Some(Color::rgb(227, 229, 231)));

    replace_atomically(&path, BREEZE_REPLACED);
    assert_eq!(next_colors(&mut rx, Duration::from_secs(5)), Some(Color::rgb(1, 2, 3)));
    assert_eq!(colors.text_color(), None);
}

#[test]
fn test_other_files_in_scheme_dir_are_ignored() {
    let desktop = Desktop::new();
    let path = desktop.scheme_path("Breeze");
    fs::write(&path, BREEZE).unwrap();

    let colors = SchemeColors::with_watcher_config("Breeze", ColorSource::WindowManager, &desktop.locator, &fast_watcher());
    let mut rx = colors.subscribe();

    fs::write(desktop.scheme_path("Oxygen"), BREEZE_EDITED).unwrap();
    assert_eq!(next_colors(&mut rx, Duration::from_millis(500)), None);
    assert_eq!(colors.background_color(), Some(Color::rgb(227, 229, 231)));
}

#[test]
fn test_retargeted_watcher_follows_new_file() {
    let desktop = Desktop::new();
    let first = desktop.scheme_path("Breeze");
    let second = desktop.scheme_path("Oxygen");
    fs::write(&first, BREEZE).unwrap();
    fs::write(&second, BREEZE).unwrap();

    let colors = SchemeColors::with_watcher_config("Breeze", ColorSource::WindowManager, &desktop.locator, &fast_watcher());
    let mut rx = colors.subscribe();

    colors.set_scheme_file(Some(second.clone()));
    assert!(colors.is_watching());

    fs::write(&first, BREEZE_EDITED).unwrap();
    assert_eq!(next_colors(&mut rx, Duration::from_millis(500)), None);

    fs::write(&second, BREEZE_REPLACED).unwrap();
    assert_eq!(next_colors(&mut rx, Duration::from_secs(5)), Some(Color::rgb(1, 2, 3)));
}

#[test]
fn test_dropping_last_handle_stops_watching() {
    let desktop = Desktop::new();
    let path = desktop.scheme_path("Breeze");
    fs::write(&path, BREEZE).unwrap();

    let colors = SchemeColors::with_watcher_config("Breeze", ColorSource::WindowManager, &desktop.locator, &fast_watcher());
    let mut rx = colors.subscribe();
    drop(colors);

    fs::write(&path, BREEZE_EDITED).unwrap();
    thread::sleep(Duration::from_millis(300));
    assert!(matches!(rx.try_recv(), Err(TryRecvError::Closed)));
}

#[test]
fn test_scheme_file_created_after_selection_is_loaded() {
    let desktop = Desktop::new();
    let path = desktop.scheme_path("Breeze");
    fs::write(&path, BREEZE).unwrap();

    let colors = SchemeColors::with_watcher_config("Breeze", ColorSource::WindowManager, &desktop.locator, &fast_watcher());
    let mut rx = colors.subscribe();

    let pending = desktop.scheme_path("Pending");
    colors.set_scheme_file(Some(pending.clone()));
    assert_eq!(colors.watched_file(), Some(pending.clone()));
    assert!(!colors.update_scheme());

    fs::write(&pending, BREEZE_REPLACED).unwrap();
    assert_eq!(next_colors(&mut rx, Duration::from_secs(5)), Some(Color::rgb(1, 2, 3)));
}
