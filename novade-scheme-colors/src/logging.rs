//! Logging setup for scheme-colors.
//!
//! Built on `tracing`. Output goes to the console (stdout or stderr, see
//! [`ConsoleTarget`]) as text or JSON, and optionally to a daily-rolling log
//! file written through a non-blocking appender.

use crate::config::LoggingConfig;
use crate::error::{LoggingError, SchemeError};

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::fs;
use std::io::{stderr, stdout};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

const DEFAULT_LOG_FILE_NAME: &str = "scheme-colors.log";

/// Stream that receives console log output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConsoleTarget {
    #[default]
    Stdout,
    /// Keeps stdout free for program output.
    Stderr,
}

/// Keeps the file writer alive so buffered lines are flushed.
static LOG_WORKER_GUARD: Lazy<Mutex<Option<WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

/// Initializes stderr logging filtered by `RUST_LOG` (default `info`).
///
/// Meant for tests and for early startup before the settings file is read.
/// Does nothing if a global subscriber is already set.
pub fn init_minimal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    let _ = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .try_init();
}

fn level_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    let level = match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        invalid => return Err(LoggingError::FilterError(format!("Invalid log level: {}", invalid))),
    };
    EnvFilter::try_new(level.to_string()).map_err(|e| LoggingError::FilterError(e.to_string()))
}

fn create_file_layer(log_path: &Path, format: &str) -> Result<(BoxedLayer, WorkerGuard), LoggingError> {
    let directory = match log_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(directory)?;

    let file_name = log_path
        .file_name()
        .unwrap_or_else(|| std::ffi::OsStr::new(DEFAULT_LOG_FILE_NAME));
    let file_appender = tracing_appender::rolling::daily(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);

    let layer = match format {
        "json" => fmt::layer().json().with_writer(writer).with_ansi(false).boxed(),
        _ => fmt::layer().with_writer(writer).with_ansi(false).boxed(),
    };
    Ok((layer, guard))
}

fn console_layer<W>(format: &str, writer: W, ansi: bool, filter: EnvFilter) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    match format {
        "json" => fmt::layer()
            .json()
            .with_writer(writer)
            .with_ansi(false)
            .with_filter(filter)
            .boxed(),
        _ => fmt::layer().with_writer(writer).with_ansi(ansi).with_filter(filter).boxed(),
    }
}

/// Installs the global subscriber described by `config`, logging to stdout.
///
/// Same as [`init_logging_with_console`] with [`ConsoleTarget::Stdout`].
pub fn init_logging(config: &LoggingConfig, is_reload: bool) -> Result<(), SchemeError> {
    init_logging_with_console(config, is_reload, ConsoleTarget::Stdout)
}

/// Installs the global subscriber described by `config`, with console output
/// on `console`.
///
/// With `is_reload` set, a failure because a subscriber is already installed
/// is reported on stderr and ignored.
///
/// # Errors
///
/// Returns [`LoggingError::FilterError`] for an unknown level,
/// [`LoggingError::IoError`] if the log directory cannot be created and
/// [`LoggingError::InitializationError`] if a subscriber is already set on
/// first initialization.
pub fn init_logging_with_console(
    config: &LoggingConfig,
    is_reload: bool,
    console: ConsoleTarget,
) -> Result<(), SchemeError> {
    let format = config.format.to_lowercase();

    let filter = level_filter(&config.level)?;
    let console_output = match console {
        ConsoleTarget::Stdout => console_layer(&format, stdout, atty::is(atty::Stream::Stdout), filter),
        ConsoleTarget::Stderr => console_layer(&format, stderr, atty::is(atty::Stream::Stderr), filter),
    };

    let mut layers: Vec<BoxedLayer> = vec![console_output];
    let mut file_guard = None;
    if let Some(log_path) = &config.file_path {
        let (file_layer, guard) = create_file_layer(log_path, &format)?;
        layers.push(file_layer.with_filter(level_filter(&config.level)?).boxed());
        file_guard = Some(guard);
    }

    let result = Registry::default().with(layers).try_init();

    // Replacing the guard flushes the previous file writer.
    *LOG_WORKER_GUARD.lock() = file_guard;

    match result {
        Ok(()) => Ok(()),
        Err(e) if is_reload => {
            eprintln!("[INFO] Logging reconfiguration kept the existing subscriber: {}", e);
            Ok(())
        }
        Err(e) => Err(LoggingError::InitializationError(format!(
            "Failed to set global tracing subscriber. Was it already initialized? Error: {}",
            e
        ))
        .into()),
    }
}
