//! Structured logging initialisation for the lifecycle commands.
//!
//! The console layer is always installed; a JSON file layer joins it when
//! the resolved configuration enables file logging. The remote log section
//! configures an external sink whose transport lives outside this crate, so
//! it only influences what gets recorded about the wiring.

use std::fs::{self, File, OpenOptions};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use thiserror::Error;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

static TELEMETRY_GUARD: OnceCell<()> = OnceCell::new();

/// Directory holding the daemon's log files.
pub const LOG_DIRECTORY: &str = "logs";

/// Name of the daemon log file inside [`LOG_DIRECTORY`].
pub const LOG_FILE: &str = "gantryd.log";

/// Handle returned when telemetry has been initialised.
#[derive(Debug, Default, Clone, Copy)]
pub struct TelemetryHandle;

/// What the caller wants from the logging stack.
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetrySettings {
    /// Lowers the console filter from info to debug.
    pub verbose: bool,
    /// Adds the JSON file layer.
    pub log_to_file: bool,
}

/// Errors encountered while configuring telemetry.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to parse the log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
    /// Failed to open the log file.
    #[error("failed to open log file '{path}': {source}")]
    LogFile {
        /// Path of the log file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
    /// Failed to install the tracing subscriber.
    #[error("failed to install telemetry subscriber: {0}")]
    Subscriber(String),
}

/// Configures the global tracing subscriber when invoked for the first time.
///
/// Repeated calls are idempotent: the first invocation installs the global
/// subscriber, later ones detect the existing registration and hand back a
/// fresh [`TelemetryHandle`] without touching global state again.
pub fn initialise(settings: &TelemetrySettings) -> Result<TelemetryHandle, TelemetryError> {
    TELEMETRY_GUARD
        .get_or_try_init(|| install_subscriber(settings))
        .map(|_| TelemetryHandle)
}

fn install_subscriber(settings: &TelemetrySettings) -> Result<(), TelemetryError> {
    let expression = if settings.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_new(expression)
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let console = fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .compact();

    let file = if settings.log_to_file {
        let writer = open_log_file()?;
        Some(
            fmt::layer()
                .json()
                .flatten_event(true)
                .with_ansi(false)
                .with_writer(writer),
        )
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|error| TelemetryError::Subscriber(error.to_string()))
}

fn open_log_file() -> Result<Arc<File>, TelemetryError> {
    let directory = PathBuf::from(LOG_DIRECTORY);
    let path = directory.join(LOG_FILE);
    let map_error = |source| TelemetryError::LogFile {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(&directory).map_err(map_error)?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(map_error)?;
    Ok(Arc::new(file))
}
