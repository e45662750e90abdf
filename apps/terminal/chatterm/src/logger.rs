//! Logging for the chatterm terminal client.
//!
//! Stdout belongs to the chat view, so the console sink writes to stderr and
//! only carries warnings and errors. The full record goes to `chatterm.log`.
//! WebSocket library chatter is capped at info so frame-level debugging stays
//! readable.

use crate::error::ChattermError;

use common::ErrorLocation;

use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339_millis;
use log::{LevelFilter, info, warn};

static SETUP: Once = Once::new();

/// Set by the first caller; later callers only warn.
static SETUP_REQUESTED: AtomicBool = AtomicBool::new(false);

pub const LOG_FILE_NAME: &str = "chatterm.log";

#[cfg(debug_assertions)]
const FILE_LEVEL: LevelFilter = LevelFilter::Debug;

#[cfg(not(debug_assertions))]
const FILE_LEVEL: LevelFilter = LevelFilter::Info;

const CONSOLE_LEVEL: LevelFilter = LevelFilter::Warn;

/// Crates whose debug output drowns ours.
const QUIET_TARGETS: [&str; 2] = ["tungstenite", "tokio_tungstenite"];

/// Install the global logger, writing to stderr and to `log_dir/chatterm.log`.
///
/// Only the first call does anything. Later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns [`ChattermError::Chatterm`] if the log file cannot be opened or a
/// logger is already installed by someone else.
pub fn initialize(log_dir: &Path) -> Result<(), ChattermError> {
    if SETUP_REQUESTED.swap(true, Ordering::SeqCst) {
        warn!("Logger already initialized; keeping the first configuration");
        return Ok(());
    }

    let mut result = Ok(());
    SETUP.call_once(|| {
        result = initialize_internal(log_dir);
    });

    if result.is_ok() {
        info!(
            "Logging to {} at {FILE_LEVEL:?}",
            log_dir.join(LOG_FILE_NAME).display()
        );
    }
    result
}

#[track_caller]
pub(crate) fn initialize_internal(log_dir: &Path) -> Result<(), ChattermError> {
    let file = file_sink(&log_dir.join(LOG_FILE_NAME))?;

    let mut root = Dispatch::new().level(FILE_LEVEL);
    for target in QUIET_TARGETS {
        root = root.level_for(target, LevelFilter::Info);
    }

    root.chain(console_sink())
        .chain(file)
        .apply()
        .map_err(|e| ChattermError::Chatterm {
            message: format!("Failed to initialize logger: {e}"),
            location: ErrorLocation::from(Location::caller()),
        })
}

/// `chatterm WARN: message`, level colored.
fn console_sink() -> Dispatch {
    let colors = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    Dispatch::new()
        .level(CONSOLE_LEVEL)
        .format(move |out, message, record| {
            out.finish(format_args!(
                "chatterm {}: {message}",
                colors.color(record.level())
            ))
        })
        .chain(stderr())
}

/// `2026-01-01T10:00:00.123Z INFO  client_core::runtime: message`
#[track_caller]
fn file_sink(path: &Path) -> Result<Dispatch, ChattermError> {
    let file = fern::log_file(path).map_err(|e| ChattermError::Chatterm {
        message: format!("Failed to create log file {}: {e}", path.display()),
        location: ErrorLocation::from(Location::caller()),
    })?;

    Ok(Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} {:<5} {}: {message}",
                format_rfc3339_millis(SystemTime::now()),
                record.level(),
                record.target(),
            ))
        })
        .chain(file))
}
