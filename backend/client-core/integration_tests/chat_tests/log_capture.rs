//! Test helper: a `log` backend that keeps every record in memory.
//!
//! Tests in this binary run in parallel, each on its own thread. Records are
//! tagged with the thread that emitted them, so a test driving the runtime on
//! its own thread (the default current-thread `#[tokio::test]`) sees only its
//! own lines.

use std::sync::{Mutex, Once};
use std::thread::{self, ThreadId};

use log::{Level, LevelFilter, Log, Metadata, Record};

#[derive(Debug, Clone)]
pub struct CapturedRecord {
    pub thread: ThreadId,
    pub level: Level,
    pub target: String,
    pub message: String,
}

struct CaptureLogger {
    records: Mutex<Vec<CapturedRecord>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let captured = CapturedRecord {
            thread: thread::current().id(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        self.records.lock().unwrap().push(captured);
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

static INSTALL: Once = Once::new();

/// Install the capturing logger. Safe to call from every test.
pub fn install() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("Another logger is already installed");
        log::set_max_level(LevelFilter::Trace);
    });
}

/// Records emitted on the calling thread at `level` from modules under `target`.
pub fn records_here(level: Level, target: &str) -> Vec<CapturedRecord> {
    let me = thread::current().id();
    LOGGER
        .records
        .lock()
        .unwrap()
        .iter()
        .filter(|r| r.thread == me && r.level == level && r.target.starts_with(target))
        .cloned()
        .collect()
}
