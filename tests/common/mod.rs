//! Captures `log` records emitted by this crate on the current test thread.
//!
//! `#[tokio::test]` runs on a current-thread runtime, so everything a run logs
//! (spawned run task included) lands in the calling test's buffer.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::cell::RefCell;
use std::sync::Once;

const CRATE_TARGET: &str = "weather_collector";

thread_local! {
    static CAPTURED: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

struct CapturingLogger;

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.target().starts_with(CRATE_TARGET)
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            CAPTURED.with(|logs| {
                logs.borrow_mut()
                    .push((record.level(), record.args().to_string()))
            });
        }
    }

    fn flush(&self) {}
}

static LOGGER: CapturingLogger = CapturingLogger;
static INIT: Once = Once::new();

/// Installs the logger once per process and empties this thread's buffer.
pub fn capture_logs() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).expect("logger installed twice");
        log::set_max_level(LevelFilter::Trace);
    });
    CAPTURED.with(|logs| logs.borrow_mut().clear());
}

/// Messages captured on this thread at exactly `level`.
pub fn logged(level: Level) -> Vec<String> {
    CAPTURED.with(|logs| {
        logs.borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message.clone())
            .collect()
    })
}
