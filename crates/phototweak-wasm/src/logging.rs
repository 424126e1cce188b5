//! `log` backend that writes to the browser console.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&message),
            Level::Warn => web_sys::console::warn_1(&message),
            Level::Info => web_sys::console::info_1(&message),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&message),
        }
    }

    fn flush(&self) {}
}

/// Parse a level name (`"off"`, `"error"`, ... `"trace"`, any case).
pub(crate) fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .trim()
        .parse::<LevelFilter>()
        .map_err(|_| format!("Unknown log level: {}", level))
}

/// Route core log output to the browser console at `level`.
///
/// Safe to call more than once; later calls only change the level.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).map_err(|e| JsValue::from_str(&e))?;
    // Already installed on repeat calls
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    Ok(())
}
