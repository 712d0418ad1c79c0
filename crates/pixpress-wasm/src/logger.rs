//! `log` backend that writes to the browser console.
//!
//! Native builds (unit tests) have no console bindings and use `env_logger`
//! instead, so the same `init` call works on both.

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;
    use web_sys::console;

    pub(super) struct ConsoleLogger;

    pub(super) static LOGGER: ConsoleLogger = ConsoleLogger;

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
                Level::Error => console::error_1(&message),
                Level::Warn => console::warn_1(&message),
                Level::Info => console::info_1(&message),
                Level::Debug => console::debug_1(&message),
                Level::Trace => console::log_1(&message),
            }
        }

        fn flush(&self) {}
    }
}

/// Install the logger. Later calls only change the level.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LevelFilter) {
    if log::set_logger(&console::LOGGER).is_err() {
        log::debug!("console logger already installed");
    }
    log::set_max_level(level);
}

/// Install the logger. Later calls only change the level.
#[cfg(not(target_arch = "wasm32"))]
pub fn init(level: LevelFilter) {
    let installed = env_logger::Builder::new()
        .filter_level(LevelFilter::Trace)
        .is_test(cfg!(test))
        .try_init();
    if installed.is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
}

/// Parse a level name, case-insensitively. Unknown names mean `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    name.parse().unwrap_or(LevelFilter::Info)
}
