//! Firmware Logging
//!
//! `log` backend that formats each record into a stack buffer and writes it
//! to the console with a boot-relative timestamp:
//!
//! ```text
//! [       0.412]  INFO rkfw_rk806::driver: pldo5 -> 3300000uV (sel 0xe0)
//! ```

use core::fmt::Write;

use log::{Level, LevelFilter, Log, Metadata, Record};

use crate::{console, timer};

/// Bytes kept per formatted line; longer records are truncated
const LINE_CAPACITY: usize = 256;

/// Stack buffer for formatting a record without allocation
pub(crate) struct MessageBuffer {
    data: [u8; LINE_CAPACITY],
    len: usize,
}

impl MessageBuffer {
    pub(crate) const fn new() -> Self {
        Self {
            data: [0u8; LINE_CAPACITY],
            len: 0,
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        match core::str::from_utf8(&self.data[..self.len]) {
            Ok(s) => s,
            // Truncation may split a code point; keep the valid prefix
            Err(e) => core::str::from_utf8(&self.data[..e.valid_up_to()]).unwrap_or(""),
        }
    }
}

impl Write for MessageBuffer {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        let bytes = s.as_bytes();
        let remaining = LINE_CAPACITY - self.len;
        let to_copy = bytes.len().min(remaining);
        self.data[self.len..self.len + to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
        Ok(())
    }
}

fn level_str(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31mERROR\x1b[0m",
        Level::Warn => "\x1b[33m WARN\x1b[0m",
        Level::Info => "\x1b[32m INFO\x1b[0m",
        Level::Debug => "\x1b[34mDEBUG\x1b[0m",
        Level::Trace => "\x1b[35mTRACE\x1b[0m",
    }
}

/// Format one record as a console line
pub(crate) fn format_line(buf: &mut MessageBuffer, time_ms: u64, record: &Record) {
    let _ = writeln!(
        buf,
        "[{:>8}.{:03}] {} {}: {}",
        time_ms / 1000,
        time_ms % 1000,
        level_str(record.level()),
        record.target(),
        record.args()
    );
}

struct FirmwareLogger;

impl Log for FirmwareLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut line = MessageBuffer::new();
        format_line(&mut line, timer::now_ms(), record);
        console::puts(line.as_str());
    }

    fn flush(&self) {}
}

/// Global logger instance
static LOGGER: FirmwareLogger = FirmwareLogger;

/// Install the console logger
///
/// Safe to call more than once; later calls only adjust the level.
pub fn init(level: LevelFilter) {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
