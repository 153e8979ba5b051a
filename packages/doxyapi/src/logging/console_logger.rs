// Console Logger
//
// Logger that writes to stderr, keeping stdout free for the JSON output.

use super::logger::{LogLevel, Logger};

/// Console logger.
pub struct ConsoleLogger {
    level: LogLevel,
}

impl ConsoleLogger {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    fn emit(&self, level: LogLevel, msg: &str) {
        if self.is_enabled(level) {
            eprintln!("[{}] {}", level, msg);
        }
    }
}

impl Logger for ConsoleLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn debug(&self, msg: &str) {
        self.emit(LogLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.emit(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.emit(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.emit(LogLevel::Error, msg);
    }
}
