// Memory Logger
//
// Logger that keeps every message it receives.

use super::logger::{LogLevel, Logger};
use std::cell::RefCell;

/// Records messages at or above its level, in arrival order.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    level: LogLevel,
    records: RefCell<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new(level: LogLevel) -> Self {
        Self {
            level,
            records: RefCell::new(Vec::new()),
        }
    }

    /// All recorded messages.
    pub fn records(&self) -> Vec<(LogLevel, String)> {
        self.records.borrow().clone()
    }

    /// Whether a message at `level` containing `needle` was recorded.
    pub fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.records
            .borrow()
            .iter()
            .any(|(l, msg)| *l == level && msg.contains(needle))
    }

    fn record(&self, level: LogLevel, msg: &str) {
        if self.is_enabled(level) {
            self.records.borrow_mut().push((level, msg.to_string()));
        }
    }
}

impl Logger for MemoryLogger {
    fn level(&self) -> LogLevel {
        self.level
    }

    fn debug(&self, msg: &str) {
        self.record(LogLevel::Debug, msg);
    }

    fn info(&self, msg: &str) {
        self.record(LogLevel::Info, msg);
    }

    fn warn(&self, msg: &str) {
        self.record(LogLevel::Warn, msg);
    }

    fn error(&self, msg: &str) {
        self.record(LogLevel::Error, msg);
    }
}
