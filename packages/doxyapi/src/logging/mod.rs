//! Logging Module
//!
//! Diagnostic sink handed to every parser handler. Soft conditions (skipped
//! compounds, unknown markup, dropped references) go here; nothing in the
//! pipeline branches on what was logged.

pub mod console_logger;
pub mod logger;
pub mod memory_logger;

pub use console_logger::*;
pub use logger::*;
pub use memory_logger::*;

#[cfg(test)]
mod test;
