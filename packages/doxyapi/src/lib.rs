#![deny(clippy::all)]

//! doxyapi - Doxygen XML to API model
//!
//! Converts the XML Doxygen generates for a C++ code base into a flat,
//! cross-linked JSON API dictionary keyed by unique name. The pipeline runs
//! leaves first:
//!
//! 1. [`parser`] walks the XML through a dispatch table of handlers.
//! 2. [`patch`] applies user corrections to known-wrong generator output.
//! 3. [`collapse`] removes inline namespace indirection.
//! 4. [`link_mapper`] annotates type expressions and documentation with links.

pub mod api;
pub mod collapse;
pub mod config;
pub mod error;
pub mod link_mapper;
pub mod link_provider;
pub mod location_mapper;
pub mod logging;
pub mod output;
pub mod parser;
pub mod patch;
pub mod pipeline;
pub mod xml;

// Re-exports
pub use api::{Api, Entity};
pub use collapse::collapse_inline_namespaces;
pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use link_mapper::LinkMapper;
pub use link_provider::{LinkMapping, LinkProvider, PatternLinkProvider};
pub use location_mapper::{LocationMapper, PathMapper};
pub use logging::{ConsoleLogger, LogLevel, Logger, MemoryLogger, NullLogger};
pub use output::{to_json, write_json};
pub use parser::DoxygenParser;
pub use patch::{patch_api, ApiPatch};
pub use pipeline::generate;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
