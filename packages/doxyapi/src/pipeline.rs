//! Pipeline
//!
//! Doxygen XML directory to finished API: parse, patch, collapse inline
//! namespaces, then add links.

use crate::api::Api;
use crate::collapse::collapse_inline_namespaces;
use crate::config::ApiConfig;
use crate::error::Result;
use crate::link_mapper::LinkMapper;
use crate::link_provider::PatternLinkProvider;
use crate::location_mapper::LocationMapper;
use crate::logging::Logger;
use crate::parser::DoxygenParser;
use crate::patch::patch_api;
use std::path::Path;

/// Run every stage over the Doxygen output in `xml_dir`.
pub fn generate(xml_dir: &Path, config: &ApiConfig, logger: &dyn Logger) -> Result<Api> {
    let mapper = LocationMapper::new(&config.project_root, config.include_paths.clone())?;
    let provider = PatternLinkProvider::new(&config.user_mappings)?;

    let parser = DoxygenParser::new(logger, &mapper)?;
    let api = parser.parse_index(xml_dir)?;
    logger.info(&format!("Parsed {} entities", api.len()));

    let api = patch_api(&api, &config.patch_api)?;

    let api = collapse_inline_namespaces(&api, &config.collapse_inline_namespaces)?;
    if !config.collapse_inline_namespaces.is_empty() {
        logger.debug(&format!(
            "Collapsed inline namespaces: {}",
            config.collapse_inline_namespaces.join(", ")
        ));
    }

    LinkMapper::new(&api, &provider).map()
}
