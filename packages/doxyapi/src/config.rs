//! Configuration
//!
//! Project settings, read from a JSON file:
//!
//! ```json
//! {
//!     "project_root": "..",
//!     "include_paths": ["src"],
//!     "user_mappings": [
//!         {"pattern": "kodo::.*", "link": {"url": true, "value": "https://kodo.example"}}
//!     ],
//!     "collapse_inline_namespaces": ["coffee::v1"],
//!     "patch_api": [
//!         {"selector": "VERSION", "key": "location::line", "value": 5}
//!     ],
//!     "log_level": "info"
//! }
//! ```

use crate::error::{ApiError, Result};
use crate::link_provider::LinkMapping;
use crate::location_mapper::absolute;
use crate::logging::LogLevel;
use crate::patch::ApiPatch;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Root that locations are reported relative to.
    pub project_root: PathBuf,
    /// Roots that include directives are computed from.
    pub include_paths: Vec<PathBuf>,
    /// Link rules tried before the built-in ones.
    pub user_mappings: Vec<LinkMapping>,
    /// Inline namespaces to fold into their parent scope.
    pub collapse_inline_namespaces: Vec<String>,
    pub patch_api: Vec<ApiPatch>,
    pub log_level: LogLevel,
}

impl ApiConfig {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ..Default::default()
        }
    }

    /// Load a config file. Relative paths in it are relative to the file's
    /// directory.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ApiError::io(path, e))?;
        let mut config: ApiConfig = serde_json::from_str(&content)?;

        let base = absolute(path.parent().unwrap_or_else(|| Path::new("")))?;
        config.project_root = base.join(&config.project_root);
        config.include_paths = config
            .include_paths
            .iter()
            .map(|include| config.project_root.join(include))
            .collect();
        Ok(config)
    }
}
