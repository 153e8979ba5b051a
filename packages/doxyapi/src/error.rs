//! Error types shared by every stage of the pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while building, transforming or writing an API dictionary.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("no handler for <{tag}> with attributes {attributes}; registered predicates: {candidates:?}")]
    NoHandler {
        tag: String,
        attributes: String,
        candidates: Vec<String>,
    },

    #[error("ambiguous handlers for <{tag}>: {predicates:?} are equally specific")]
    AmbiguousHandler { tag: String, predicates: Vec<String> },

    #[error("handler for <{tag}> with predicate {predicate} registered twice")]
    DuplicateHandler { tag: String, predicate: String },

    #[error("handler for <{tag}> produced {found}, expected {expected}")]
    UnexpectedOutput {
        tag: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("scope '{requested}' entered while scope '{active}' is still active")]
    ScopeReentered { active: String, requested: String },

    #[error("<{parent}> is missing required child <{child}>")]
    MissingChild { parent: String, child: String },

    #[error("<{tag}> is missing required attribute '{attribute}'")]
    MissingAttribute { tag: String, attribute: String },

    #[error("<{tag}> has invalid value '{value}' for {field}")]
    InvalidValue {
        tag: String,
        field: String,
        value: String,
    },

    #[error("unique name '{0}' is defined more than once")]
    DuplicateUniqueName(String),

    #[error("could not find selector '{selector}' in the API; available selectors are: {available:?}")]
    SelectorNotFound {
        selector: String,
        available: Vec<String>,
    },

    #[error("selector '{selector}' is a {kind} with inline={inline}, expected an inline namespace")]
    NotInlineNamespace {
        selector: String,
        kind: &'static str,
        inline: bool,
    },

    #[error("parent scope '{parent}' of inline namespace '{selector}' has no members list in the API")]
    MissingParentScope { selector: String, parent: String },

    #[error("rewriting keys produced duplicate key '{0}'")]
    KeyCollision(String),

    #[error("link to '{0}' does not name an entry in the API")]
    DanglingLink(String),

    #[error("file {path} is not contained in project root {root}")]
    PathOutsideProject { path: String, root: String },

    #[error("cannot patch '{key}' of '{selector}': {reason}")]
    PatchFailed {
        selector: String,
        key: String,
        reason: String,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed XML in {path}: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("invalid link pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl ApiError {
    pub fn missing_child(parent: &str, child: &str) -> Self {
        ApiError::MissingChild {
            parent: parent.to_string(),
            child: child.to_string(),
        }
    }

    pub fn missing_attribute(tag: &str, attribute: &str) -> Self {
        ApiError::MissingAttribute {
            tag: tag.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub fn invalid_value(tag: &str, field: &str, value: &str) -> Self {
        ApiError::InvalidValue {
            tag: tag.to_string(),
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ApiError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;
