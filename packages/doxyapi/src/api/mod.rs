//! API Model
//!
//! The flat dictionary produced by the parser: unique name to entity.
//! Entities refer to each other by unique name only.

pub mod entity;
pub mod paragraph;
pub mod rewrite;
pub mod types;

pub use entity::*;
pub use paragraph::*;
pub use rewrite::{map_api_strings, map_strings};
pub use types::*;

use crate::error::{ApiError, Result};
use std::collections::BTreeMap;

/// Unique name to entity. Ordered so that output is deterministic.
pub type Api = BTreeMap<String, Entity>;

/// Move every entry of `fragment` into `api`, failing on a unique-name
/// collision.
pub fn merge(api: &mut Api, fragment: Api) -> Result<()> {
    for (unique_name, entity) in fragment {
        if api.contains_key(&unique_name) {
            return Err(ApiError::DuplicateUniqueName(unique_name));
        }
        api.insert(unique_name, entity);
    }
    Ok(())
}

/// `scope::name`, or `name` when the scope is empty or absent.
pub fn qualified_name(scope: Option<&str>, name: &str) -> String {
    match scope {
        Some(scope) if !scope.is_empty() => format!("{}::{}", scope, name),
        _ => name.to_string(),
    }
}

/// Split `a::b::c` into (`Some("a::b")`, `"c"`). Separators inside template
/// argument lists do not count.
pub fn split_scope(scoped_name: &str) -> (Option<&str>, &str) {
    let bytes = scoped_name.as_bytes();
    let mut depth = 0usize;
    let mut split = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'<' => depth += 1,
            b'>' => depth = depth.saturating_sub(1),
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }
    match split {
        Some(at) => (Some(&scoped_name[..at]), &scoped_name[at + 2..]),
        None => (None, scoped_name),
    }
}
