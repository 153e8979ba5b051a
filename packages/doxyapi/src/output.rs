//! JSON Output
//!
//! The API is written with object keys sorted at every level so that
//! regenerated output diffs cleanly.

use crate::api::Api;
use crate::error::{ApiError, Result};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

/// Pretty JSON with recursively sorted keys.
pub fn to_json(api: &Api) -> Result<String> {
    let value = sort_keys(serde_json::to_value(api)?);
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Write [`to_json`] output, plus a trailing newline, to `path`.
pub fn write_json(api: &Api, path: &Path) -> Result<()> {
    let mut json = to_json(api)?;
    json.push('\n');
    fs::write(path, json).map_err(|e| ApiError::io(path, e))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, sort_keys(value)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}
