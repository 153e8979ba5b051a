//! Deep string substitution over serialized API data.
//!
//! Both the Doxygen-ID remap and the inline namespace collapse are raw
//! string rewrites over every key and string leaf, so they share this
//! utility instead of each walking the typed model.

use super::Api;
use crate::error::{ApiError, Result};
use serde_json::{Map, Value};

/// Rewrite every object key and string leaf for which `replace` returns
/// `Some`. Keys rewritten onto an existing key of the same object are an
/// error.
pub fn map_strings(value: Value, replace: &dyn Fn(&str) -> Option<String>) -> Result<Value> {
    match value {
        Value::String(s) => Ok(Value::String(replace(&s).unwrap_or(s))),
        Value::Array(items) => items
            .into_iter()
            .map(|item| map_strings(item, replace))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        Value::Object(map) => {
            let mut result = Map::new();
            for (key, item) in map {
                let key = replace(&key).unwrap_or(key);
                if result.contains_key(&key) {
                    return Err(ApiError::KeyCollision(key));
                }
                let item = map_strings(item, replace)?;
                result.insert(key, item);
            }
            Ok(Value::Object(result))
        }
        other => Ok(other),
    }
}

/// Build a new API with `replace` applied to every key and string leaf.
pub fn map_api_strings(api: &Api, replace: &dyn Fn(&str) -> Option<String>) -> Result<Api> {
    let value = serde_json::to_value(api)?;
    let value = map_strings(value, replace)?;
    Ok(serde_json::from_value(value)?)
}
