//! API Patching
//!
//! Replaces individual fields of parsed entities, for the cases where
//! Doxygen gets something wrong and the source cannot be changed.

use crate::api::{Api, Entity};
use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Replace the field at `key` (a `::` separated path such as
/// `location::path`) of the entity `selector` with `value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiPatch {
    pub selector: String,
    pub key: String,
    pub value: Value,
}

/// Apply `patches` in order and return the patched API.
pub fn patch_api(api: &Api, patches: &[ApiPatch]) -> Result<Api> {
    let mut patched = api.clone();

    for patch in patches {
        let entity = patched
            .get(&patch.selector)
            .ok_or_else(|| ApiError::SelectorNotFound {
                selector: patch.selector.clone(),
                available: patched.keys().cloned().collect(),
            })?;

        let mut value = serde_json::to_value(entity)?;
        set_field(&mut value, patch)?;

        let entity: Entity = serde_json::from_value(value).map_err(|e| failed(patch, e.to_string()))?;
        patched.insert(patch.selector.clone(), entity);
    }
    Ok(patched)
}

fn set_field(value: &mut Value, patch: &ApiPatch) -> Result<()> {
    let mut target = value;
    for segment in patch.key.split("::") {
        target = target
            .as_object_mut()
            .ok_or_else(|| failed(patch, format!("'{}' is not inside an object", segment)))?
            .get_mut(segment)
            .ok_or_else(|| failed(patch, format!("no field '{}'", segment)))?;
    }
    *target = patch.value.clone();
    Ok(())
}

fn failed(patch: &ApiPatch, reason: String) -> ApiError {
    ApiError::PatchFailed {
        selector: patch.selector.clone(),
        key: patch.key.clone(),
        reason,
    }
}
