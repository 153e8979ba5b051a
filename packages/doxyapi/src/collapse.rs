//! Scope Collapser
//!
//! Removes inline namespaces from the API. Members of an inline namespace
//! move to its parent scope and every key or string value naming the inline
//! scope is rewritten.
//!
//! Selectors are collapsed longest first. Nested inline scopes share a
//! prefix with their parents, so the longest selector is always innermost
//! and each collapse sees a stable prefix.

use crate::api::{map_api_strings, Api, Entity};
use crate::error::{ApiError, Result};

/// Collapse every namespace named in `selectors` into its parent scope and
/// return the rewritten API. The order of `selectors` does not matter.
pub fn collapse_inline_namespaces(api: &Api, selectors: &[String]) -> Result<Api> {
    let mut ordered: Vec<&str> = selectors.iter().map(String::as_str).collect();
    ordered.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    ordered.dedup();

    let mut api = api.clone();
    for selector in ordered {
        api = collapse_one(api, selector)?;
    }
    Ok(api)
}

fn collapse_one(mut api: Api, selector: &str) -> Result<Api> {
    let namespace = match api.get(selector) {
        Some(Entity::Namespace(namespace)) if namespace.inline => namespace.clone(),
        Some(other) => {
            return Err(ApiError::NotInlineNamespace {
                selector: selector.to_string(),
                kind: other.kind(),
                inline: false,
            })
        }
        None => {
            return Err(ApiError::SelectorNotFound {
                selector: selector.to_string(),
                available: api.keys().cloned().collect(),
            })
        }
    };

    // A top-level inline namespace has no parent to fold into; its members
    // are reached through the `selector::` prefix alone.
    let (from_scope, to_scope) = match namespace.scope.as_deref() {
        Some(scope) if !scope.is_empty() => (selector.to_string(), scope.to_string()),
        _ => (format!("{}::", selector), String::new()),
    };

    if to_scope.is_empty() {
        for entity in api.values_mut() {
            if let Some(scope) = entity.scope_mut() {
                if scope.as_deref() == Some(selector) {
                    *scope = None;
                }
            }
        }
    } else {
        let members = api
            .get_mut(&to_scope)
            .and_then(Entity::members_mut)
            .ok_or_else(|| ApiError::MissingParentScope {
                selector: selector.to_string(),
                parent: to_scope.clone(),
            })?;
        members.retain(|member| member != selector);
        members.extend(namespace.members.iter().cloned());
    }

    api.remove(selector);

    map_api_strings(&api, &|value| replace_scope_prefix(value, &from_scope, &to_scope))
}

/// `value` with a leading `from_scope` replaced by `to_scope`. A scope
/// prefix must be followed by `::` or nothing, so `A::B` rewrites neither
/// `A::Bx` nor the function key `A::B(int)`.
fn replace_scope_prefix(value: &str, from_scope: &str, to_scope: &str) -> Option<String> {
    let rest = value.strip_prefix(from_scope)?;
    if !from_scope.ends_with("::") && !rest.is_empty() && !rest.starts_with("::") {
        return None;
    }
    Some(format!("{}{}", to_scope, rest))
}
