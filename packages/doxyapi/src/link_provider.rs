//! Link Provider
//!
//! Fallback resolver for names the API dictionary does not contain. Rules
//! are regular expressions that must match the whole name; the first rule
//! that matches wins. User mappings are tried before the built-in
//! cppreference rules.

use crate::api::Link;
use crate::error::{ApiError, Result};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

/// Resolves a type name to an external link.
pub trait LinkProvider {
    fn find_link(&self, name: &str) -> Option<Link>;
}

/// A user supplied rule. `{N}` in the link value is replaced by capture
/// group `N + 1` of the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkMapping {
    pub pattern: String,
    pub link: Link,
}

impl LinkMapping {
    pub fn new(pattern: impl Into<String>, link: Link) -> Self {
        Self {
            pattern: pattern.into(),
            link,
        }
    }
}

struct Rule {
    pattern: Regex,
    link: Link,
}

impl Rule {
    fn compile(mapping: &LinkMapping) -> Result<Self> {
        let pattern = Regex::new(&format!("^(?:{})$", mapping.pattern)).map_err(|source| {
            ApiError::Pattern {
                pattern: mapping.pattern.clone(),
                source,
            }
        })?;
        Ok(Rule {
            pattern,
            link: mapping.link.clone(),
        })
    }

    fn apply(&self, name: &str) -> Option<Link> {
        let captures = self.pattern.captures(name)?;
        Some(Link {
            url: self.link.url,
            value: substitute(&self.link.value, &captures),
        })
    }
}

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{(\d+)\}").unwrap());

fn substitute(template: &str, captures: &Captures<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |placeholder: &Captures<'_>| {
            placeholder[1]
                .parse::<usize>()
                .ok()
                .and_then(|index| captures.get(index + 1))
                .map(|group| group.as_str().to_string())
                .unwrap_or_default()
        })
        .into_owned()
}

const CPPREFERENCE: &str = "https://en.cppreference.com/w/cpp";

static CPPREFERENCE_RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    let mappings = [
        (r"(std::)?u?int\d*_t", "types/integer"),
        (r"(std::)?size_t", "types/size_t"),
        (r"std::(vector|map|array|deque|forward_list|list|set)", "container/{0}"),
        (r"std::string", "string/basic_string"),
        (r"std::function", "utility/functional/function"),
        (r"(float|double|int|bool)", "language/types"),
    ];
    mappings
        .iter()
        .map(|(pattern, page)| {
            let mapping = LinkMapping::new(*pattern, Link::external(format!("{}/{}", CPPREFERENCE, page)));
            Rule::compile(&mapping).unwrap()
        })
        .collect()
});

/// [`LinkProvider`] backed by ordered pattern rules.
pub struct PatternLinkProvider {
    user_rules: Vec<Rule>,
    builtin: bool,
}

impl PatternLinkProvider {
    /// Provider with `user_mappings` ahead of the built-in rules.
    pub fn new(user_mappings: &[LinkMapping]) -> Result<Self> {
        let user_rules = user_mappings
            .iter()
            .map(Rule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            user_rules,
            builtin: true,
        })
    }

    /// Provider with only `user_mappings`.
    pub fn without_builtin(user_mappings: &[LinkMapping]) -> Result<Self> {
        Ok(Self {
            builtin: false,
            ..Self::new(user_mappings)?
        })
    }
}

impl LinkProvider for PatternLinkProvider {
    fn find_link(&self, name: &str) -> Option<Link> {
        let builtin: &[Rule] = if self.builtin { CPPREFERENCE_RULES.as_slice() } else { &[] };
        self.user_rules
            .iter()
            .chain(builtin)
            .find_map(|rule| rule.apply(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_width_integers_link_to_cppreference() {
        let provider = PatternLinkProvider::new(&[]).unwrap();
        for name in ["uint8_t", "std::int32_t", "std::size_t"] {
            assert!(provider.find_link(name).is_some(), "{}", name);
        }
        assert_eq!(
            provider.find_link("std::uint64_t"),
            Some(Link::external("https://en.cppreference.com/w/cpp/types/integer"))
        );
    }

    #[test]
    fn capture_groups_fill_placeholders() {
        let provider = PatternLinkProvider::new(&[]).unwrap();
        assert_eq!(
            provider.find_link("std::vector"),
            Some(Link::external("https://en.cppreference.com/w/cpp/container/vector"))
        );
    }

    #[test]
    fn patterns_must_match_the_whole_name() {
        let provider = PatternLinkProvider::new(&[]).unwrap();
        assert_eq!(provider.find_link("std::vector_view"), None);
        assert_eq!(provider.find_link("integer"), None);
        assert_eq!(provider.find_link("coffee::Machine"), None);
    }

    #[test]
    fn user_mappings_take_precedence() {
        let provider = PatternLinkProvider::new(&[LinkMapping::new(
            "std::(vector)",
            Link::external("https://example.com/{0}.html"),
        )])
        .unwrap();

        assert_eq!(
            provider.find_link("std::vector"),
            Some(Link::external("https://example.com/vector.html"))
        );
        assert!(provider.find_link("std::map").is_some());
    }

    #[test]
    fn missing_groups_substitute_empty() {
        let provider = PatternLinkProvider::without_builtin(&[LinkMapping::new(
            "(a)?b",
            Link::external("x{0}y{3}"),
        )])
        .unwrap();
        assert_eq!(provider.find_link("b"), Some(Link::external("xy")));
        assert_eq!(provider.find_link("int"), None);
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(matches!(
            PatternLinkProvider::new(&[LinkMapping::new("(", Link::external("x"))]),
            Err(ApiError::Pattern { .. })
        ));
    }
}
