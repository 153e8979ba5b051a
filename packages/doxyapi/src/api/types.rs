//! Type expressions and links.

use serde::{Deserialize, Serialize};

/// A cross reference. `url == false` means `value` is a unique name in the
/// API dictionary; otherwise `value` is an external URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub url: bool,
    pub value: String,
}

impl Link {
    /// Link to an entry of the API dictionary.
    pub fn internal(value: impl Into<String>) -> Self {
        Self {
            url: false,
            value: value.into(),
        }
    }

    /// Link to an external URL.
    pub fn external(value: impl Into<String>) -> Self {
        Self {
            url: true,
            value: value.into(),
        }
    }
}

/// One fragment of a C++ type string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeToken {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<Link>,
}

impl TypeToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            link: None,
        }
    }

    pub fn linked(value: impl Into<String>, link: Link) -> Self {
        Self {
            value: value.into(),
            link: Some(link),
        }
    }
}

/// Tokens whose concatenated values reproduce the original type text.
pub type TypeExpression = Vec<TypeToken>;

/// The type text a token sequence spells.
pub fn type_text(tokens: &[TypeToken]) -> String {
    tokens.iter().map(|token| token.value.as_str()).collect()
}
