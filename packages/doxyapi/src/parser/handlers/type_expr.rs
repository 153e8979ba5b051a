// Type Expressions
//
// `<type>` content to a token sequence. Each `<ref>` becomes a linked token
// pointing at its Doxygen ID; the ID is rewritten to a unique name once the
// whole tree has been walked.

use crate::api::{Link, TypeExpression, TypeToken};
use crate::xml::XmlElement;

/// Tokens of a `<type>`-like element. Outer whitespace is trimmed and
/// adjacent unlinked text is merged.
pub fn parse_type(element: &XmlElement) -> TypeExpression {
    let mut tokens = TypeExpression::new();

    push_text(&mut tokens, element.text.as_deref());
    for child in &element.children {
        match (child.tag.as_str(), child.attribute("refid")) {
            ("ref", Some(refid)) => {
                tokens.push(TypeToken::linked(child.text_content(), Link::internal(refid)))
            }
            _ => push_text(&mut tokens, Some(&child.text_content())),
        }
        push_text(&mut tokens, child.tail.as_deref());
    }

    trim_ends(&mut tokens);
    tokens
}

/// Parse an optional child such as `<type>` or `<defval>`; absent means
/// empty.
pub fn parse_child_type(element: &XmlElement, tag: &str) -> TypeExpression {
    element.child(tag).map(parse_type).unwrap_or_default()
}

fn push_text(tokens: &mut TypeExpression, text: Option<&str>) {
    let Some(text) = text.filter(|text| !text.is_empty()) else {
        return;
    };
    match tokens.last_mut() {
        Some(last) if last.link.is_none() => last.value.push_str(text),
        _ => tokens.push(TypeToken::new(text)),
    }
}

fn trim_ends(tokens: &mut TypeExpression) {
    if let Some(first) = tokens.first_mut().filter(|token| token.link.is_none()) {
        first.value = first.value.trim_start().to_string();
    }
    if let Some(last) = tokens.last_mut().filter(|token| token.link.is_none()) {
        last.value = last.value.trim_end().to_string();
    }
    tokens.retain(|token| !token.value.is_empty());
}
