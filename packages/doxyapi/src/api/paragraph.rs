//! Documentation content.

use super::types::Link;
use serde::{Deserialize, Serialize};

/// One unit of rendered documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParagraphElement {
    Text {
        content: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<Link>,
    },
    Code {
        content: String,
        is_block: bool,
    },
    /// Each item is itself a sequence of paragraphs.
    List {
        ordered: bool,
        items: Vec<Paragraphs>,
    },
}

impl ParagraphElement {
    pub fn text(content: impl Into<String>) -> Self {
        ParagraphElement::Text {
            content: content.into(),
            link: None,
        }
    }

    pub fn linked_text(content: impl Into<String>, link: Link) -> Self {
        ParagraphElement::Text {
            content: content.into(),
            link: Some(link),
        }
    }

    /// Code is a block when it spans several lines.
    pub fn code(content: impl Into<String>) -> Self {
        let content = content.into();
        let is_block = content.contains('\n');
        ParagraphElement::Code { content, is_block }
    }

    /// Text content when this is an unlinked text element.
    pub fn plain_text(&self) -> Option<&str> {
        match self {
            ParagraphElement::Text {
                content,
                link: None,
            } => Some(content),
            _ => None,
        }
    }
}

pub type Paragraph = Vec<ParagraphElement>;
pub type Paragraphs = Vec<Paragraph>;

/// Visit every link inside `paragraphs`, descending into list items.
pub fn for_each_link_mut(paragraphs: &mut Paragraphs, f: &mut dyn FnMut(&mut Option<Link>)) {
    for paragraph in paragraphs.iter_mut() {
        for element in paragraph.iter_mut() {
            match element {
                ParagraphElement::Text { link, .. } => f(link),
                ParagraphElement::Code { .. } => {}
                ParagraphElement::List { items, .. } => {
                    for item in items.iter_mut() {
                        for_each_link_mut(item, f);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_block_when_multiline() {
        assert_eq!(
            ParagraphElement::code("a\nb"),
            ParagraphElement::Code {
                content: "a\nb".to_string(),
                is_block: true
            }
        );
        assert_eq!(
            ParagraphElement::code("a b"),
            ParagraphElement::Code {
                content: "a b".to_string(),
                is_block: false
            }
        );
    }

    #[test]
    fn elements_serialize_with_kind_tag() {
        let json = serde_json::to_value(ParagraphElement::List {
            ordered: true,
            items: vec![vec![vec![ParagraphElement::text("one")]]],
        })
        .unwrap();

        assert_eq!(json["kind"], "list");
        assert_eq!(json["ordered"], true);
        assert_eq!(json["items"][0][0][0]["kind"], "text");
        assert_eq!(json["items"][0][0][0]["content"], "one");
    }
}
