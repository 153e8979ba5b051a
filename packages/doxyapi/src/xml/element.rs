//! Element tree with lxml-style text and tail.
//!
//! `text` is the character data before the first child; each child's
//! `tail` is the character data between that child's end tag and the next
//! sibling. Mixed documentation markup relies on this ordering.

use crate::error::{ApiError, Result};
use indexmap::IndexMap;

/// XML element node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub text: Option<String>,
    pub tail: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(tag: impl Into<String>) -> Self {
        XmlElement {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Whether the attribute is Doxygen's boolean `yes`.
    pub fn flag(&self, name: &str) -> bool {
        self.attribute(name) == Some("yes")
    }

    pub fn require_attribute(&self, name: &str) -> Result<&str> {
        self.attribute(name)
            .ok_or_else(|| ApiError::missing_attribute(&self.tag, name))
    }

    /// First direct child with the given tag.
    pub fn child(&self, tag: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.tag == tag)
    }

    pub fn require_child(&self, tag: &str) -> Result<&XmlElement> {
        self.child(tag)
            .ok_or_else(|| ApiError::missing_child(&self.tag, tag))
    }

    /// Direct children with the given tag, in document order.
    pub fn children_named<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.tag == tag)
    }

    /// Descendants (not including `self`) with the given tag, depth first.
    pub fn descendants_named<'a>(&'a self, tag: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        self.collect_descendants(tag, &mut found);
        found
    }

    fn collect_descendants<'a>(&'a self, tag: &str, found: &mut Vec<&'a XmlElement>) {
        for child in &self.children {
            if child.tag == tag {
                found.push(child);
            }
            child.collect_descendants(tag, found);
        }
    }

    /// All character data inside the element, in document order. The
    /// element's own tail is not included.
    pub fn text_content(&self) -> String {
        let mut content = String::new();
        self.push_text_content(&mut content);
        content
    }

    fn push_text_content(&self, content: &mut String) {
        if let Some(text) = &self.text {
            content.push_str(text);
        }
        for child in &self.children {
            child.push_text_content(content);
            if let Some(tail) = &child.tail {
                content.push_str(tail);
            }
        }
    }

    /// `key=value` pairs for diagnostics.
    pub fn describe_attributes(&self) -> String {
        let pairs: Vec<String> = self
            .attributes
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", name, value))
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }
}
