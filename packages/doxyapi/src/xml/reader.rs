//! quick-xml event stream to [`XmlElement`] tree.

use super::element::XmlElement;
use crate::error::{ApiError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fs;
use std::path::Path;

/// Parse the XML file at `path`.
pub fn parse_file(path: &Path) -> Result<XmlElement> {
    let content = fs::read_to_string(path).map_err(|e| ApiError::io(path, e))?;
    parse_document(&content, path)
}

/// Parse an in-memory XML document.
pub fn parse_str(content: &str) -> Result<XmlElement> {
    parse_document(content, Path::new("<memory>"))
}

fn parse_document(content: &str, path: &Path) -> Result<XmlElement> {
    let xml_error = |message: String| ApiError::Xml {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(false);

    // Open elements, innermost last.
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            xml_error(format!("{} at position {}", e, reader.error_position()))
        })?;

        match event {
            Event::Start(start) => {
                stack.push(open_element(&start).map_err(xml_error)?);
            }
            Event::Empty(start) => {
                let element = open_element(&start).map_err(xml_error)?;
                close_element(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| xml_error("unbalanced end tag".to_string()))?;
                close_element(element, &mut stack, &mut root);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| xml_error(e.to_string()))?;
                append_text(&mut stack, &text);
            }
            Event::CData(data) => {
                let data = data.into_inner();
                append_text(&mut stack, &String::from_utf8_lossy(&data));
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and doctypes
            // carry nothing the API needs.
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(format!("unclosed element <{}>", open.tag)));
    }
    root.ok_or_else(|| xml_error("document has no root element".to_string()))
}

fn open_element(start: &BytesStart<'_>) -> std::result::Result<XmlElement, String> {
    let mut element = XmlElement::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let name = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|e| e.to_string())?;
        element.attributes.insert(name, value.into_owned());
    }
    Ok(element)
}

fn close_element(element: XmlElement, stack: &mut [XmlElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Character data goes to the tail of the last closed child, or to the
/// text of the open element if it has no children yet.
fn append_text(stack: &mut [XmlElement], text: &str) {
    let Some(parent) = stack.last_mut() else {
        return;
    };
    let slot = match parent.children.last_mut() {
        Some(child) => &mut child.tail,
        None => &mut parent.text,
    };
    slot.get_or_insert_with(String::new).push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_content_keeps_text_and_tail() {
        let root = parse_str(
            r#"<?xml version="1.0"?>
<para>Use <ref refid="a" kindref="compound">A</ref> &amp; friends.</para>"#,
        )
        .unwrap();

        assert_eq!(root.tag, "para");
        assert_eq!(root.text.as_deref(), Some("Use "));
        let reference = &root.children[0];
        assert_eq!(reference.attribute("refid"), Some("a"));
        assert_eq!(reference.text.as_deref(), Some("A"));
        assert_eq!(reference.tail.as_deref(), Some(" & friends."));
    }

    #[test]
    fn empty_elements_become_children() {
        let root = parse_str(r#"<memberdef><location file="a.h" line="3"/></memberdef>"#).unwrap();
        let location = root.require_child("location").unwrap();
        assert_eq!(location.attribute("line"), Some("3"));
        assert!(location.children.is_empty());
    }

    #[test]
    fn mismatched_tags_are_reported() {
        let err = parse_str("<a><b></a>").unwrap_err();
        assert!(matches!(err, ApiError::Xml { .. }));
    }

    #[test]
    fn cdata_is_text() {
        let root = parse_str("<c><![CDATA[a < b]]></c>").unwrap();
        assert_eq!(root.text_content(), "a < b");
    }
}
