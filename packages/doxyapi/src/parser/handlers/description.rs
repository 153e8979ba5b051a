// Documentation
//
// Converts Doxygen's documentation markup into paragraph elements. Text and
// tail are consumed in document order; whitespace runs collapse and purely
// blank text disappears. Markup without a handler is logged and omitted.

use super::super::dispatch::{HandlerContext, Parsed};
use crate::api::{Link, Paragraph, ParagraphElement, Paragraphs};
use crate::error::Result;
use crate::xml::XmlElement;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Characters that end a sentence rather than a URL.
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Paragraphs of a `briefdescription`, `detaileddescription`, `listitem` or
/// similar container. Paragraphs that end up empty are dropped.
pub fn parse_paragraphs(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Paragraphs> {
    let mut paragraphs = Paragraphs::new();
    for para in element.children_named("para") {
        let paragraph = context.dispatcher.parse_elements(para)?;
        if !paragraph.is_empty() {
            paragraphs.push(paragraph);
        }
    }
    Ok(paragraphs)
}

/// Paragraphs of an optional child; absent means empty.
pub fn parse_child_paragraphs(
    element: &XmlElement,
    tag: &str,
    context: &HandlerContext<'_>,
) -> Result<Paragraphs> {
    match element.child(tag) {
        Some(child) => parse_paragraphs(child, context),
        None => Ok(Paragraphs::new()),
    }
}

/// Descriptions from `<parameterlist kind="...">` entries anywhere below
/// `element`, keyed by parameter name.
pub fn parameter_descriptions(
    element: &XmlElement,
    kind: &str,
    context: &HandlerContext<'_>,
) -> Result<IndexMap<String, Paragraphs>> {
    let mut descriptions = IndexMap::new();

    for list in element.descendants_named("parameterlist") {
        if list.attribute("kind") != Some(kind) {
            continue;
        }
        for item in list.children_named("parameteritem") {
            let description = parse_child_paragraphs(item, "parameterdescription", context)?;
            for names in item.children_named("parameternamelist") {
                for name in names.children_named("parametername") {
                    descriptions.insert(name.text_content().trim().to_string(), description.clone());
                }
            }
        }
    }
    Ok(descriptions)
}

/// Paragraphs of every `<simplesect kind="return">` below `element`.
pub fn return_description(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Paragraphs> {
    let mut paragraphs = Paragraphs::new();
    for section in element.descendants_named("simplesect") {
        if section.attribute("kind") == Some("return") {
            paragraphs.extend(parse_paragraphs(section, context)?);
        }
    }
    Ok(paragraphs)
}

/// `<para>`, `<bold>`, `<emphasis>`: inline content in document order.
pub fn parse_inline(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    Ok(Parsed::Elements(inline_elements(element, context)?))
}

fn inline_elements(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Paragraph> {
    let mut elements = Paragraph::new();
    push_text(&mut elements, element.text.as_deref());

    for child in &element.children {
        if context.dispatcher.supports(child) {
            for parsed in context.dispatcher.parse_elements(child)? {
                push_element(&mut elements, parsed);
            }
        } else {
            context.logger.debug(&format!(
                "Unsupported documentation markup <{}> {} omitted",
                child.tag,
                child.describe_attributes()
            ));
        }
        push_text(&mut elements, child.tail.as_deref());
    }
    Ok(elements)
}

/// `<ref>`: text linked to a Doxygen ID.
pub fn parse_ref(element: &XmlElement, _context: &HandlerContext<'_>) -> Result<Parsed> {
    let refid = element.require_attribute("refid")?;
    let content = collapse_whitespace(&element.text_content());
    Ok(Parsed::Elements(vec![ParagraphElement::linked_text(
        content.trim(),
        Link::internal(refid),
    )]))
}

/// `<computeroutput>` and `<verbatim>`.
pub fn parse_code(element: &XmlElement, _context: &HandlerContext<'_>) -> Result<Parsed> {
    Ok(Parsed::Elements(vec![ParagraphElement::code(
        element.text_content(),
    )]))
}

/// `<programlisting>`: one line per `<codeline>`, `<sp/>` is a space.
pub fn parse_program_listing(element: &XmlElement, _context: &HandlerContext<'_>) -> Result<Parsed> {
    let lines: Vec<String> = element
        .children_named("codeline")
        .map(|line| {
            let mut content = String::new();
            push_code_text(line, &mut content);
            content
        })
        .collect();

    Ok(Parsed::Elements(vec![ParagraphElement::Code {
        content: lines.join("\n"),
        is_block: true,
    }]))
}

fn push_code_text(element: &XmlElement, content: &mut String) {
    if element.tag == "sp" {
        content.push(' ');
    }
    if let Some(text) = &element.text {
        content.push_str(text);
    }
    for child in &element.children {
        push_code_text(child, content);
        if let Some(tail) = &child.tail {
            content.push_str(tail);
        }
    }
}

/// `<ulink>`: external link. Sentence punctuation Doxygen swallowed into
/// the URL is split off into plain text.
pub fn parse_ulink(element: &XmlElement, _context: &HandlerContext<'_>) -> Result<Parsed> {
    let url = element.require_attribute("url")?;
    let content = collapse_whitespace(&element.text_content());
    let content = content.trim();

    let trimmed_url = url.trim_end_matches(URL_TRAILING_PUNCTUATION);
    let punctuation = &url[trimmed_url.len()..];

    let mut elements = Vec::new();
    if !punctuation.is_empty() && content.ends_with(punctuation) {
        let text = &content[..content.len() - punctuation.len()];
        elements.push(ParagraphElement::linked_text(text, Link::external(trimmed_url)));
        elements.push(ParagraphElement::text(punctuation));
    } else {
        elements.push(ParagraphElement::linked_text(content, Link::external(trimmed_url)));
    }
    Ok(Parsed::Elements(elements))
}

/// `<itemizedlist>` and `<orderedlist>`: each `<listitem>` is a sequence of
/// paragraphs.
pub fn parse_list(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let items = element
        .children_named("listitem")
        .map(|item| parse_paragraphs(item, context))
        .collect::<Result<Vec<_>>>()?;

    Ok(Parsed::Elements(vec![ParagraphElement::List {
        ordered: element.tag == "orderedlist",
        items,
    }]))
}

/// `<simplesect kind="see">`: the referenced content is flattened inline.
pub fn parse_see_also(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let mut elements = Paragraph::new();
    for para in element.children_named("para") {
        for parsed in context.dispatcher.parse_elements(para)? {
            push_element(&mut elements, parsed);
        }
    }
    Ok(Parsed::Elements(elements))
}

/// Sections consumed elsewhere (`return`, `parameterlist`) render nothing
/// inline.
pub fn parse_extracted(_element: &XmlElement, _context: &HandlerContext<'_>) -> Result<Parsed> {
    Ok(Parsed::Elements(vec![]))
}

/// Other `<simplesect>` kinds (note, warning, author...).
pub fn parse_other_section(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    context.logger.debug(&format!(
        "Unsupported section <simplesect kind=\"{}\"> omitted",
        element.attribute("kind").unwrap_or_default()
    ));
    Ok(Parsed::Elements(vec![]))
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

fn push_text(elements: &mut Paragraph, text: Option<&str>) {
    if let Some(text) = text {
        push_element(elements, ParagraphElement::text(text));
    }
}

/// Append `element`, merging plain text into a preceding plain text with a
/// single space.
fn push_element(elements: &mut Paragraph, element: ParagraphElement) {
    let content = match element {
        ParagraphElement::Text {
            content,
            link: None,
        } => collapse_whitespace(&content),
        other => {
            elements.push(other);
            return;
        }
    };

    let content = content.trim();
    if content.is_empty() {
        return;
    }

    match elements.last_mut() {
        Some(ParagraphElement::Text {
            content: previous,
            link: None,
        }) => {
            previous.push(' ');
            previous.push_str(content);
        }
        _ => elements.push(ParagraphElement::text(content)),
    }
}
