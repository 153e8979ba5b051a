//! Link Mapper
//!
//! Annotates type expressions and documentation text with links. Each type
//! token is split into C++ fragments, every fragment is looked up in the
//! API (directly, then through the enclosing scopes) and then in the link
//! provider, and unlinked fragments are joined back together.

use crate::api::{Api, Entity, Link, Paragraph, ParagraphElement, Paragraphs, TypeExpression, TypeToken};
use crate::error::{ApiError, Result};
use crate::link_provider::LinkProvider;
use once_cell::sync::Lazy;
use regex::Regex;

/// Fragments that separate names in a C++ type. They are never linked.
pub const KEYWORDS: &[&str] = &["<", ">", ")", "(", "&", "*", ",", "const", "constexpr"];

static KEYWORD_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<|>|\)|\(|&|\*|,|\bconstexpr\b|\bconst\b").unwrap());

/// Punctuation that may trail a name in running text.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', ')'];

/// Split a type string into keywords, names and single edge whitespace.
/// Concatenating the result gives back `text`.
///
/// `"const std::function<void(uint32_t*, long double)>&"` becomes
/// `const`, ` `, `std::function`, `<`, `void`, `(`, `uint32_t`, `*`, `,`,
/// ` `, `long double`, `)`, `>`, `&`.
pub fn split_cpp_type(text: &str) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut last = 0;
    for keyword in KEYWORD_PATTERN.find_iter(text) {
        split_edge_whitespace(&text[last..keyword.start()], &mut fragments);
        fragments.push(keyword.as_str().to_string());
        last = keyword.end();
    }
    split_edge_whitespace(&text[last..], &mut fragments);
    fragments
}

/// Split one leading and one trailing space or tab off `item`.
fn split_edge_whitespace(item: &str, fragments: &mut Vec<String>) {
    let is_edge = |c: char| c == ' ' || c == '\t';
    let mut rest = item;

    if let Some(first) = rest.chars().next().filter(|c| is_edge(*c)) {
        fragments.push(first.to_string());
        rest = &rest[first.len_utf8()..];
    }
    let trailing = rest.chars().last().filter(|c| is_edge(*c));
    if let Some(last) = trailing {
        rest = &rest[..rest.len() - last.len_utf8()];
    }
    if !rest.is_empty() {
        fragments.push(rest.to_string());
    }
    if let Some(last) = trailing {
        fragments.push(last.to_string());
    }
}

/// Split every unlinked token into fragments. Linked tokens stay whole.
pub fn split_type_tokens(tokens: &[TypeToken]) -> TypeExpression {
    let mut split = TypeExpression::new();
    for token in tokens {
        if token.link.is_some() {
            split.push(token.clone());
        } else {
            split.extend(split_cpp_type(&token.value).into_iter().map(TypeToken::new));
        }
    }
    split
}

/// Merge runs of unlinked tokens, leaving linked tokens standalone.
pub fn join_type_tokens(tokens: TypeExpression) -> TypeExpression {
    let mut joined = TypeExpression::new();
    let mut pending = String::new();

    for token in tokens {
        if token.link.is_some() {
            if !pending.is_empty() {
                joined.push(TypeToken::new(std::mem::take(&mut pending)));
            }
            joined.push(token);
        } else {
            pending.push_str(&token.value);
        }
    }
    if !pending.is_empty() {
        joined.push(TypeToken::new(pending));
    }
    joined
}

/// `a::b::c`, `a::b`, `a`: the scope and each enclosing scope.
pub fn scope_chain(scope: &str) -> Vec<&str> {
    let mut chain = Vec::new();
    let mut current = scope;
    while !current.is_empty() {
        chain.push(current);
        current = current.rsplit_once("::").map(|(outer, _)| outer).unwrap_or("");
    }
    chain
}

/// Produces a link-annotated copy of an API.
pub struct LinkMapper<'a> {
    api: &'a Api,
    provider: &'a dyn LinkProvider,
}

impl<'a> LinkMapper<'a> {
    pub fn new(api: &'a Api, provider: &'a dyn LinkProvider) -> Self {
        Self { api, provider }
    }

    /// Map every `type` field and every brief/detailed description. The
    /// input API is left untouched.
    pub fn map(&self) -> Result<Api> {
        let mut mapped = self.api.clone();

        for entity in mapped.values_mut() {
            let scope = entity.scope().map(str::to_string);
            let scope = scope.as_deref();

            entity.try_for_each_type_field(&mut |tokens| {
                *tokens = self.map_type(tokens, scope)?;
                Ok(())
            })?;
            entity.try_for_each_description(&mut |paragraphs| {
                *paragraphs = self.map_paragraphs(paragraphs, scope)?;
                Ok(())
            })?;
        }
        Ok(mapped)
    }

    /// Split, resolve and rejoin one type expression.
    pub fn map_type(&self, tokens: &[TypeToken], scope: Option<&str>) -> Result<TypeExpression> {
        let mut split = split_type_tokens(tokens);
        for token in split.iter_mut() {
            match &token.link {
                Some(link) => self.check_link(link)?,
                None => token.link = self.find_link(&token.value, scope, true),
            }
        }
        Ok(join_type_tokens(split))
    }

    pub fn map_paragraphs(&self, paragraphs: &Paragraphs, scope: Option<&str>) -> Result<Paragraphs> {
        paragraphs
            .iter()
            .map(|paragraph| self.map_paragraph(paragraph, scope))
            .collect()
    }

    fn map_paragraph(&self, paragraph: &Paragraph, scope: Option<&str>) -> Result<Paragraph> {
        let mut words = Paragraph::new();
        for element in paragraph {
            match element {
                ParagraphElement::Text {
                    content,
                    link: None,
                } => words.extend(content.split_whitespace().map(ParagraphElement::text)),
                ParagraphElement::Text {
                    link: Some(link), ..
                } => {
                    self.check_link(link)?;
                    words.push(element.clone());
                }
                ParagraphElement::Code { .. } => words.push(element.clone()),
                ParagraphElement::List { ordered, items } => words.push(ParagraphElement::List {
                    ordered: *ordered,
                    items: items
                        .iter()
                        .map(|item| self.map_paragraphs(item, scope))
                        .collect::<Result<_>>()?,
                }),
            }
        }

        let mut linked = Paragraph::new();
        for element in words {
            let word = element
                .plain_text()
                .filter(|word| word.contains("::"))
                .map(str::to_string);
            match word {
                Some(word) => linked.extend(self.link_word(&word, scope)),
                None => linked.push(element),
            }
        }
        Ok(join_words(linked))
    }

    /// A word as a linked element. One trailing punctuation character is
    /// split off before the lookup and kept as plain text.
    fn link_word(&self, word: &str, scope: Option<&str>) -> Vec<ParagraphElement> {
        let bare = word.strip_suffix(TRAILING_PUNCTUATION).unwrap_or(word);
        let Some(link) = self.find_link(bare, scope, false) else {
            return vec![ParagraphElement::text(word)];
        };

        let mut elements = vec![ParagraphElement::linked_text(bare, link)];
        if bare.len() < word.len() {
            elements.push(ParagraphElement::text(&word[bare.len()..]));
        }
        elements
    }

    /// Exact key, then `scope::name` for each enclosing scope, then the
    /// provider. In type position a match on a function ends the dictionary
    /// lookup, since Doxygen sometimes confuses a type with a function of
    /// the same name.
    fn find_link(&self, name: &str, scope: Option<&str>, in_type: bool) -> Option<Link> {
        if name.trim().is_empty() || KEYWORDS.contains(&name) {
            return None;
        }

        let scoped = scope
            .map(scope_chain)
            .unwrap_or_default()
            .into_iter()
            .map(|scope| format!("{}::{}", scope, name));

        for candidate in std::iter::once(name.to_string()).chain(scoped) {
            match self.api.get(&candidate) {
                Some(Entity::Function(_)) if in_type => break,
                Some(_) => return Some(Link::internal(candidate)),
                None => {}
            }
        }
        self.provider.find_link(name)
    }

    fn check_link(&self, link: &Link) -> Result<()> {
        if link.url || self.api.contains_key(&link.value) {
            Ok(())
        } else {
            Err(ApiError::DanglingLink(link.value.clone()))
        }
    }
}

/// Join runs of unlinked text with single spaces.
fn join_words(elements: Paragraph) -> Paragraph {
    let mut joined = Paragraph::new();
    for element in elements {
        match (joined.last_mut(), element) {
            (
                Some(ParagraphElement::Text {
                    content: previous,
                    link: None,
                }),
                ParagraphElement::Text {
                    content,
                    link: None,
                },
            ) => {
                previous.push(' ');
                previous.push_str(&content);
            }
            (_, element) => joined.push(element),
        }
    }
    joined
}
