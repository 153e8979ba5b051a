// Template Parameters

use super::super::dispatch::HandlerContext;
use super::description::parameter_descriptions;
use super::type_expr::parse_type;
use crate::api::{type_text, TemplateParameter, TypeExpression, TypeToken};
use crate::error::Result;
use crate::xml::XmlElement;

/// Parameters of `element`'s `<templateparamlist>`, or `None` when it is not
/// a template.
pub fn parse_template_parameters(
    element: &XmlElement,
    context: &HandlerContext<'_>,
) -> Result<Option<Vec<TemplateParameter>>> {
    let Some(list) = element.child("templateparamlist") else {
        return Ok(None);
    };

    let descriptions = match element.child("detaileddescription") {
        Some(detailed) => parameter_descriptions(detailed, "templateparam", context)?,
        None => Default::default(),
    };

    let parameters = list
        .children_named("param")
        .map(|param| {
            let (type_, name) = split_declaration(param);
            let default = param
                .child("defval")
                .map(parse_type)
                .filter(|default| !default.is_empty());
            let description = descriptions.get(&name).cloned();
            TemplateParameter {
                type_,
                name,
                default,
                description,
            }
        })
        .collect();

    Ok(Some(parameters))
}

/// Type and name of a template `<param>`. Doxygen omits `<declname>` for
/// some templates and writes `typename T` into `<type>` instead.
fn split_declaration(param: &XmlElement) -> (TypeExpression, String) {
    let mut type_ = param.child("type").map(parse_type).unwrap_or_default();

    let declared = param
        .child("declname")
        .map(|name| name.text_content().trim().to_string())
        .filter(|name| !name.is_empty());
    if let Some(name) = declared {
        strip_trailing_name(&mut type_, &name);
        return (type_, name);
    }

    let text = type_text(&type_);
    let unlinked = type_.len() == 1 && type_[0].link.is_none();
    match text.rsplit_once(char::is_whitespace) {
        Some((kind, name)) if unlinked => (vec![TypeToken::new(kind.trim_end())], name.to_string()),
        _ => (type_, String::new()),
    }
}

/// Drop a trailing ` name` repeated at the end of the type text.
fn strip_trailing_name(type_: &mut TypeExpression, name: &str) {
    let Some(last) = type_.last_mut().filter(|token| token.link.is_none()) else {
        return;
    };
    if let Some(prefix) = last.value.strip_suffix(name) {
        if prefix.ends_with(char::is_whitespace) {
            last.value = prefix.trim_end().to_string();
        }
    }
    type_.retain(|token| !token.value.is_empty());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parse_str;

    #[test]
    fn type_and_name_from_type_only() {
        let param = parse_str("<param><type>typename T</type></param>").unwrap();
        let (type_, name) = split_declaration(&param);
        assert_eq!(type_text(&type_), "typename");
        assert_eq!(name, "T");
    }

    #[test]
    fn declared_name_is_not_repeated_in_type() {
        let param =
            parse_str("<param><type>class Cup</type><declname>Cup</declname></param>").unwrap();
        let (type_, name) = split_declaration(&param);
        assert_eq!(type_text(&type_), "class");
        assert_eq!(name, "Cup");
    }

    #[test]
    fn non_type_parameters_keep_their_type() {
        let param =
            parse_str("<param><type>std::size_t</type><declname>N</declname></param>").unwrap();
        let (type_, name) = split_declaration(&param);
        assert_eq!(type_text(&type_), "std::size_t");
        assert_eq!(name, "N");
    }
}
