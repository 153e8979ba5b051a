// Member Handlers
//
// `<memberdef>` elements: functions, variables, typedefs, enums and macros.
// Members take their scope from the compound being parsed.

use super::super::dispatch::{HandlerContext, Parsed};
use super::description::{parameter_descriptions, parse_child_paragraphs, return_description};
use super::location::{parse_location, LocationPreference};
use super::template::parse_template_parameters;
use super::type_expr::parse_child_type;
use super::{access, record_id, required_text, single};
use crate::api::{
    qualified_name, type_text, Define, DefineParameter, Entity, Enum, EnumValue, Function,
    Parameter, Paragraphs, ReturnValue, TypeExpression, TypeToken, Typedef, Variable,
};
use crate::error::Result;
use crate::xml::XmlElement;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static QUALIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:constexpr|const)\b").unwrap());

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Specifiers some Doxygen versions write in front of the return type.
static LEADING_SPECIFIERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:(?:virtual|static|inline|explicit|friend)\s+)+").unwrap());

/// Trailers that can follow a trailing return type in `<argsstring>`.
static TRAILING_SPECIFIERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\s*(?:override|final|=\s*0|=\s*default|=\s*delete))+\s*$").unwrap());

/// `<memberdef kind="function">`
pub fn parse_function(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let name = required_text(element, "name")?;
    let detailed = element.child("detaileddescription");

    let descriptions = match detailed {
        Some(detailed) => parameter_descriptions(detailed, "param", context)?,
        None => IndexMap::new(),
    };
    let parameters: Vec<Parameter> = element
        .children_named("param")
        .map(|param| {
            let name = param
                .child("declname")
                .map(|name| name.text_content().trim().to_string())
                .filter(|name| !name.is_empty());
            let description = name.as_ref().and_then(|name| descriptions.get(name)).cloned();
            Parameter {
                type_: parse_child_type(param, "type"),
                name,
                description,
            }
        })
        .collect();

    let template_parameters = parse_template_parameters(element, context)?;
    let is_const = element.flag("const");

    let mut return_type = parse_child_type(element, "type");
    strip_leading_specifiers(&mut return_type);

    let arguments = element
        .child("argsstring")
        .map(XmlElement::text_content)
        .unwrap_or_default();
    let trailing_return = type_text(&return_type) == "auto" && arguments.contains("->");
    if trailing_return {
        return_type = trailing_return_type(&arguments);
    }

    let is_destructor = name.starts_with('~');
    let is_constructor =
        !is_destructor && return_type.is_empty() && !name.starts_with("operator");

    let return_ = if return_type.is_empty() {
        None
    } else {
        let description = match detailed {
            Some(detailed) => return_description(detailed, context)?,
            None => Paragraphs::new(),
        };
        Some(ReturnValue {
            type_: return_type,
            description,
        })
    };

    let unique_name = function_unique_name(
        context.scope.as_deref(),
        &name,
        &parameters,
        is_const,
        template_parameters
            .as_ref()
            .map(|parameters| parameters.iter().map(|p| &p.type_).collect()),
    );
    record_id(element, &unique_name, context);

    let function = Function {
        scope: context.scope.clone(),
        access: access(element)?,
        location: parse_location(element, context.path_mapper, LocationPreference::Declaration)?,
        return_,
        template_parameters,
        trailing_return,
        is_const,
        is_static: element.flag("static"),
        is_virtual: element
            .attribute("virt")
            .is_some_and(|virt| virt != "non-virtual"),
        is_explicit: element.flag("explicit"),
        is_inline: element.flag("inline"),
        is_constructor,
        is_destructor,
        parameters,
        briefdescription: parse_child_paragraphs(element, "briefdescription", context)?,
        detaileddescription: parse_child_paragraphs(element, "detaileddescription", context)?,
        name,
    };
    Ok(single(unique_name, Entity::Function(function)))
}

/// `scope::name(types)const<template types>` with all whitespace removed.
/// Signatures that differ only in whitespace therefore collide.
fn function_unique_name(
    scope: Option<&str>,
    name: &str,
    parameters: &[Parameter],
    is_const: bool,
    template_types: Option<Vec<&TypeExpression>>,
) -> String {
    let mut unique_name = qualified_name(scope, name);

    let types: Vec<String> = parameters.iter().map(|p| type_text(&p.type_)).collect();
    unique_name.push('(');
    unique_name.push_str(&types.join(","));
    unique_name.push(')');

    if is_const {
        unique_name.push_str("const");
    }

    if let Some(template_types) = template_types {
        let types: Vec<String> = template_types.into_iter().map(|t| type_text(t)).collect();
        unique_name.push('<');
        unique_name.push_str(&types.join(","));
        unique_name.push('>');
    }

    unique_name.split_whitespace().collect()
}

fn strip_leading_specifiers(type_: &mut TypeExpression) {
    if let Some(first) = type_.first_mut().filter(|token| token.link.is_none()) {
        first.value = LEADING_SPECIFIERS.replace(&first.value, "").into_owned();
    }
    type_.retain(|token| !token.value.is_empty());
}

/// The type written after `->` in `(args) const -> type`.
fn trailing_return_type(arguments: &str) -> TypeExpression {
    let Some((_, declared)) = arguments.rsplit_once("->") else {
        return TypeExpression::new();
    };
    let declared = TRAILING_SPECIFIERS.replace(declared, "");
    let declared = declared.trim();
    if declared.is_empty() {
        TypeExpression::new()
    } else {
        vec![TypeToken::new(declared)]
    }
}

/// `<memberdef kind="variable">`
pub fn parse_variable(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let name = required_text(element, "name")?;
    let unique_name = qualified_name(context.scope.as_deref(), &name);
    record_id(element, &unique_name, context);

    let mut type_ = parse_child_type(element, "type");
    let (is_const, is_constexpr) = strip_qualifiers(&mut type_);

    let variable = Variable {
        scope: context.scope.clone(),
        access: access(element)?,
        location: parse_location(element, context.path_mapper, LocationPreference::Declaration)?,
        type_,
        value: initializer(element),
        is_static: element.flag("static"),
        is_mutable: element.flag("mutable"),
        is_volatile: element.flag("volatile"),
        is_const,
        is_constexpr: is_constexpr || element.flag("constexpr"),
        briefdescription: parse_child_paragraphs(element, "briefdescription", context)?,
        detaileddescription: parse_child_paragraphs(element, "detaileddescription", context)?,
        name,
    };
    Ok(single(unique_name, Entity::Variable(variable)))
}

/// Remove `const`/`constexpr` from unlinked tokens and report which were
/// present. Whitespace left behind collapses to single spaces, the ends of
/// the expression are trimmed and emptied tokens are dropped.
fn strip_qualifiers(type_: &mut TypeExpression) -> (bool, bool) {
    let mut is_const = false;
    let mut is_constexpr = false;

    for token in type_.iter_mut().filter(|token| token.link.is_none()) {
        for qualifier in QUALIFIER.find_iter(&token.value) {
            match qualifier.as_str() {
                "constexpr" => is_constexpr = true,
                _ => is_const = true,
            }
        }
        let stripped = QUALIFIER.replace_all(&token.value, "");
        token.value = WHITESPACE.replace_all(&stripped, " ").into_owned();
    }

    if let Some(first) = type_.first_mut().filter(|token| token.link.is_none()) {
        first.value = first.value.trim_start().to_string();
    }
    if let Some(last) = type_.last_mut().filter(|token| token.link.is_none()) {
        last.value = last.value.trim_end().to_string();
    }
    type_.retain(|token| !token.value.is_empty());

    (is_const, is_constexpr)
}

/// `<initializer>` without its leading `=`.
fn initializer(element: &XmlElement) -> Option<String> {
    let text = element.child("initializer")?.text_content();
    let text = text.trim();
    let text = text.strip_prefix('=').unwrap_or(text).trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// `<memberdef kind="typedef">`, which is a `using` alias when its
/// definition says so.
pub fn parse_typedef(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let name = required_text(element, "name")?;
    let unique_name = qualified_name(context.scope.as_deref(), &name);
    record_id(element, &unique_name, context);

    let is_using = element
        .child("definition")
        .is_some_and(|definition| definition.text_content().trim_start().starts_with("using"));

    let typedef = Typedef {
        scope: context.scope.clone(),
        access: access(element)?,
        location: parse_location(element, context.path_mapper, LocationPreference::Declaration)?,
        type_: parse_child_type(element, "type"),
        briefdescription: parse_child_paragraphs(element, "briefdescription", context)?,
        detaileddescription: parse_child_paragraphs(element, "detaileddescription", context)?,
        name,
    };

    let entity = if is_using {
        Entity::Using(typedef)
    } else {
        Entity::Typedef(typedef)
    };
    Ok(single(unique_name, entity))
}

/// `<memberdef kind="enum">`. References to an enumerator link to its enum.
pub fn parse_enum(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let name = required_text(element, "name")?;
    let unique_name = qualified_name(context.scope.as_deref(), &name);
    record_id(element, &unique_name, context);

    let values = element
        .children_named("enumvalue")
        .map(|value| -> Result<EnumValue> {
            record_id(value, &unique_name, context);
            Ok(EnumValue {
                name: required_text(value, "name")?,
                value: initializer(value),
                briefdescription: parse_child_paragraphs(value, "briefdescription", context)?,
                detaileddescription: parse_child_paragraphs(value, "detaileddescription", context)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let enumeration = Enum {
        scope: context.scope.clone(),
        access: access(element)?,
        location: parse_location(element, context.path_mapper, LocationPreference::Declaration)?,
        values,
        briefdescription: parse_child_paragraphs(element, "briefdescription", context)?,
        detaileddescription: parse_child_paragraphs(element, "detaileddescription", context)?,
        name,
    };
    Ok(single(unique_name, Entity::Enum(enumeration)))
}

/// `<memberdef kind="define">`. Macros are keyed by their bare name and
/// located at their body, since Doxygen reports the include guard use site
/// as the declaration.
pub fn parse_define(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let name = required_text(element, "name")?;
    record_id(element, &name, context);

    let descriptions = match element.child("detaileddescription") {
        Some(detailed) => parameter_descriptions(detailed, "param", context)?,
        None => IndexMap::new(),
    };
    let params: Vec<&XmlElement> = element.children_named("param").collect();
    let parameters = (!params.is_empty()).then(|| {
        params
            .iter()
            .filter_map(|param| param.child("defname"))
            .map(|defname| defname.text_content().trim().to_string())
            .filter(|name| !name.is_empty())
            .map(|name| DefineParameter {
                description: descriptions.get(&name).cloned(),
                name,
            })
            .collect()
    });

    let initializer = element
        .child("initializer")
        .map(|initializer| initializer.text_content().trim().to_string())
        .filter(|initializer| !initializer.is_empty());

    let define = Define {
        location: parse_location(element, context.path_mapper, LocationPreference::Body)?,
        initializer,
        parameters,
        briefdescription: parse_child_paragraphs(element, "briefdescription", context)?,
        detaileddescription: parse_child_paragraphs(element, "detaileddescription", context)?,
        name: name.clone(),
    };
    Ok(single(name, Entity::Define(define)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Link;

    fn tokens(values: &[&str]) -> TypeExpression {
        values.iter().map(|value| TypeToken::new(*value)).collect()
    }

    #[test]
    fn unique_name_strips_all_whitespace() {
        let parameters = vec![
            Parameter {
                type_: vec![
                    TypeToken::new("const "),
                    TypeToken::linked("Heat", Link::internal("x")),
                    TypeToken::new(" &"),
                ],
                name: Some("heat".to_string()),
                description: None,
            },
            Parameter {
                type_: tokens(&["int"]),
                name: None,
                description: None,
            },
        ];

        let unique_name =
            function_unique_name(Some("coffee::Machine"), "set", &parameters, true, None);
        assert_eq!(unique_name, "coffee::Machine::set(constHeat&,int)const");
    }

    #[test]
    fn unique_name_appends_template_types() {
        let typename = tokens(&["typename"]);
        let unique_name =
            function_unique_name(None, "make", &[], false, Some(vec![&typename, &typename]));
        assert_eq!(unique_name, "make()<typename,typename>");
    }

    #[test]
    fn qualifiers_become_flags() {
        let mut type_ = tokens(&["static  constexpr   std::uint32_t"]);
        assert_eq!(strip_qualifiers(&mut type_), (false, true));
        assert_eq!(type_, tokens(&["static std::uint32_t"]));

        let mut type_ = vec![
            TypeToken::new("const "),
            TypeToken::linked("Heat", Link::internal("x")),
        ];
        assert_eq!(strip_qualifiers(&mut type_), (true, false));
        assert_eq!(type_, vec![TypeToken::linked("Heat", Link::internal("x"))]);
    }

    #[test]
    fn const_inside_identifiers_is_kept() {
        let mut type_ = tokens(&["constant_t"]);
        assert_eq!(strip_qualifiers(&mut type_), (false, false));
        assert_eq!(type_, tokens(&["constant_t"]));
    }

    #[test]
    fn trailing_return_type_follows_the_arrow() {
        assert_eq!(
            trailing_return_type("(int level) const -> std::uint32_t override"),
            tokens(&["std::uint32_t"])
        );
        assert!(trailing_return_type("(int level)").is_empty());
    }

    #[test]
    fn leading_specifiers_are_dropped() {
        let mut type_ = tokens(&["virtual void"]);
        strip_leading_specifiers(&mut type_);
        assert_eq!(type_, tokens(&["void"]));
    }

    #[test]
    fn initializer_drops_assignment() {
        let element = XmlElement::new("enumvalue")
            .with_child(XmlElement::new("initializer").with_text("= 10"));
        assert_eq!(initializer(&element).as_deref(), Some("10"));
        assert_eq!(initializer(&XmlElement::new("enumvalue")), None);
    }
}
