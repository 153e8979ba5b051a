// Compound Handlers
//
// `<compounddef>` elements: namespaces, classes, structs and files. Members
// listed in `<sectiondef>` blocks are parsed with the compound's name as the
// active scope.

use super::super::dispatch::{HandlerContext, Parsed};
use super::description::parse_child_paragraphs;
use super::location::{parse_location, LocationPreference};
use super::template::parse_template_parameters;
use super::{access, record_id, required_text};
use crate::api::{merge, split_scope, Api, Class, Entity, File, Namespace};
use crate::error::Result;
use crate::xml::XmlElement;

/// `<compounddef kind="namespace">`
pub fn parse_namespace(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let scoped_name = required_text(element, "compoundname")?;
    record_id(element, &scoped_name, context);

    let mut members = inner_compounds(element);
    let (mut api, member_names) = parse_members(element, context, Some(&scoped_name))?;
    members.extend(member_names);

    let (scope, name) = split_scope(&scoped_name);
    let namespace = Namespace {
        name: name.to_string(),
        scope: scope.map(str::to_string),
        inline: element.flag("inline"),
        members,
        briefdescription: parse_child_paragraphs(element, "briefdescription", context)?,
        detaileddescription: parse_child_paragraphs(element, "detaileddescription", context)?,
    };

    merge(
        &mut api,
        Api::from([(scoped_name, Entity::Namespace(namespace))]),
    )?;
    Ok(Parsed::Api(api))
}

/// `<compounddef kind="class">` and `<compounddef kind="struct">`
pub fn parse_class(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let scoped_name = required_text(element, "compoundname")?;
    record_id(element, &scoped_name, context);

    let mut members = inner_compounds(element);
    let (mut api, member_names) = parse_members(element, context, Some(&scoped_name))?;
    members.extend(member_names);

    let (scope, name) = split_scope(&scoped_name);
    let class = Class {
        name: name.to_string(),
        scope: scope.map(str::to_string),
        access: access(element)?,
        location: parse_location(element, context.path_mapper, LocationPreference::Declaration)?,
        template_parameters: parse_template_parameters(element, context)?,
        members,
        briefdescription: parse_child_paragraphs(element, "briefdescription", context)?,
        detaileddescription: parse_child_paragraphs(element, "detaileddescription", context)?,
    };

    let entity = match element.attribute("kind") {
        Some("struct") => Entity::Struct(class),
        _ => Entity::Class(class),
    };
    merge(&mut api, Api::from([(scoped_name, entity)]))?;
    Ok(Parsed::Api(api))
}

/// `<compounddef kind="file">`: the file itself, keyed by its project
/// relative path, plus the global-scope members it declares.
pub fn parse_file(element: &XmlElement, context: &HandlerContext<'_>) -> Result<Parsed> {
    let name = required_text(element, "compoundname")?;
    let file = element.require_child("location")?.require_attribute("file")?;
    let path = context.path_mapper.to_project_relative_path(file)?;
    record_id(element, &path, context);

    let (mut api, _) = parse_members(element, context, None)?;
    merge(
        &mut api,
        Api::from([(path.clone(), Entity::File(File { name, path }))]),
    )?;
    Ok(Parsed::Api(api))
}

/// Doxygen IDs of nested classes and namespaces. They are rewritten to
/// unique names after the walk.
fn inner_compounds(element: &XmlElement) -> Vec<String> {
    element
        .children
        .iter()
        .filter(|child| child.tag == "innerclass" || child.tag == "innernamespace")
        .filter_map(|child| child.attribute("refid"))
        .map(str::to_string)
        .collect()
}

/// Parse every supported `<memberdef>` of every `<sectiondef>`, returning
/// the merged fragments and the member unique names in document order.
fn parse_members(
    element: &XmlElement,
    context: &HandlerContext<'_>,
    scope: Option<&str>,
) -> Result<(Api, Vec<String>)> {
    let _guard = match scope {
        Some(scope) => Some(context.dispatcher.enter_scope(scope)?),
        None => None,
    };

    let mut api = Api::new();
    let mut names = Vec::new();

    for section in element.children_named("sectiondef") {
        for member in section.children_named("memberdef") {
            if !context.dispatcher.supports(member) {
                context.logger.debug(&format!(
                    "Skipping unsupported member <memberdef kind=\"{}\"> in {}",
                    member.attribute("kind").unwrap_or_default(),
                    describe(element)
                ));
                continue;
            }
            if scope.is_none() && !is_global(member, context) {
                continue;
            }

            let fragment = context.dispatcher.parse_api(member)?;
            names.extend(fragment.keys().cloned());
            merge(&mut api, fragment)?;
        }
    }
    Ok((api, names))
}

/// Members of a file compound that belong there: not declared inside a
/// namespace or class, and not already listed by another file.
fn is_global(member: &XmlElement, context: &HandlerContext<'_>) -> bool {
    let qualified = member
        .child("qualifiedname")
        .map(XmlElement::text_content)
        .unwrap_or_default();
    if qualified.contains("::") {
        return false;
    }
    match member.attribute("id") {
        Some(id) if context.dispatcher.is_recorded(id) => {
            context
                .logger
                .debug(&format!("Member {} already listed by another file", id));
            false
        }
        _ => true,
    }
}

fn describe(element: &XmlElement) -> String {
    element
        .child("compoundname")
        .map(|name| name.text_content())
        .unwrap_or_else(|| element.tag.clone())
}
