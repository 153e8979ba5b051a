//! Doxygen Handlers
//!
//! One handler per `(tag, attribute subset)` the parser understands.
//! [`default_registry`] wires them into a [`HandlerRegistry`].

pub mod compound;
pub mod description;
pub mod location;
pub mod member;
pub mod template;
pub mod type_expr;

use super::dispatch::{HandlerContext, HandlerRegistry, Parsed};
use crate::api::{Access, Api, Entity};
use crate::error::Result;
use crate::xml::XmlElement;

/// Registry with every built-in handler.
pub fn default_registry() -> Result<HandlerRegistry> {
    let mut registry = HandlerRegistry::new();

    // Compounds
    registry.register("namespace", "compounddef", &[("kind", "namespace")], compound::parse_namespace)?;
    registry.register("class", "compounddef", &[("kind", "class")], compound::parse_class)?;
    registry.register("struct", "compounddef", &[("kind", "struct")], compound::parse_class)?;
    registry.register("file", "compounddef", &[("kind", "file")], compound::parse_file)?;

    // Members
    registry.register("function", "memberdef", &[("kind", "function")], member::parse_function)?;
    registry.register("variable", "memberdef", &[("kind", "variable")], member::parse_variable)?;
    registry.register("typedef", "memberdef", &[("kind", "typedef")], member::parse_typedef)?;
    registry.register("enum", "memberdef", &[("kind", "enum")], member::parse_enum)?;
    registry.register("define", "memberdef", &[("kind", "define")], member::parse_define)?;

    // Documentation markup
    registry.register("para", "para", &[], description::parse_inline)?;
    registry.register("bold", "bold", &[], description::parse_inline)?;
    registry.register("emphasis", "emphasis", &[], description::parse_inline)?;
    registry.register("ref", "ref", &[], description::parse_ref)?;
    registry.register("computeroutput", "computeroutput", &[], description::parse_code)?;
    registry.register("verbatim", "verbatim", &[], description::parse_code)?;
    registry.register("programlisting", "programlisting", &[], description::parse_program_listing)?;
    registry.register("ulink", "ulink", &[], description::parse_ulink)?;
    registry.register("itemizedlist", "itemizedlist", &[], description::parse_list)?;
    registry.register("orderedlist", "orderedlist", &[], description::parse_list)?;
    registry.register("see", "simplesect", &[("kind", "see")], description::parse_see_also)?;
    registry.register("return", "simplesect", &[("kind", "return")], description::parse_extracted)?;
    registry.register("simplesect", "simplesect", &[], description::parse_other_section)?;
    registry.register("parameterlist", "parameterlist", &[], description::parse_extracted)?;

    Ok(registry)
}

/// Trimmed text of a required child such as `<name>` or `<compoundname>`.
fn required_text(element: &XmlElement, tag: &str) -> Result<String> {
    Ok(element.require_child(tag)?.text_content().trim().to_string())
}

/// `prot`, defaulting to public where Doxygen leaves it out.
fn access(element: &XmlElement) -> Result<Access> {
    match element.attribute("prot") {
        Some(prot) => Access::parse(&element.tag, prot),
        None => Ok(Access::Public),
    }
}

/// Record `element`'s Doxygen ID, if it has one.
fn record_id(element: &XmlElement, unique_name: &str, context: &HandlerContext<'_>) {
    if let Some(id) = element.attribute("id") {
        context.dispatcher.record_id(id, unique_name);
    }
}

fn single(unique_name: String, entity: Entity) -> Parsed {
    Parsed::Api(Api::from([(unique_name, entity)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_has_no_conflicts() {
        let registry = default_registry().unwrap();

        let function = XmlElement::new("memberdef").with_attribute("kind", "function");
        assert_eq!(registry.handler_name(&function).unwrap(), Some("function"));

        let note = XmlElement::new("simplesect").with_attribute("kind", "note");
        assert_eq!(registry.handler_name(&note).unwrap(), Some("simplesect"));

        let see = XmlElement::new("simplesect").with_attribute("kind", "see");
        assert_eq!(registry.handler_name(&see).unwrap(), Some("see"));

        let friend = XmlElement::new("memberdef").with_attribute("kind", "friend");
        assert!(!registry.supports(&friend));
    }
}
