//! Doxygen Parser
//!
//! Walks the compounds listed in Doxygen's `index.xml` and builds the API
//! dictionary. Entities refer to each other by Doxygen ID during the walk;
//! afterwards every recorded ID is replaced by its unique name and
//! references to anything outside the model are dropped.

pub mod dispatch;
pub mod handlers;

pub use dispatch::{Dispatcher, HandlerContext, HandlerFn, HandlerRegistry, Parsed, ScopeGuard};
pub use handlers::default_registry;

use crate::api::{for_each_link_mut, map_api_strings, merge, Api, Link};
use crate::error::Result;
use crate::location_mapper::PathMapper;
use crate::logging::Logger;
use crate::xml::{self, XmlElement};
use std::collections::BTreeSet;
use std::path::Path;

/// Doxygen XML to API dictionary.
pub struct DoxygenParser<'a> {
    registry: HandlerRegistry,
    logger: &'a dyn Logger,
    path_mapper: &'a dyn PathMapper,
}

impl<'a> DoxygenParser<'a> {
    /// Parser with the built-in handlers.
    pub fn new(logger: &'a dyn Logger, path_mapper: &'a dyn PathMapper) -> Result<Self> {
        Ok(Self::with_registry(default_registry()?, logger, path_mapper))
    }

    pub fn with_registry(
        registry: HandlerRegistry,
        logger: &'a dyn Logger,
        path_mapper: &'a dyn PathMapper,
    ) -> Self {
        Self {
            registry,
            logger,
            path_mapper,
        }
    }

    /// Parse the Doxygen XML output directory `xml_dir`.
    pub fn parse_index(&self, xml_dir: &Path) -> Result<Api> {
        let compounds = xml::load_index(xml_dir)?;
        self.logger.info(&format!(
            "Parsing {} compounds from {}",
            compounds.len(),
            xml_dir.display()
        ));
        self.parse_compounds(&compounds)
    }

    /// Parse already loaded `<compounddef>` elements. Compound kinds without
    /// a handler are logged and skipped.
    pub fn parse_compounds(&self, compounds: &[XmlElement]) -> Result<Api> {
        let dispatcher = Dispatcher::new(&self.registry, self.logger, self.path_mapper);
        let mut api = Api::new();

        for compound in compounds {
            if !dispatcher.supports(compound) {
                self.logger.info(&format!(
                    "Not supported: <{} kind=\"{}\"> {}",
                    compound.tag,
                    compound.attribute("kind").unwrap_or_default(),
                    compound
                        .child("compoundname")
                        .map(XmlElement::text_content)
                        .unwrap_or_default()
                ));
                continue;
            }
            merge(&mut api, dispatcher.parse_api(compound)?)?;
        }

        let id_mapping = dispatcher.id_mapping();
        let api = map_api_strings(&api, &|value| id_mapping.get(value).cloned())?;

        Ok(self.prune_references(api))
    }

    /// Drop members and internal links that name no entry of `api`.
    fn prune_references(&self, mut api: Api) -> Api {
        let keys: BTreeSet<String> = api.keys().cloned().collect();
        let logger = self.logger;

        for (unique_name, entity) in api.iter_mut() {
            if let Some(members) = entity.members_mut() {
                members.retain(|member| {
                    let known = keys.contains(member);
                    if !known {
                        logger.debug(&format!(
                            "Dropping member {} of {}: not part of the API",
                            member, unique_name
                        ));
                    }
                    known
                });
            }

            let mut unlink = |link: &mut Option<Link>| {
                if let Some(target) = link.as_ref().filter(|l| !l.url && !keys.contains(&l.value)) {
                    logger.debug(&format!(
                        "Dropping link to {} in {}: not part of the API",
                        target.value, unique_name
                    ));
                    *link = None;
                }
            };

            // The visitors only fail when the callback does.
            let _ = entity.try_for_each_type_expression(&mut |tokens| {
                for token in tokens.iter_mut() {
                    unlink(&mut token.link);
                }
                Ok(())
            });
            let _ = entity.try_for_each_paragraphs(&mut |paragraphs| {
                for_each_link_mut(paragraphs, &mut unlink);
                Ok(())
            });
        }
        api
    }
}
