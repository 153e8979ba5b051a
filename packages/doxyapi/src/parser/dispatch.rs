//! Dispatch Engine
//!
//! Maps an element's `(tag, attribute subset)` onto exactly one registered
//! handler and runs it with a [`HandlerContext`].

use crate::api::{Api, ParagraphElement};
use crate::error::{ApiError, Result};
use crate::location_mapper::PathMapper;
use crate::logging::Logger;
use crate::xml::XmlElement;
use indexmap::IndexMap;
use std::cell::RefCell;

/// What a handler produces: an API fragment or inline documentation.
#[derive(Debug, Clone, PartialEq)]
pub enum Parsed {
    Api(Api),
    Elements(Vec<ParagraphElement>),
}

impl Parsed {
    fn describe(&self) -> &'static str {
        match self {
            Parsed::Api(_) => "an API fragment",
            Parsed::Elements(_) => "paragraph elements",
        }
    }
}

pub type HandlerFn = fn(&XmlElement, &HandlerContext<'_>) -> Result<Parsed>;

/// Required attribute values, e.g. `[("kind", "function")]`.
pub type Predicate = Vec<(String, String)>;

struct Registration {
    name: &'static str,
    predicate: Predicate,
    handler: HandlerFn,
}

impl Registration {
    fn matches(&self, element: &XmlElement) -> bool {
        self.predicate
            .iter()
            .all(|(key, value)| element.attribute(key) == Some(value.as_str()))
    }

    fn describe(&self) -> String {
        describe_predicate(&self.predicate)
    }
}

fn describe_predicate(predicate: &Predicate) -> String {
    let pairs: Vec<String> = predicate
        .iter()
        .map(|(key, value)| format!("{}=\"{}\"", key, value))
        .collect();
    format!("{{{}}}", pairs.join(", "))
}

/// Handler table, keyed by tag in registration order.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: IndexMap<String, Vec<Registration>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `tag` elements whose attributes include every
    /// pair in `predicate`. Registering the same predicate twice for a tag
    /// is an error.
    pub fn register(
        &mut self,
        name: &'static str,
        tag: &str,
        predicate: &[(&str, &str)],
        handler: HandlerFn,
    ) -> Result<()> {
        let mut predicate: Predicate = predicate
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        predicate.sort();

        let registrations = self.handlers.entry(tag.to_string()).or_default();
        if registrations.iter().any(|r| r.predicate == predicate) {
            return Err(ApiError::DuplicateHandler {
                tag: tag.to_string(),
                predicate: describe_predicate(&predicate),
            });
        }
        registrations.push(Registration {
            name,
            predicate,
            handler,
        });
        Ok(())
    }

    /// The most specific matching handler for `element`.
    pub fn resolve(&self, element: &XmlElement) -> Result<HandlerFn> {
        self.find(element)?
            .map(|registration| registration.handler)
            .ok_or_else(|| ApiError::NoHandler {
                tag: element.tag.clone(),
                attributes: element.describe_attributes(),
                candidates: self
                    .handlers
                    .get(&element.tag)
                    .map(|registrations| registrations.iter().map(Registration::describe).collect())
                    .unwrap_or_default(),
            })
    }

    /// Name of the handler `element` resolves to, if any.
    pub fn handler_name(&self, element: &XmlElement) -> Result<Option<&'static str>> {
        Ok(self.find(element)?.map(|registration| registration.name))
    }

    pub fn supports(&self, element: &XmlElement) -> bool {
        matches!(self.find(element), Ok(Some(_)))
    }

    fn find(&self, element: &XmlElement) -> Result<Option<&Registration>> {
        let Some(registrations) = self.handlers.get(&element.tag) else {
            return Ok(None);
        };

        let matching: Vec<&Registration> =
            registrations.iter().filter(|r| r.matches(element)).collect();
        let Some(specificity) = matching.iter().map(|r| r.predicate.len()).max() else {
            return Ok(None);
        };

        let best: Vec<&Registration> = matching
            .into_iter()
            .filter(|r| r.predicate.len() == specificity)
            .collect();
        match best.as_slice() {
            [only] => Ok(Some(*only)),
            tied => Err(ApiError::AmbiguousHandler {
                tag: element.tag.clone(),
                predicates: tied.iter().map(|r| r.describe()).collect(),
            }),
        }
    }
}

/// Everything a handler may need. Handlers ignore the fields they don't use.
pub struct HandlerContext<'a> {
    pub dispatcher: &'a Dispatcher<'a>,
    pub logger: &'a dyn Logger,
    pub path_mapper: &'a dyn PathMapper,
    /// Scope of the compound whose members are being parsed.
    pub scope: Option<String>,
}

/// Runs handlers and owns the per-parse state: the active scope and the
/// Doxygen-ID table.
pub struct Dispatcher<'a> {
    registry: &'a HandlerRegistry,
    logger: &'a dyn Logger,
    path_mapper: &'a dyn PathMapper,
    scope: RefCell<Option<String>>,
    id_mapping: RefCell<IndexMap<String, String>>,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        registry: &'a HandlerRegistry,
        logger: &'a dyn Logger,
        path_mapper: &'a dyn PathMapper,
    ) -> Self {
        Self {
            registry,
            logger,
            path_mapper,
            scope: RefCell::new(None),
            id_mapping: RefCell::new(IndexMap::new()),
        }
    }

    pub fn logger(&self) -> &'a dyn Logger {
        self.logger
    }

    pub fn supports(&self, element: &XmlElement) -> bool {
        self.registry.supports(element)
    }

    /// Resolve and run the handler for `element`.
    pub fn parse(&'a self, element: &XmlElement) -> Result<Parsed> {
        let handler = self.registry.resolve(element)?;
        let context = HandlerContext {
            dispatcher: self,
            logger: self.logger,
            path_mapper: self.path_mapper,
            scope: self.scope.borrow().clone(),
        };
        handler(element, &context)
    }

    pub fn parse_api(&'a self, element: &XmlElement) -> Result<Api> {
        match self.parse(element)? {
            Parsed::Api(api) => Ok(api),
            other => Err(ApiError::UnexpectedOutput {
                tag: element.tag.clone(),
                expected: "an API fragment",
                found: other.describe(),
            }),
        }
    }

    pub fn parse_elements(&'a self, element: &XmlElement) -> Result<Vec<ParagraphElement>> {
        match self.parse(element)? {
            Parsed::Elements(elements) => Ok(elements),
            other => Err(ApiError::UnexpectedOutput {
                tag: element.tag.clone(),
                expected: "paragraph elements",
                found: other.describe(),
            }),
        }
    }

    /// Make `scope` the active scope until the returned guard drops.
    pub fn enter_scope(&self, scope: &str) -> Result<ScopeGuard<'_>> {
        let mut active = self.scope.borrow_mut();
        if let Some(current) = active.as_ref() {
            return Err(ApiError::ScopeReentered {
                active: current.clone(),
                requested: scope.to_string(),
            });
        }
        *active = Some(scope.to_string());
        Ok(ScopeGuard { slot: &self.scope })
    }

    pub fn current_scope(&self) -> Option<String> {
        self.scope.borrow().clone()
    }

    /// Remember that Doxygen ID `id` names the entity `unique_name`.
    pub fn record_id(&self, id: &str, unique_name: &str) {
        self.id_mapping
            .borrow_mut()
            .insert(id.to_string(), unique_name.to_string());
    }

    pub fn is_recorded(&self, id: &str) -> bool {
        self.id_mapping.borrow().contains_key(id)
    }

    pub fn id_mapping(&self) -> IndexMap<String, String> {
        self.id_mapping.borrow().clone()
    }
}

/// Resets the active scope when dropped, on every exit path.
pub struct ScopeGuard<'a> {
    slot: &'a RefCell<Option<String>>,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        *self.slot.borrow_mut() = None;
    }
}
