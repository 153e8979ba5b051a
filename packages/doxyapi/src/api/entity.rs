//! API entities.

use super::paragraph::Paragraphs;
use super::types::TypeExpression;
use crate::error::{ApiError, Result};
use serde::{Deserialize, Serialize};

/// Member visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Public,
    Protected,
    Private,
}

impl Access {
    /// Parse Doxygen's `prot` attribute.
    pub fn parse(tag: &str, value: &str) -> Result<Self> {
        match value {
            "public" => Ok(Access::Public),
            "protected" => Ok(Access::Protected),
            "private" => Ok(Access::Private),
            other => Err(ApiError::invalid_value(tag, "prot", other)),
        }
    }
}

/// Where an entity is declared, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub path: String,
    pub line: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    /// Body site, present only when it differs from the declaration site.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyLocation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyLocation {
    pub path: String,
    pub line_start: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_end: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    pub name: String,
    pub scope: Option<String>,
    pub inline: bool,
    pub members: Vec<String>,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

/// Shared by `class` and `struct`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub name: String,
    pub scope: Option<String>,
    pub access: Access,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_parameters: Option<Vec<TemplateParameter>>,
    pub members: Vec<String>,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enum {
    pub name: String,
    pub scope: Option<String>,
    pub access: Access,
    pub location: Location,
    pub values: Vec<EnumValue>,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

/// Shared by `typedef` and `using`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typedef {
    pub name: String,
    pub scope: Option<String>,
    pub access: Access,
    pub location: Location,
    #[serde(rename = "type")]
    pub type_: TypeExpression,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub scope: Option<String>,
    pub access: Access,
    pub location: Location,
    /// Absent for constructors and destructors.
    #[serde(rename = "return", default, skip_serializing_if = "Option::is_none")]
    pub return_: Option<ReturnValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_parameters: Option<Vec<TemplateParameter>>,
    pub trailing_return: bool,
    pub is_const: bool,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_explicit: bool,
    pub is_inline: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    pub parameters: Vec<Parameter>,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnValue {
    #[serde(rename = "type")]
    pub type_: TypeExpression,
    pub description: Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub type_: TypeExpression,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Paragraphs>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateParameter {
    #[serde(rename = "type")]
    pub type_: TypeExpression,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<TypeExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Paragraphs>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub scope: Option<String>,
    pub access: Access,
    pub location: Location,
    #[serde(rename = "type")]
    pub type_: TypeExpression,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub is_static: bool,
    pub is_mutable: bool,
    pub is_volatile: bool,
    pub is_const: bool,
    pub is_constexpr: bool,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

/// A preprocessor macro. Macros have no scope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Define {
    pub name: String,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<DefineParameter>>,
    pub briefdescription: Paragraphs,
    pub detaileddescription: Paragraphs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefineParameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Paragraphs>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub name: String,
    pub path: String,
}

/// One entry of the API dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    Namespace(Namespace),
    Class(Class),
    Struct(Class),
    Enum(Enum),
    Typedef(Typedef),
    Using(Typedef),
    Function(Function),
    Variable(Variable),
    Define(Define),
    File(File),
}

impl Entity {
    /// The `kind` tag this entity serializes with.
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Namespace(_) => "namespace",
            Entity::Class(_) => "class",
            Entity::Struct(_) => "struct",
            Entity::Enum(_) => "enum",
            Entity::Typedef(_) => "typedef",
            Entity::Using(_) => "using",
            Entity::Function(_) => "function",
            Entity::Variable(_) => "variable",
            Entity::Define(_) => "define",
            Entity::File(_) => "file",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Namespace(e) => &e.name,
            Entity::Class(e) | Entity::Struct(e) => &e.name,
            Entity::Enum(e) => &e.name,
            Entity::Typedef(e) | Entity::Using(e) => &e.name,
            Entity::Function(e) => &e.name,
            Entity::Variable(e) => &e.name,
            Entity::Define(e) => &e.name,
            Entity::File(e) => &e.name,
        }
    }

    /// Enclosing scope; `None` at global scope and for macros and files.
    pub fn scope(&self) -> Option<&str> {
        self.scope_slot().and_then(|scope| scope.as_deref())
    }

    pub fn scope_mut(&mut self) -> Option<&mut Option<String>> {
        match self {
            Entity::Namespace(e) => Some(&mut e.scope),
            Entity::Class(e) | Entity::Struct(e) => Some(&mut e.scope),
            Entity::Enum(e) => Some(&mut e.scope),
            Entity::Typedef(e) | Entity::Using(e) => Some(&mut e.scope),
            Entity::Function(e) => Some(&mut e.scope),
            Entity::Variable(e) => Some(&mut e.scope),
            Entity::Define(_) | Entity::File(_) => None,
        }
    }

    fn scope_slot(&self) -> Option<&Option<String>> {
        match self {
            Entity::Namespace(e) => Some(&e.scope),
            Entity::Class(e) | Entity::Struct(e) => Some(&e.scope),
            Entity::Enum(e) => Some(&e.scope),
            Entity::Typedef(e) | Entity::Using(e) => Some(&e.scope),
            Entity::Function(e) => Some(&e.scope),
            Entity::Variable(e) => Some(&e.scope),
            Entity::Define(_) | Entity::File(_) => None,
        }
    }

    pub fn members(&self) -> Option<&Vec<String>> {
        match self {
            Entity::Namespace(e) => Some(&e.members),
            Entity::Class(e) | Entity::Struct(e) => Some(&e.members),
            _ => None,
        }
    }

    pub fn members_mut(&mut self) -> Option<&mut Vec<String>> {
        match self {
            Entity::Namespace(e) => Some(&mut e.members),
            Entity::Class(e) | Entity::Struct(e) => Some(&mut e.members),
            _ => None,
        }
    }

    /// Visit every field serialized under the key `type`.
    pub fn try_for_each_type_field(
        &mut self,
        f: &mut dyn FnMut(&mut TypeExpression) -> Result<()>,
    ) -> Result<()> {
        match self {
            Entity::Class(e) | Entity::Struct(e) => {
                for parameter in e.template_parameters.iter_mut().flatten() {
                    f(&mut parameter.type_)?;
                }
            }
            Entity::Typedef(e) | Entity::Using(e) => f(&mut e.type_)?,
            Entity::Variable(e) => f(&mut e.type_)?,
            Entity::Function(e) => {
                if let Some(return_) = e.return_.as_mut() {
                    f(&mut return_.type_)?;
                }
                for parameter in e.parameters.iter_mut() {
                    f(&mut parameter.type_)?;
                }
                for parameter in e.template_parameters.iter_mut().flatten() {
                    f(&mut parameter.type_)?;
                }
            }
            Entity::Namespace(_) | Entity::Enum(_) | Entity::Define(_) | Entity::File(_) => {}
        }
        Ok(())
    }

    /// Visit every type expression, including template parameter defaults.
    pub fn try_for_each_type_expression(
        &mut self,
        f: &mut dyn FnMut(&mut TypeExpression) -> Result<()>,
    ) -> Result<()> {
        self.try_for_each_type_field(f)?;
        let template_parameters = match self {
            Entity::Class(e) | Entity::Struct(e) => e.template_parameters.as_mut(),
            Entity::Function(e) => e.template_parameters.as_mut(),
            _ => None,
        };
        for parameter in template_parameters.into_iter().flatten() {
            if let Some(default) = parameter.default.as_mut() {
                f(default)?;
            }
        }
        Ok(())
    }

    /// Visit every `briefdescription` and `detaileddescription`, including
    /// those of enum values.
    pub fn try_for_each_description(
        &mut self,
        f: &mut dyn FnMut(&mut Paragraphs) -> Result<()>,
    ) -> Result<()> {
        let (brief, detailed) = match self {
            Entity::Namespace(e) => (&mut e.briefdescription, &mut e.detaileddescription),
            Entity::Class(e) | Entity::Struct(e) => {
                (&mut e.briefdescription, &mut e.detaileddescription)
            }
            Entity::Enum(e) => {
                for value in e.values.iter_mut() {
                    f(&mut value.briefdescription)?;
                    f(&mut value.detaileddescription)?;
                }
                (&mut e.briefdescription, &mut e.detaileddescription)
            }
            Entity::Typedef(e) | Entity::Using(e) => {
                (&mut e.briefdescription, &mut e.detaileddescription)
            }
            Entity::Function(e) => (&mut e.briefdescription, &mut e.detaileddescription),
            Entity::Variable(e) => (&mut e.briefdescription, &mut e.detaileddescription),
            Entity::Define(e) => (&mut e.briefdescription, &mut e.detaileddescription),
            Entity::File(_) => return Ok(()),
        };
        f(brief)?;
        f(detailed)
    }

    /// Visit every paragraph sequence: descriptions plus parameter, return
    /// and template parameter documentation.
    pub fn try_for_each_paragraphs(
        &mut self,
        f: &mut dyn FnMut(&mut Paragraphs) -> Result<()>,
    ) -> Result<()> {
        self.try_for_each_description(f)?;
        match self {
            Entity::Class(e) | Entity::Struct(e) => {
                for parameter in e.template_parameters.iter_mut().flatten() {
                    if let Some(description) = parameter.description.as_mut() {
                        f(description)?;
                    }
                }
            }
            Entity::Function(e) => {
                if let Some(return_) = e.return_.as_mut() {
                    f(&mut return_.description)?;
                }
                for description in e.parameters.iter_mut().filter_map(|p| p.description.as_mut()) {
                    f(description)?;
                }
                for parameter in e.template_parameters.iter_mut().flatten() {
                    if let Some(description) = parameter.description.as_mut() {
                        f(description)?;
                    }
                }
            }
            Entity::Define(e) => {
                for parameter in e.parameters.iter_mut().flatten() {
                    if let Some(description) = parameter.description.as_mut() {
                        f(description)?;
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }
}
