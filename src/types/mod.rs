//! @acp:module "Types"
//! @acp:summary "Semantic descriptor of Go type expressions"
//! @acp:domain codegen
//! @acp:layer model
//!
//! `Raw` keeps the literal text of constructs the model does not enumerate
//! (channels, inline structs, generics, ...), so every valid type renders
//! back to what was written.

mod resolve;

pub use resolve::TypeResolver;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::code::{write_params, write_results, Import, Parameter};

/// @acp:summary "Tagged Go type: exactly one shape is populated"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Type {
    /// Bare identifier: `int`, `User`
    Simple(String),
    /// `pkg.Name` whose qualifier matched an import
    Imported { name: String, import: Import },
    Pointer(Box<Type>),
    /// Slice when `len` is `None`, fixed array otherwise
    Array {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        len: Option<String>,
        elem: Box<Type>,
    },
    Map { key: Box<Type>, value: Box<Type> },
    Function {
        params: Vec<Parameter>,
        results: Vec<Parameter>,
    },
    Raw(String),
}

impl Type {
    pub fn simple(name: impl Into<String>) -> Self {
        Type::Simple(name.into())
    }

    pub fn imported(name: impl Into<String>, import: Import) -> Self {
        Type::Imported {
            name: name.into(),
            import,
        }
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer(Box::new(elem))
    }

    pub fn slice(elem: Type) -> Self {
        Type::Array {
            len: None,
            elem: Box::new(elem),
        }
    }

    pub fn array(len: impl Into<String>, elem: Type) -> Self {
        Type::Array {
            len: Some(len.into()),
            elem: Box::new(elem),
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn function(params: Vec<Parameter>, results: Vec<Parameter>) -> Self {
        Type::Function { params, results }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Type::Raw(text.into())
    }

    pub fn is_raw(&self) -> bool {
        matches!(self, Type::Raw(_))
    }

    /// Unqualified type name behind pointers, as Go names embedded fields.
    pub fn base_name(&self) -> Option<&str> {
        match self {
            Type::Simple(name) | Type::Imported { name, .. } => Some(name.as_str()),
            Type::Pointer(elem) => elem.base_name(),
            Type::Raw(text) => {
                let text = text.trim_start_matches('*');
                let text = text.split('[').next().unwrap_or(text);
                text.rsplit('.').next().filter(|name| !name.is_empty())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Simple(name) => f.write_str(name),
            Type::Imported { name, import } => match import.qualifier() {
                Some(qualifier) => write!(f, "{qualifier}.{name}"),
                None => f.write_str(name),
            },
            Type::Pointer(elem) => write!(f, "*{elem}"),
            Type::Array { len, elem } => {
                write!(f, "[{}]{}", len.as_deref().unwrap_or(""), elem)
            }
            Type::Map { key, value } => write!(f, "map[{key}]{value}"),
            Type::Function { params, results } => {
                f.write_str("func")?;
                write_params(f, params)?;
                write_results(f, results)
            }
            Type::Raw(text) => f.write_str(text),
        }
    }
}
