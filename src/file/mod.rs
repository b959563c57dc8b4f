//! @acp:module "File Model"
//! @acp:summary "Immutable, position-indexed snapshot of one parsed Go file"
//! @acp:domain codegen
//! @acp:layer model
//!
//! A [`File`] is produced by [`crate::parse::Parser`] and never edited in
//! place. Every span refers to the exact text stored in [`File::source`];
//! once that text changes the whole snapshot is replaced.

use std::ops::Range;

use indexmap::IndexMap;
use serde::Serialize;
use tree_sitter::Node;

use crate::annotation::{Annotated, Annotation};
use crate::code::{Import, Parameter, Tags};
use crate::types::Type;

/// Half-open byte range `[begin, end)` into the file text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    pub fn of(node: Node) -> Self {
        Self::new(node.start_byte(), node.end_byte())
    }

    /// Interior between two delimiter nodes, excluding both.
    pub fn between(open: Node, close: Node) -> Self {
        Self::new(open.end_byte(), close.start_byte())
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    pub fn slice<'s>(&self, text: &'s str) -> &'s str {
        &text[self.range()]
    }
}

pub trait Named {
    fn name(&self) -> &str;
}

pub trait Spanned {
    fn span(&self) -> Span;

    /// Source text of the entity.
    fn text<'s>(&self, source: &'s str) -> &'s str {
        self.span().slice(source)
    }
}

/// Go exports identifiers that start with an upper-case letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// @acp:summary "Struct declaration with its fields"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Structure {
    pub name: String,
    pub exported: bool,
    pub span: Span,
    /// Between the braces of the field list
    pub inner: Option<Span>,
    pub docs: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub fields: Vec<StructureField>,
}

impl Structure {
    pub fn field(&self, name: &str) -> Option<&StructureField> {
        self.fields.iter().find(|field| field.name == name)
    }
}

/// One named field. `a, b int` yields two fields sharing a span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StructureField {
    /// Declared name, or the type name for an embedded field
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
    pub embedded: bool,
    pub tags: Tags,
    /// Tag literal as written, quotes included
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_tag: Option<String>,
    pub docs: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

/// @acp:summary "Interface declaration with its methods and embedded types"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interface {
    pub name: String,
    pub exported: bool,
    pub span: Span,
    pub inner: Option<Span>,
    pub docs: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub methods: Vec<InterfaceMethod>,
    /// Embedded interfaces and type-set elements
    pub embeds: Vec<Type>,
}

impl Interface {
    pub fn method(&self, name: &str) -> Option<&InterfaceMethod> {
        self.methods.iter().find(|method| method.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterfaceMethod {
    pub name: String,
    pub params: Vec<Parameter>,
    pub results: Vec<Parameter>,
    pub docs: Vec<String>,
    pub annotations: Vec<Annotation>,
    pub span: Span,
}

/// @acp:summary "Free function or method declaration"
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub exported: bool,
    pub span: Span,
    /// Between the body braces; `None` for body-less declarations
    pub inner: Option<Span>,
    /// Between the parentheses of the parameter list
    pub params_span: Span,
    /// End of the last parameter declaration, `None` when there are none
    #[serde(skip)]
    pub last_param_end: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<Parameter>,
    pub params: Vec<Parameter>,
    pub results: Vec<Parameter>,
    /// Trimmed body text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    pub docs: Vec<String>,
    pub annotations: Vec<Annotation>,
}

impl Function {
    /// Lookup key: `Name`, or `Recv.Name` for methods.
    pub fn key(&self) -> String {
        match self.receiver_type() {
            Some(recv) => format!("{}.{}", recv, self.name),
            None => self.name.clone(),
        }
    }

    /// Receiver type name without pointer or type arguments.
    pub fn receiver_type(&self) -> Option<&str> {
        self.receiver.as_ref().and_then(|recv| recv.ty.base_name())
    }

    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }
}

/// Position data of one `import` declaration, used to splice new imports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDecl {
    pub span: Span,
    /// Offset right after the `import` keyword
    pub keyword_end: usize,
    /// Between the parentheses of a grouped declaration
    pub list: Option<Span>,
    pub specs: Vec<Span>,
}

/// @acp:summary "Aggregate root: package, imports, and name-keyed declarations"
#[derive(Debug, Clone, Serialize)]
pub struct File {
    pub package: String,
    /// Offset right after the package name
    #[serde(skip)]
    pub package_end: usize,
    #[serde(skip)]
    pub source: String,
    pub imports: Vec<Import>,
    #[serde(skip)]
    pub import_decls: Vec<ImportDecl>,
    pub structures: IndexMap<String, Structure>,
    pub interfaces: IndexMap<String, Interface>,
    /// Keyed by [`Function::key`]
    pub functions: IndexMap<String, Function>,
}

impl File {
    pub fn structure(&self, name: &str) -> Option<&Structure> {
        self.structures.get(name)
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.get(name)
    }

    pub fn function(&self, key: &str) -> Option<&Function> {
        self.functions.get(key)
    }

    /// Whether an import with the same path and alias exists.
    pub fn has_import(&self, import: &Import) -> bool {
        self.imports.iter().any(|existing| existing.same_spec(import))
    }
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Named for $ty {
                fn name(&self) -> &str {
                    &self.name
                }
            }

            impl Spanned for $ty {
                fn span(&self) -> Span {
                    self.span
                }
            }

            impl Annotated for $ty {
                fn annotations(&self) -> &[Annotation] {
                    &self.annotations
                }
            }
        )*
    };
}

impl_entity!(Structure, StructureField, Interface, InterfaceMethod, Function);
