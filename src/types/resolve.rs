//! @acp:module "Type Resolver"
//! @acp:summary "Maps tree-sitter type expressions to Type, resolving qualifiers against imports"
//! @acp:domain codegen
//! @acp:layer parser

use tree_sitter::Node;

use super::Type;
use crate::ast::{
    field_children, named_children, node_text, NODE_COMMENT, NODE_PARAMETER_DECLARATION,
    NODE_PARAMETER_LIST, NODE_VARIADIC_PARAMETER_DECLARATION,
};
use crate::code::{Import, Parameter};
use crate::error::UnsupportedType;

/// @acp:summary "Resolves type nodes of one file against its import list"
pub struct TypeResolver<'a> {
    source: &'a str,
    imports: &'a [Import],
}

impl<'a> TypeResolver<'a> {
    pub fn new(source: &'a str, imports: &'a [Import]) -> Self {
        Self { source, imports }
    }

    /// Resolve a type expression node.
    ///
    /// Valid constructs without a dedicated variant become `Type::Raw`. Only
    /// nodes that are not type expressions at all are unsupported; a map
    /// whose key or value is unsupported is unsupported as a whole.
    pub fn resolve(&self, node: Node) -> Result<Type, UnsupportedType> {
        if node.is_error() || node.is_missing() || node.has_error() {
            return Err(self.unsupported(node));
        }

        match node.kind() {
            "type_identifier" | "identifier" => Ok(Type::simple(self.text(node))),
            "qualified_type" => Ok(self.qualified(node)),
            "pointer_type" => {
                let elem = self.first_named(node).ok_or_else(|| self.unsupported(node))?;
                Ok(Type::pointer(self.resolve(elem)?))
            }
            "slice_type" => {
                let elem = self.field(node, "element")?;
                Ok(Type::slice(self.resolve(elem)?))
            }
            "array_type" => {
                let len = self.field(node, "length")?;
                let elem = self.field(node, "element")?;
                Ok(Type::array(self.text(len), self.resolve(elem)?))
            }
            "map_type" => {
                let key = self.resolve(self.field(node, "key")?)?;
                let value = self.resolve(self.field(node, "value")?)?;
                Ok(Type::map(key, value))
            }
            "function_type" => {
                let params = self.parameters(self.field(node, "parameters")?);
                let results = self.results(node.child_by_field_name("result"));
                Ok(Type::function(params, results))
            }
            _ => Ok(Type::raw(self.text(node))),
        }
    }

    /// Parameters of a `parameter_list`, one per declared name.
    ///
    /// Declarations whose type cannot be resolved are skipped.
    pub fn parameters(&self, list: Node) -> Vec<Parameter> {
        let mut params = Vec::new();

        for decl in named_children(list) {
            let variadic = match decl.kind() {
                NODE_PARAMETER_DECLARATION => false,
                NODE_VARIADIC_PARAMETER_DECLARATION => true,
                _ => continue,
            };

            let ty = match decl
                .child_by_field_name("type")
                .ok_or_else(|| self.unsupported(decl))
                .and_then(|ty| self.resolve(ty))
            {
                Ok(ty) => ty,
                Err(err) => {
                    tracing::debug!(%err, "skipping parameter");
                    continue;
                }
            };

            let names = field_children(decl, "name");
            if names.is_empty() {
                params.push(Parameter {
                    name: None,
                    ty,
                    variadic,
                });
                continue;
            }
            for name in names {
                params.push(Parameter {
                    name: Some(self.text(name).to_string()),
                    ty: ty.clone(),
                    variadic,
                });
            }
        }

        params
    }

    /// Results from a `result` field: a parameter list or a single type.
    pub fn results(&self, result: Option<Node>) -> Vec<Parameter> {
        let Some(result) = result else {
            return Vec::new();
        };
        if result.kind() == NODE_PARAMETER_LIST {
            return self.parameters(result);
        }
        match self.resolve(result) {
            Ok(ty) => vec![Parameter::unnamed(ty)],
            Err(err) => {
                tracing::debug!(%err, "skipping result");
                Vec::new()
            }
        }
    }

    fn qualified(&self, node: Node) -> Type {
        let package = node.child_by_field_name("package");
        let name = node.child_by_field_name("name");
        let (Some(package), Some(name)) = (package, name) else {
            return Type::raw(self.text(node));
        };

        let qualifier = self.text(package);
        self.imports
            .iter()
            .find(|import| import.qualifier().as_deref() == Some(qualifier))
            .map(|import| Type::imported(self.text(name), import.clone()))
            .unwrap_or_else(|| Type::raw(self.text(node)))
    }

    fn field<'t>(&self, node: Node<'t>, field: &str) -> Result<Node<'t>, UnsupportedType> {
        node.child_by_field_name(field)
            .ok_or_else(|| self.unsupported(node))
    }

    fn first_named<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        named_children(node)
            .into_iter()
            .find(|child| child.kind() != NODE_COMMENT)
    }

    fn text(&self, node: Node) -> &'a str {
        node_text(node, self.source)
    }

    fn unsupported(&self, node: Node) -> UnsupportedType {
        UnsupportedType {
            text: self.text(node).to_string(),
        }
    }
}
