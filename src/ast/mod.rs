//! @acp:module "Front-End"
//! @acp:summary "tree-sitter Go front-end: whole-file parse, syntax errors, node helpers"
//! @acp:domain codegen
//! @acp:layer parser
//!
//! Wraps `tree-sitter-go`. tree-sitter always produces a tree, so a tree
//! carrying `ERROR` or `MISSING` nodes is turned into [`SourceError::Syntax`]
//! here and never reaches the extractors.

mod docs;
mod literal;

pub use docs::{clean_comment, doc_comments, doc_lines};
pub use literal::{quote, unquote};

use tree_sitter::{Language, Node, Parser, Tree};

use crate::error::{Result, SourceError};

// Node kinds shared by the extractors
pub const NODE_COMMENT: &str = "comment";
pub const NODE_PACKAGE_CLAUSE: &str = "package_clause";
pub const NODE_PACKAGE_IDENTIFIER: &str = "package_identifier";
pub const NODE_IMPORT_DECLARATION: &str = "import_declaration";
pub const NODE_IMPORT_SPEC: &str = "import_spec";
pub const NODE_IMPORT_SPEC_LIST: &str = "import_spec_list";
pub const NODE_TYPE_DECLARATION: &str = "type_declaration";
pub const NODE_TYPE_SPEC: &str = "type_spec";
pub const NODE_FUNCTION_DECLARATION: &str = "function_declaration";
pub const NODE_METHOD_DECLARATION: &str = "method_declaration";
pub const NODE_CONST_DECLARATION: &str = "const_declaration";
pub const NODE_VAR_DECLARATION: &str = "var_declaration";
pub const NODE_STRUCT_TYPE: &str = "struct_type";
pub const NODE_INTERFACE_TYPE: &str = "interface_type";
pub const NODE_FIELD_DECLARATION_LIST: &str = "field_declaration_list";
pub const NODE_FIELD_DECLARATION: &str = "field_declaration";
pub const NODE_METHOD_ELEM: &str = "method_elem";
pub const NODE_METHOD_SPEC: &str = "method_spec";
pub const NODE_TYPE_ELEM: &str = "type_elem";
pub const NODE_PARAMETER_DECLARATION: &str = "parameter_declaration";
pub const NODE_VARIADIC_PARAMETER_DECLARATION: &str = "variadic_parameter_declaration";
pub const NODE_PARAMETER_LIST: &str = "parameter_list";

/// A successfully parsed, error-free syntax tree.
pub struct SyntaxTree {
    tree: Tree,
}

impl SyntaxTree {
    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }
}

/// @acp:summary "Stateless Go front-end; every call parses the whole text"
#[derive(Clone)]
pub struct AstParser {
    language: Language,
}

impl AstParser {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_go::LANGUAGE.into(),
        }
    }

    /// @acp:summary "Parse a whole file, rejecting trees with error nodes"
    pub fn parse(&self, text: &str) -> Result<SyntaxTree> {
        let tree = self.parse_tree(text)?;
        if let Some(node) = first_error(tree.root_node()) {
            let position = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                format!("unexpected `{}`", snippet(text, node))
            };
            return Err(SourceError::Syntax {
                line: position.row + 1,
                column: position.column + 1,
                message,
            });
        }
        Ok(SyntaxTree { tree })
    }

    /// Package clause of `text`, tolerating errors elsewhere in the file.
    pub fn package_name(&self, text: &str) -> Option<String> {
        let tree = self.parse_tree(text).ok()?;
        let root = tree.root_node();
        let clause = child_of_kind(root, NODE_PACKAGE_CLAUSE)?;
        let name = child_of_kind(clause, NODE_PACKAGE_IDENTIFIER)?;
        Some(node_text(name, text).to_string())
    }

    fn parse_tree(&self, text: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        parser.parse(text, None).ok_or_else(|| SourceError::Syntax {
            line: 1,
            column: 1,
            message: "parser produced no tree".to_string(),
        })
    }
}

impl Default for AstParser {
    fn default() -> Self {
        Self::new()
    }
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error(child) {
            return Some(found);
        }
    }
    None
}

fn snippet(text: &str, node: Node) -> String {
    let raw = node_text(node, text);
    let line = raw.lines().next().unwrap_or("").trim();
    if line.chars().count() > 24 {
        let cut: String = line.chars().take(24).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Source text covered by `node`.
pub fn node_text<'a>(node: Node, source: &'a str) -> &'a str {
    &source[node.byte_range()]
}

/// First direct child (named or anonymous) of the given kind.
pub fn child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find(|c| c.kind() == kind);
    found
}

/// Last direct child (named or anonymous) of the given kind.
pub fn last_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).filter(|c| c.kind() == kind).last();
    found
}

pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// All children attached to `field`, in source order.
pub fn field_children<'t>(node: Node<'t>, field: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(field, &mut cursor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_file() {
        let parser = AstParser::new();
        let tree = parser.parse("package demo\n\nfunc main() {}\n").unwrap();
        assert_eq!(tree.root().kind(), "source_file");
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let parser = AstParser::new();
        let err = parser
            .parse("package demo\n\ntype T struct {\n\tX int\n")
            .err()
            .expect("unterminated struct must not parse");
        match err {
            SourceError::Syntax { line, .. } => assert!(line >= 3),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_package_name_tolerates_errors() {
        let parser = AstParser::new();
        assert_eq!(
            parser.package_name("package models\n\nfunc broken( {\n"),
            Some("models".to_string())
        );
        assert_eq!(parser.package_name("func main() {}\n"), None);
    }
}
