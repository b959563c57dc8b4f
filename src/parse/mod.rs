//! @acp:module "Parser"
//! @acp:summary "Drives the front-end and assembles a File from its declarations"
//! @acp:domain codegen
//! @acp:layer service
//!
//! Every call is a whole-file parse: front-end, top-level checks, imports,
//! then one extractor per declaration kind. Nothing is cached between calls
//! except import resolution inside the build context.

mod function;
mod imports;
mod interface;
mod structure;

use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::IndexMap;
use tree_sitter::Node;

use crate::annotation::{Annotation, AnnotationParser};
use crate::ast::{
    child_of_kind, doc_lines, named_children, node_text, AstParser, NODE_COMMENT,
    NODE_CONST_DECLARATION, NODE_FUNCTION_DECLARATION, NODE_IMPORT_DECLARATION,
    NODE_INTERFACE_TYPE, NODE_METHOD_DECLARATION, NODE_PACKAGE_CLAUSE, NODE_PACKAGE_IDENTIFIER,
    NODE_STRUCT_TYPE, NODE_TYPE_DECLARATION, NODE_TYPE_SPEC, NODE_VAR_DECLARATION,
};
use crate::build::BuildContext;
use crate::error::{Result, SourceError};
use crate::file::File;
use crate::types::TypeResolver;

/// @acp:summary "Parser orchestrator: text in, File snapshot out"
#[derive(Clone)]
pub struct Parser {
    ast: AstParser,
    annotations: AnnotationParser,
    context: Arc<dyn BuildContext>,
}

impl Parser {
    pub fn new(annotations: AnnotationParser, context: Arc<dyn BuildContext>) -> Self {
        Self {
            ast: AstParser::new(),
            annotations,
            context,
        }
    }

    pub fn annotations(&self) -> &AnnotationParser {
        &self.annotations
    }

    /// @acp:summary "Parse a whole Go file into a fresh File"
    pub fn parse(&self, text: &str) -> Result<File> {
        let tree = self.ast.parse(text)?;
        let root = tree.root();
        let top = check_top_level(root)?;

        let package = child_of_kind(top.package, NODE_PACKAGE_IDENTIFIER)
            .ok_or(SourceError::MissingPackage)?;

        let mut imports = Vec::new();
        let mut import_decls = Vec::new();
        for decl in &top.imports {
            let (decl, specs) = imports::extract(*decl, text, self.context.as_ref());
            import_decls.push(decl);
            imports.extend(specs);
        }

        let cx = Extraction {
            source: text,
            types: TypeResolver::new(text, &imports),
            annotations: &self.annotations,
        };

        let mut structures = IndexMap::new();
        let mut interfaces = IndexMap::new();
        let mut functions = IndexMap::new();

        for decl in top.declarations {
            match decl.kind() {
                NODE_TYPE_DECLARATION => {
                    let grouped = child_of_kind(decl, "(").is_some();
                    for spec in named_children(decl) {
                        if spec.kind() != NODE_TYPE_SPEC {
                            continue;
                        }
                        // A lone spec is documented and spanned by its declaration
                        let outer = if grouped { spec } else { decl };
                        let Some(ty) = spec.child_by_field_name("type") else {
                            continue;
                        };
                        match ty.kind() {
                            NODE_STRUCT_TYPE => {
                                let st = structure::extract(&cx, spec, outer, ty)?;
                                insert_unique(&mut structures, st.name.clone(), st, "structure");
                            }
                            NODE_INTERFACE_TYPE => {
                                let it = interface::extract(&cx, spec, outer, ty)?;
                                insert_unique(&mut interfaces, it.name.clone(), it, "interface");
                            }
                            _ => {}
                        }
                    }
                }
                NODE_FUNCTION_DECLARATION | NODE_METHOD_DECLARATION => {
                    let func = function::extract(&cx, decl)?;
                    insert_unique(&mut functions, func.key(), func, "function");
                }
                _ => {}
            }
        }

        Ok(File {
            package: node_text(package, text).to_string(),
            package_end: package.end_byte(),
            source: text.to_string(),
            imports,
            import_decls,
            structures,
            interfaces,
            functions,
        })
    }
}

/// Shared state of the declaration extractors for one parse.
pub(crate) struct Extraction<'a> {
    pub source: &'a str,
    pub types: TypeResolver<'a>,
    pub annotations: &'a AnnotationParser,
}

impl Extraction<'_> {
    /// Plain doc lines and annotations documenting `node`.
    pub fn docs(&self, node: Node) -> Result<(Vec<String>, Vec<Annotation>)> {
        self.annotations.partition(doc_lines(node, self.source))
    }

    pub fn text(&self, node: Node) -> &str {
        node_text(node, self.source)
    }
}

fn insert_unique<T>(map: &mut IndexMap<String, T>, key: String, value: T, kind: &str) {
    match map.entry(key) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(slot) => {
            tracing::warn!(kind, name = %slot.key(), "duplicate declaration, keeping the first");
        }
    }
}

struct TopLevel<'t> {
    package: Node<'t>,
    imports: Vec<Node<'t>>,
    declarations: Vec<Node<'t>>,
}

/// Enforce the Go file layout: package clause, imports, declarations.
///
/// tree-sitter accepts statements at top level; Go does not.
fn check_top_level(root: Node<'_>) -> Result<TopLevel<'_>> {
    let mut package = None;
    let mut imports = Vec::new();
    let mut declarations = Vec::new();

    for node in named_children(root) {
        let misplaced = match node.kind() {
            NODE_COMMENT => continue,
            NODE_PACKAGE_CLAUSE if package.is_none() => {
                package = Some(node);
                continue;
            }
            NODE_PACKAGE_CLAUSE => "duplicate package clause",
            _ if package.is_none() => {
                if child_of_kind(root, NODE_PACKAGE_CLAUSE).is_none() {
                    return Err(SourceError::MissingPackage);
                }
                "package clause must come first"
            }
            NODE_IMPORT_DECLARATION if declarations.is_empty() => {
                imports.push(node);
                continue;
            }
            NODE_IMPORT_DECLARATION => "imports must appear before other declarations",
            NODE_TYPE_DECLARATION
            | NODE_CONST_DECLARATION
            | NODE_VAR_DECLARATION
            | NODE_FUNCTION_DECLARATION
            | NODE_METHOD_DECLARATION => {
                declarations.push(node);
                continue;
            }
            _ => "non-declaration statement outside function body",
        };

        let position = node.start_position();
        return Err(SourceError::Syntax {
            line: position.row + 1,
            column: position.column + 1,
            message: misplaced.to_string(),
        });
    }

    let package = package.ok_or(SourceError::MissingPackage)?;
    Ok(TopLevel {
        package,
        imports,
        declarations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::StaticBuildContext;
    use crate::types::Type;

    fn parser() -> Parser {
        Parser::new(
            AnnotationParser::new("gen"),
            Arc::new(StaticBuildContext::new().with_package("example.com/m/v2", "model", "/m")),
        )
    }

    #[test]
    fn test_package_and_imports() {
        let src = "package app\n\nimport (\n\t\"fmt\"\n\tm \"example.com/m/v2\"\n)\n";
        let file = parser().parse(src).unwrap();
        assert_eq!(file.package, "app");
        assert_eq!(&src[..file.package_end], "package app");
        assert_eq!(file.imports.len(), 2);
        assert_eq!(file.imports[0].path, "fmt");
        assert_eq!(file.imports[0].package, None);
        assert_eq!(file.imports[1].alias.as_deref(), Some("m"));
        assert_eq!(file.imports[1].package.as_deref(), Some("model"));
        assert_eq!(file.import_decls.len(), 1);
        assert!(file.import_decls[0].list.is_some());
    }

    #[test]
    fn test_resolved_package_name_matches_qualifier() {
        let src = "package app\n\nimport \"example.com/m/v2\"\n\ntype T struct {\n\tU model.User\n}\n";
        let file = parser().parse(src).unwrap();
        let field = &file.structures["T"].fields[0];
        match &field.ty {
            Type::Imported { name, import } => {
                assert_eq!(name, "User");
                assert_eq!(import.path, "example.com/m/v2");
            }
            other => panic!("expected imported type, got {other:?}"),
        }
        assert_eq!(field.ty.to_string(), "model.User");
    }

    #[test]
    fn test_missing_package() {
        assert!(matches!(
            parser().parse("type T struct{}\n"),
            Err(SourceError::MissingPackage)
        ));
        assert!(matches!(
            parser().parse("// just a comment\n"),
            Err(SourceError::MissingPackage)
        ));
    }

    #[test]
    fn test_statement_outside_function_is_rejected() {
        let err = parser().parse("package p\n\nx := 1\n").unwrap_err();
        match err {
            SourceError::Syntax { line, message, .. } => {
                assert_eq!(line, 3);
                assert!(message.contains("non-declaration"));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_import_after_declaration_is_rejected() {
        let src = "package p\n\nfunc f() {}\n\nimport \"fmt\"\n";
        assert!(matches!(
            parser().parse(src),
            Err(SourceError::Syntax { line: 5, .. })
        ));
    }

    #[test]
    fn test_grouped_type_declaration() {
        let src = "package p\n\ntype (\n\t// gen:a\n\tA struct{}\n\n\t// gen:b\n\tB interface{}\n\tC int\n)\n";
        let file = parser().parse(src).unwrap();
        let a = &file.structures["A"];
        assert_eq!(&src[a.span.range()], "A struct{}");
        assert_eq!(a.annotations[0].name, "a");
        let b = &file.interfaces["B"];
        assert_eq!(&src[b.span.range()], "B interface{}");
        assert_eq!(b.annotations[0].name, "b");
        assert_eq!(file.structures.len(), 1);
    }

    #[test]
    fn test_duplicate_function_keeps_first() {
        let src = "package p\n\nfunc F() int { return 1 }\n\nfunc F() int { return 2 }\n";
        let file = parser().parse(src).unwrap();
        assert_eq!(file.functions.len(), 1);
        assert_eq!(file.functions["F"].body.as_deref(), Some("return 1"));
    }

    #[test]
    fn test_strict_annotations_fail_parse() {
        let strict = Parser::new(
            AnnotationParser::new("gen").strict(true),
            Arc::new(StaticBuildContext::new()),
        );
        let src = "package p\n\n// gen:\ntype T struct{}\n";
        assert!(matches!(
            strict.parse(src),
            Err(SourceError::Annotation { .. })
        ));
        assert!(parser().parse(src).is_ok());
    }
}
