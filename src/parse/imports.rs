use tree_sitter::Node;

use crate::ast::{
    child_of_kind, named_children, node_text, unquote, NODE_IMPORT_SPEC, NODE_IMPORT_SPEC_LIST,
};
use crate::build::BuildContext;
use crate::code::Import;
use crate::file::{ImportDecl, Span};

/// One `import` declaration: its splice positions and its specs.
pub(super) fn extract(
    decl: Node,
    source: &str,
    context: &dyn BuildContext,
) -> (ImportDecl, Vec<Import>) {
    let keyword_end = child_of_kind(decl, "import")
        .map(|kw| kw.end_byte())
        .unwrap_or_else(|| decl.start_byte());

    let list = child_of_kind(decl, NODE_IMPORT_SPEC_LIST);
    let spec_nodes: Vec<Node> = match list {
        Some(list) => named_children(list)
            .into_iter()
            .filter(|n| n.kind() == NODE_IMPORT_SPEC)
            .collect(),
        None => named_children(decl)
            .into_iter()
            .filter(|n| n.kind() == NODE_IMPORT_SPEC)
            .collect(),
    };

    let list_span = list.and_then(|list| {
        let open = child_of_kind(list, "(")?;
        let close = child_of_kind(list, ")")?;
        Some(Span::between(open, close))
    });

    let mut specs = Vec::with_capacity(spec_nodes.len());
    let mut imports = Vec::with_capacity(spec_nodes.len());
    for node in spec_nodes {
        specs.push(Span::of(node));
        if let Some(import) = spec(node, source, context) {
            imports.push(import);
        }
    }

    let decl = ImportDecl {
        span: Span::of(decl),
        keyword_end,
        list: list_span,
        specs,
    };
    (decl, imports)
}

fn spec(node: Node, source: &str, context: &dyn BuildContext) -> Option<Import> {
    let literal = node.child_by_field_name("path")?;
    let path = unquote(node_text(literal, source))?;

    let mut import = Import::new(path);
    if let Some(name) = node.child_by_field_name("name") {
        import = import.with_alias(node_text(name, source));
    }

    match context.import(&import.path) {
        Ok(info) => {
            import.package = Some(info.name);
            import.dir = Some(info.dir);
        }
        Err(err) => {
            tracing::debug!(path = %import.path, %err, "import left unresolved");
        }
    }
    Some(import)
}
