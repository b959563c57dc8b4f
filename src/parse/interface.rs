use tree_sitter::Node;

use super::Extraction;
use crate::ast::{
    child_of_kind, last_child_of_kind, named_children, NODE_COMMENT, NODE_METHOD_ELEM,
    NODE_METHOD_SPEC, NODE_TYPE_ELEM,
};
use crate::error::Result;
use crate::file::{is_exported, Interface, InterfaceMethod, Span};
use crate::types::Type;

/// Build an Interface from a `type_spec` whose type is an `interface_type`.
pub(super) fn extract(cx: &Extraction, spec: Node, outer: Node, body: Node) -> Result<Interface> {
    let name = spec
        .child_by_field_name("name")
        .map(|n| cx.text(n).to_string())
        .unwrap_or_default();
    let (docs, annotations) = cx.docs(outer)?;

    let inner = child_of_kind(body, "{")
        .zip(last_child_of_kind(body, "}"))
        .map(|(open, close)| Span::between(open, close));

    let mut methods = Vec::new();
    let mut embeds = Vec::new();
    for elem in named_children(body) {
        match elem.kind() {
            NODE_METHOD_ELEM | NODE_METHOD_SPEC => {
                if let Some(method) = extract_method(cx, elem)? {
                    methods.push(method);
                }
            }
            NODE_TYPE_ELEM => embeds.extend(extract_embed(cx, elem)),
            _ => {}
        }
    }

    Ok(Interface {
        exported: is_exported(&name),
        name,
        span: Span::of(outer),
        inner,
        docs,
        annotations,
        methods,
        embeds,
    })
}

fn extract_method(cx: &Extraction, elem: Node) -> Result<Option<InterfaceMethod>> {
    let (Some(name), Some(params)) = (
        elem.child_by_field_name("name"),
        elem.child_by_field_name("parameters"),
    ) else {
        return Ok(None);
    };
    let (docs, annotations) = cx.docs(elem)?;

    Ok(Some(InterfaceMethod {
        name: cx.text(name).to_string(),
        params: cx.types.parameters(params),
        results: cx.types.results(elem.child_by_field_name("result")),
        docs,
        annotations,
        span: Span::of(elem),
    }))
}

/// An embedded interface resolves like any type; a union stays raw.
fn extract_embed(cx: &Extraction, elem: Node) -> Option<Type> {
    let parts: Vec<Node> = named_children(elem)
        .into_iter()
        .filter(|n| n.kind() != NODE_COMMENT)
        .collect();
    if let [single] = parts.as_slice() {
        return match cx.types.resolve(*single) {
            Ok(ty) => Some(ty),
            Err(err) => {
                tracing::debug!(%err, "skipping embedded interface element");
                None
            }
        };
    }
    Some(Type::raw(cx.text(elem)))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::annotation::AnnotationParser;
    use crate::build::StaticBuildContext;
    use crate::code::{Import, Parameter};
    use crate::parse::Parser;
    use crate::types::Type;

    fn parse(src: &str) -> crate::file::File {
        Parser::new(AnnotationParser::new("gen"), Arc::new(StaticBuildContext::new()))
            .parse(src)
            .unwrap()
    }

    #[test]
    fn test_interface_methods() {
        let src = concat!(
            "package p\n\n",
            "import \"context\"\n\n",
            "// gen:mock\n",
            "type Store interface {\n",
            "\t// Get loads one user.\n",
            "\tGet(ctx context.Context, id string) (*User, error)\n",
            "\tClose()\n",
            "}\n",
        );
        let file = parse(src);
        let store = &file.interfaces["Store"];
        assert_eq!(store.annotations[0].name, "mock");
        assert_eq!(store.methods.len(), 2);

        let get = store.method("Get").unwrap();
        assert_eq!(get.docs, vec!["Get loads one user."]);
        assert_eq!(
            get.params,
            vec![
                Parameter::new("ctx", Type::imported("Context", Import::new("context"))),
                Parameter::new("id", Type::simple("string")),
            ]
        );
        assert_eq!(
            get.results,
            vec![
                Parameter::unnamed(Type::pointer(Type::simple("User"))),
                Parameter::unnamed(Type::simple("error")),
            ]
        );
        assert_eq!(
            get.span.slice(src),
            "Get(ctx context.Context, id string) (*User, error)"
        );
        assert!(store.method("Close").unwrap().results.is_empty());
        assert_eq!(
            store.inner.unwrap().slice(src),
            "\n\t// Get loads one user.\n\tGet(ctx context.Context, id string) (*User, error)\n\tClose()\n"
        );
    }

    #[test]
    fn test_embedded_interfaces() {
        let src = "package p\n\nimport \"fmt\"\n\ntype Named interface {\n\tfmt.Stringer\n\tName() string\n}\n";
        let named = &parse(src).interfaces["Named"];
        assert_eq!(named.embeds, vec![Type::imported("Stringer", Import::new("fmt"))]);
        assert_eq!(named.methods.len(), 1);
    }
}
