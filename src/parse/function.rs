use tree_sitter::Node;

use super::Extraction;
use crate::ast::{
    child_of_kind, last_child_of_kind, named_children, NODE_PARAMETER_DECLARATION,
    NODE_VARIADIC_PARAMETER_DECLARATION,
};
use crate::error::Result;
use crate::file::{is_exported, Function, Span};

/// Build a Function from a `function_declaration` or `method_declaration`.
pub(super) fn extract(cx: &Extraction, decl: Node) -> Result<Function> {
    let name = decl
        .child_by_field_name("name")
        .map(|n| cx.text(n).to_string())
        .unwrap_or_default();
    let (docs, annotations) = cx.docs(decl)?;

    let params_node = decl.child_by_field_name("parameters");
    let params_span = params_node
        .and_then(|list| {
            let open = child_of_kind(list, "(")?;
            let close = last_child_of_kind(list, ")")?;
            Some(Span::between(open, close))
        })
        .unwrap_or_default();
    let last_param_end = params_node.and_then(|list| {
        named_children(list)
            .into_iter()
            .filter(|n| {
                n.kind() == NODE_PARAMETER_DECLARATION
                    || n.kind() == NODE_VARIADIC_PARAMETER_DECLARATION
            })
            .last()
            .map(|n| n.end_byte())
    });
    let params = params_node
        .map(|list| cx.types.parameters(list))
        .unwrap_or_default();
    let results = cx.types.results(decl.child_by_field_name("result"));

    let receiver = decl
        .child_by_field_name("receiver")
        .and_then(|list| cx.types.parameters(list).into_iter().next());

    let inner = decl.child_by_field_name("body").and_then(|block| {
        let open = child_of_kind(block, "{")?;
        let close = last_child_of_kind(block, "}")?;
        Some(Span::between(open, close))
    });
    let body = inner.map(|span| span.slice(cx.source).trim().to_string());

    Ok(Function {
        exported: is_exported(&name),
        name,
        span: Span::of(decl),
        inner,
        params_span,
        last_param_end,
        receiver,
        params,
        results,
        body,
        docs,
        annotations,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::annotation::{Annotation, AnnotationParser};
    use crate::build::StaticBuildContext;
    use crate::code::Parameter;
    use crate::parse::Parser;
    use crate::types::Type;

    fn parse(src: &str) -> crate::file::File {
        Parser::new(AnnotationParser::new("gen"), Arc::new(StaticBuildContext::new()))
            .parse(src)
            .unwrap()
    }

    #[test]
    fn test_free_function() {
        let src = concat!(
            "package p\n\n",
            "// gen:handler \"GET /\"\n",
            "func Serve(addr string, opts ...Option) error {\n",
            "\treturn nil\n",
            "}\n",
        );
        let file = parse(src);
        let serve = file.function("Serve").unwrap();
        assert!(serve.exported);
        assert!(!serve.is_method());
        assert_eq!(
            serve.annotations,
            vec![Annotation::new("handler").with_arg("GET /")]
        );
        assert_eq!(serve.params_span.slice(src), "addr string, opts ...Option");
        assert_eq!(serve.last_param_end, src.find(") error"));
        assert_eq!(
            serve.params,
            vec![
                Parameter::new("addr", Type::simple("string")),
                Parameter::new("opts", Type::simple("Option")).variadic(),
            ]
        );
        assert_eq!(serve.results, vec![Parameter::unnamed(Type::simple("error"))]);
        assert_eq!(serve.body.as_deref(), Some("return nil"));
        assert_eq!(serve.inner.unwrap().slice(src), "\n\treturn nil\n");
        assert_eq!(serve.span.slice(src), &src[src.find("func").unwrap()..src.len() - 1]);
    }

    #[test]
    fn test_methods_are_keyed_by_receiver() {
        let src = concat!(
            "package p\n\n",
            "func (a *A) Close() {}\n\n",
            "func (b B) Close() {}\n\n",
            "func (l *List[T]) Len() (n int) { return }\n",
        );
        let file = parse(src);
        let keys: Vec<_> = file.functions.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["A.Close", "B.Close", "List.Len"]);

        let close = file.function("A.Close").unwrap();
        assert_eq!(
            close.receiver,
            Some(Parameter::new("a", Type::pointer(Type::simple("A"))))
        );
        assert!(close.inner.unwrap().is_empty());
        assert_eq!(close.body.as_deref(), Some(""));

        let len = file.function("List.Len").unwrap();
        assert_eq!(len.results, vec![Parameter::new("n", Type::simple("int"))]);
    }

    #[test]
    fn test_bodyless_declaration() {
        let file = parse("package p\n\nfunc now() (sec int64, nsec int32)\n");
        let now = file.function("now").unwrap();
        assert!(now.inner.is_none());
        assert!(now.body.is_none());
        assert_eq!(now.results.len(), 2);
        assert!(now.params_span.is_empty());
        assert!(now.last_param_end.is_none());
    }

    #[test]
    fn test_multi_name_parameters() {
        let file = parse("package p\n\nfunc add(a, b int, f func(int) bool) {}\n");
        let params = &file.function("add").unwrap().params;
        assert_eq!(params.len(), 3);
        assert_eq!(params[0].name.as_deref(), Some("a"));
        assert_eq!(params[1].name.as_deref(), Some("b"));
        assert_eq!(params[1].ty, Type::simple("int"));
        assert_eq!(params[2].ty.to_string(), "func(int) bool");
    }

    #[test]
    fn test_last_param_end_skips_trailing_comment() {
        let src = "package p\n\nfunc f(\n\ta int, // the a\n) {}\n";
        let f = parse(src).function("f").unwrap().clone();
        let end = f.last_param_end.unwrap();
        assert_eq!(&src[..end], "package p\n\nfunc f(\n\ta int");
        assert_eq!(f.params.len(), 1);
    }
}
