use tree_sitter::Node;

use super::Extraction;
use crate::ast::{
    child_of_kind, field_children, last_child_of_kind, named_children, unquote,
    NODE_FIELD_DECLARATION, NODE_FIELD_DECLARATION_LIST,
};
use crate::code::Tags;
use crate::error::Result;
use crate::file::{is_exported, Span, Structure, StructureField};
use crate::types::Type;

/// Build a Structure from a `type_spec` whose type is a `struct_type`.
///
/// `outer` is the node that carries the span and the doc comments.
pub(super) fn extract(cx: &Extraction, spec: Node, outer: Node, body: Node) -> Result<Structure> {
    let name = spec
        .child_by_field_name("name")
        .map(|n| cx.text(n).to_string())
        .unwrap_or_default();
    let (docs, annotations) = cx.docs(outer)?;

    let list = child_of_kind(body, NODE_FIELD_DECLARATION_LIST);
    let inner = list.and_then(|list| {
        let open = child_of_kind(list, "{")?;
        let close = last_child_of_kind(list, "}")?;
        Some(Span::between(open, close))
    });

    let mut fields = Vec::new();
    if let Some(list) = list {
        for decl in named_children(list) {
            if decl.kind() == NODE_FIELD_DECLARATION {
                fields.extend(extract_fields(cx, decl)?);
            }
        }
    }

    Ok(Structure {
        exported: is_exported(&name),
        name,
        span: Span::of(outer),
        inner,
        docs,
        annotations,
        fields,
    })
}

/// One field per declared name; embedded fields are named after their type.
fn extract_fields(cx: &Extraction, decl: Node) -> Result<Vec<StructureField>> {
    let Some(type_node) = decl.child_by_field_name("type") else {
        return Ok(Vec::new());
    };
    let names = field_children(decl, "name");
    let embedded = names.is_empty();

    let ty = match cx.types.resolve(type_node) {
        Ok(ty) if embedded && child_of_kind(decl, "*").is_some() => Type::pointer(ty),
        Ok(ty) => ty,
        Err(err) => {
            tracing::debug!(%err, "skipping struct field");
            return Ok(Vec::new());
        }
    };

    let raw_tag = decl
        .child_by_field_name("tag")
        .map(|tag| cx.text(tag).to_string());
    let tags = raw_tag
        .as_deref()
        .and_then(unquote)
        .map(|content| Tags::parse(&content))
        .unwrap_or_default();

    let (docs, annotations) = cx.docs(decl)?;
    let span = Span::of(decl);

    let field = |name: String| StructureField {
        name,
        ty: ty.clone(),
        embedded,
        tags: tags.clone(),
        raw_tag: raw_tag.clone(),
        docs: docs.clone(),
        annotations: annotations.clone(),
        span,
    };

    if embedded {
        let name = ty
            .base_name()
            .map(str::to_string)
            .unwrap_or_else(|| cx.text(type_node).to_string());
        return Ok(vec![field(name)]);
    }
    Ok(names
        .into_iter()
        .map(|name| field(cx.text(name).to_string()))
        .collect())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::annotation::{Annotation, AnnotationParser};
    use crate::build::StaticBuildContext;
    use crate::code::Import;
    use crate::parse::Parser;
    use crate::types::Type;

    fn parse(src: &str) -> crate::file::File {
        Parser::new(AnnotationParser::new("gen"), Arc::new(StaticBuildContext::new()))
            .parse(src)
            .unwrap()
    }

    #[test]
    fn test_struct_spans() {
        let src = "package p\n\n// User is a user.\ntype User struct {\n\tName string\n}\n";
        let file = parse(src);
        let user = &file.structures["User"];
        assert!(user.exported);
        assert_eq!(user.docs, vec!["User is a user."]);
        assert_eq!(user.span.slice(src), "type User struct {\n\tName string\n}");
        assert_eq!(user.inner.unwrap().slice(src), "\n\tName string\n");
        assert_eq!(user.fields[0].span.slice(src), "Name string");
    }

    #[test]
    fn test_multi_name_field() {
        let file = parse("package p\n\ntype point struct {\n\tx, y int\n}\n");
        let point = &file.structures["point"];
        assert!(!point.exported);
        let names: Vec<_> = point.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["x", "y"]);
        assert!(point.fields.iter().all(|f| f.ty == Type::simple("int")));
        assert_eq!(point.fields[0].span, point.fields[1].span);
    }

    #[test]
    fn test_embedded_fields() {
        let src = "package p\n\nimport \"io\"\n\ntype T struct {\n\tio.Reader\n\t*Base\n}\n";
        let file = parse(src);
        let fields = &file.structures["T"].fields;
        assert_eq!(fields[0].name, "Reader");
        assert!(fields[0].embedded);
        assert_eq!(fields[0].ty, Type::imported("Reader", Import::new("io")));
        assert_eq!(fields[1].name, "Base");
        assert_eq!(fields[1].ty, Type::pointer(Type::simple("Base")));
    }

    #[test]
    fn test_field_tags_and_annotations() {
        let src = concat!(
            "package p\n\n",
            "type T struct {\n",
            "\t// gen:column user_id\n",
            "\tID int64 `json:\"id\" db:\"user_id\"`\n",
            "\tName string \"json:\\\"name\\\"\"\n",
            "}\n",
        );
        let file = parse(src);
        let fields = &file.structures["T"].fields;
        assert_eq!(fields[0].tags.get("db"), Some("user_id"));
        assert_eq!(fields[0].raw_tag.as_deref(), Some("`json:\"id\" db:\"user_id\"`"));
        assert_eq!(
            fields[0].annotations,
            vec![Annotation::new("column").with_arg("user_id")]
        );
        assert!(fields[0].docs.is_empty());
        assert_eq!(fields[1].tags.get("json"), Some("name"));
        assert!(fields[1].annotations.is_empty());
    }

    #[test]
    fn test_channel_field_is_raw() {
        let file = parse("package p\n\ntype T struct {\n\tC chan<- int\n}\n");
        let field = &file.structures["T"].fields[0];
        assert_eq!(field.ty, Type::raw("chan<- int"));
        assert_eq!(field.ty.to_string(), "chan<- int");
    }

    #[test]
    fn test_empty_struct_inner() {
        let src = "package p\n\ntype E struct{}\n";
        let file = parse(src);
        let inner = file.structures["E"].inner.unwrap();
        assert!(inner.is_empty());
        assert_eq!(&src[inner.begin - 1..inner.end + 1], "{}");
    }
}
