//! @acp:module "Doc Comments"
//! @acp:summary "Associates comment groups with the declaration they document"
//! @acp:domain codegen
//! @acp:layer parser

use tree_sitter::Node;

use super::{node_text, NODE_COMMENT};

/// Comment nodes documenting `node`, in source order.
///
/// A doc group is the run of comments ending on the line right above `node`,
/// each line-adjacent to the next. A comment trailing another node on the
/// same line belongs to that node and ends the group.
pub fn doc_comments(node: Node<'_>) -> Vec<Node<'_>> {
    let mut docs = Vec::new();
    let mut next_row = node.start_position().row;
    let mut current = node.prev_named_sibling();

    while let Some(sibling) = current {
        if sibling.kind() != NODE_COMMENT || sibling.end_position().row + 1 != next_row {
            break;
        }
        if let Some(previous) = sibling.prev_named_sibling() {
            if previous.kind() != NODE_COMMENT
                && previous.end_position().row == sibling.start_position().row
            {
                break;
            }
        }
        docs.push(sibling);
        next_row = sibling.start_position().row;
        current = sibling.prev_named_sibling();
    }

    docs.reverse();
    docs
}

/// Cleaned doc lines of `node`.
pub fn doc_lines(node: Node, source: &str) -> Vec<String> {
    doc_comments(node)
        .into_iter()
        .flat_map(|comment| clean_comment(node_text(comment, source)))
        .collect()
}

/// Strip comment markers and surrounding whitespace.
///
/// Line comments yield one line. Block comments yield one line per text
/// line with a leading `*` gutter removed and blank edges dropped.
pub fn clean_comment(comment: &str) -> Vec<String> {
    if let Some(line) = comment.strip_prefix("//") {
        return vec![line.trim().to_string()];
    }

    let body = comment.strip_prefix("/*").unwrap_or(comment);
    let body = body.strip_suffix("*/").unwrap_or(body);
    let mut lines: Vec<String> = body
        .lines()
        .map(|line| {
            let line = line.trim();
            line.strip_prefix('*').map(str::trim).unwrap_or(line).to_string()
        })
        .collect();

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{child_of_kind, named_children, AstParser, NODE_TYPE_DECLARATION};

    fn docs_of_first_type(src: &str) -> Vec<String> {
        let tree = AstParser::new().parse(src).unwrap();
        let decl = child_of_kind(tree.root(), NODE_TYPE_DECLARATION).unwrap();
        doc_lines(decl, src)
    }

    #[test]
    fn test_clean_line_comment() {
        assert_eq!(clean_comment("//   gen:test 123  "), vec!["gen:test 123"]);
    }

    #[test]
    fn test_clean_block_comment() {
        let cleaned = clean_comment("/*\n * first\n * second\n */");
        assert_eq!(cleaned, vec!["first", "second"]);
        assert_eq!(clean_comment("/* inline */"), vec!["inline"]);
    }

    #[test]
    fn test_adjacent_comments_form_doc() {
        let src = "package p\n\n// one\n// two\ntype T struct{}\n";
        assert_eq!(docs_of_first_type(src), vec!["one", "two"]);
    }

    #[test]
    fn test_blank_line_breaks_doc_group() {
        let src = "package p\n\n// detached\n\n// attached\ntype T struct{}\n";
        assert_eq!(docs_of_first_type(src), vec!["attached"]);
    }

    #[test]
    fn test_trailing_comment_is_not_doc() {
        let src = "package p\n\ntype T struct {\n\tX int // about X\n\tY int\n}\n";
        let tree = AstParser::new().parse(src).unwrap();
        let decl = child_of_kind(tree.root(), NODE_TYPE_DECLARATION).unwrap();
        let spec = named_children(decl)[0];
        let list = child_of_kind(spec.child_by_field_name("type").unwrap(), "field_declaration_list")
            .unwrap();
        let fields: Vec<_> = named_children(list)
            .into_iter()
            .filter(|n| n.kind() == "field_declaration")
            .collect();
        assert_eq!(fields.len(), 2);
        assert!(doc_lines(fields[1], src).is_empty());
    }
}
