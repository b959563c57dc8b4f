//! Text splices computed from File spans.
//!
//! Each function returns the edit only; applying it and re-parsing is the
//! caller's job.

use std::ops::Range;

use crate::code::Import;
use crate::file::{File, Span};

/// Replace `range` of the text with `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Splice {
    pub range: Range<usize>,
    pub text: String,
}

impl Splice {
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self {
            range: at..at,
            text: text.into(),
        }
    }

    pub fn replace(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
        }
    }

    pub fn apply(&self, source: &str) -> String {
        let mut out = String::with_capacity(source.len() + self.text.len());
        out.push_str(&source[..self.range.start]);
        out.push_str(&self.text);
        out.push_str(&source[self.range.end..]);
        out
    }
}

/// Indent every non-empty line of `code`, each line newline-terminated.
fn indent_lines(code: &str, indent: &str) -> String {
    let mut out = String::with_capacity(code.len() + indent.len() * 4);
    for line in code.lines() {
        if !line.trim().is_empty() {
            out.push_str(indent);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Add `code` on its own lines right before the closing delimiter of `inner`.
///
/// Whitespace between the last member and the delimiter is replaced, so the
/// delimiter ends up alone on the following line.
pub(crate) fn append_to_inner(source: &str, inner: Span, code: &str, indent: &str) -> Splice {
    let kept = source[..inner.end].trim_end();
    let start = kept.len().max(inner.begin);
    let mut text = String::from("\n");
    text.push_str(&indent_lines(code, indent));
    Splice::replace(start..inner.end, text)
}

/// Add one parameter after the existing ones.
///
/// `last` is the end of the last parameter declaration. When the closing
/// parenthesis is not on that line, the parameter goes on its own line with
/// a trailing comma so no semicolon is inserted after it.
pub(crate) fn append_parameter(
    source: &str,
    params: Span,
    last: Option<usize>,
    param: &str,
    indent: &str,
) -> Splice {
    let Some(end) = last else {
        if params.slice(source).contains('\n') {
            let pad = format!("{}{indent}", line_indent(source, params.begin));
            return Splice::insert(params.begin, format!("\n{pad}{param},"));
        }
        return Splice::insert(params.begin, param);
    };

    let tail = &source[end..params.end];
    match tail.find('\n') {
        Some(newline) => {
            let rest = &tail[..newline];
            let pad = if line_start(source, end) <= params.begin {
                format!("{}{indent}", line_indent(source, end))
            } else {
                line_indent(source, end).to_string()
            };
            let mut text = String::new();
            if leading_comma(rest).is_none() {
                text.push(',');
            }
            text.push_str(rest);
            text.push('\n');
            text.push_str(&pad);
            text.push_str(param);
            text.push(',');
            Splice::replace(end..end + newline, text)
        }
        None => match leading_comma(tail) {
            Some(comma) => Splice::insert(end + comma + 1, format!(" {param}")),
            None => Splice::insert(end, format!(", {param}")),
        },
    }
}

/// Offset of a comma that follows only whitespace and block comments.
fn leading_comma(text: &str) -> Option<usize> {
    let mut at = 0;
    loop {
        let rest = &text[at..];
        let trimmed = rest.trim_start();
        at += rest.len() - trimmed.len();
        if trimmed.starts_with(',') {
            return Some(at);
        }
        let body = trimmed.strip_prefix("/*")?;
        at += body.find("*/")? + 4;
    }
}

fn line_start(source: &str, at: usize) -> usize {
    source[..at].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

fn line_end(source: &str, at: usize) -> usize {
    source[at..].find('\n').map(|i| at + i).unwrap_or(source.len())
}

/// Leading whitespace of the line containing `at`.
fn line_indent(source: &str, at: usize) -> &str {
    let line = &source[line_start(source, at)..];
    &line[..line.len() - line.trim_start_matches([' ', '\t']).len()]
}

/// Add an import, choosing the splice by the current import layout.
pub(crate) fn append_import(file: &File, import: &Import, indent: &str) -> Splice {
    let source = file.source.as_str();
    let spec = import.to_string();

    if let Some(list) = file.import_decls.iter().rev().find_map(|decl| decl.list) {
        return append_to_inner(source, list, &spec, indent);
    }

    match file.import_decls.last() {
        None => Splice::insert(
            line_end(source, file.package_end),
            format!("\n\nimport {spec}"),
        ),
        Some(decl) => {
            // A line comment trailing the spec moves into the block with it
            let rest_end = line_end(source, decl.span.end);
            let rest = &source[decl.span.end..rest_end];
            let (trailing, end) = if rest.trim_start().starts_with("//") {
                (Some(rest.trim()), rest_end)
            } else {
                (None, decl.span.end)
            };

            let mut block = String::from(" (\n");
            for (i, existing) in decl.specs.iter().enumerate() {
                block.push_str(indent);
                block.push_str(existing.slice(source));
                if i + 1 == decl.specs.len() {
                    if let Some(comment) = trailing {
                        block.push(' ');
                        block.push_str(comment);
                    }
                }
                block.push('\n');
            }
            block.push_str(indent);
            block.push_str(&spec);
            block.push_str("\n)");
            Splice::replace(decl.keyword_end..end, block)
        }
    }
}

/// Insert a comment line right above the entity starting at `begin`.
pub(crate) fn comment_above(source: &str, begin: usize, comment: &str) -> Splice {
    let prefix = &source[line_start(source, begin)..begin];
    if prefix.trim().is_empty() {
        Splice::insert(begin, format!("// {comment}\n{prefix}"))
    } else {
        // Entity shares its line with a previous one; break the line first
        Splice::insert(begin, format!("\n// {comment}\n"))
    }
}

/// New top-level declaration after everything else.
pub(crate) fn append_declaration(source: &str, code: &str) -> Splice {
    let end = source.trim_end().len();
    Splice::replace(end..source.len(), format!("\n\n{}\n", code.trim_end()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn inner_of(source: &str, open: char, close: char) -> Span {
        let begin = source.find(open).unwrap() + 1;
        let end = source.rfind(close).unwrap();
        Span::new(begin, end)
    }

    #[test]
    fn test_append_to_multiline_body() {
        let src = "type T struct {\n\tX int\n}\n";
        let splice = append_to_inner(src, inner_of(src, '{', '}'), "Y string", "\t");
        assert_eq!(splice.apply(src), "type T struct {\n\tX int\n\tY string\n}\n");
    }

    #[test]
    fn test_append_to_single_line_body() {
        let src = "type T struct { X int }\n";
        let splice = append_to_inner(src, inner_of(src, '{', '}'), "Y string", "\t");
        assert_eq!(splice.apply(src), "type T struct { X int\n\tY string\n}\n");
    }

    #[test]
    fn test_append_to_empty_body() {
        let src = "func f() {}\n";
        let splice = append_to_inner(src, inner_of(src, '{', '}'), "x := 1\n\nuse(x)", "\t");
        assert_eq!(splice.apply(src), "func f() {\n\tx := 1\n\n\tuse(x)\n}\n");
    }

    fn params_of(source: &str, last: &str) -> (Span, Option<usize>) {
        let params = inner_of(source, '(', ')');
        let end = source.find(last).map(|i| i + last.len());
        (params, end)
    }

    fn add_param(source: &str, last: &str) -> String {
        let (params, end) = params_of(source, last);
        append_parameter(source, params, end, "b string", "\t").apply(source)
    }

    #[test]
    fn test_append_parameter_separators() {
        let src = "func f() {}";
        assert_eq!(
            append_parameter(src, Span::new(7, 7), None, "a int", "\t").apply(src),
            "func f(a int) {}"
        );
        assert_eq!(add_param("func f(a int) {}", "a int"), "func f(a int, b string) {}");
        assert_eq!(add_param("func f(a int, ) {}", "a int"), "func f(a int, b string ) {}");
        assert_eq!(
            add_param("func f(a int /* n */, ) {}", "a int"),
            "func f(a int /* n */, b string ) {}"
        );
    }

    #[test]
    fn test_append_parameter_multiline_trailing_comma() {
        assert_eq!(
            add_param("func f(\n\ta int,\n) {}", "a int"),
            "func f(\n\ta int,\n\tb string,\n) {}"
        );
        assert_eq!(
            add_param("func f(\n\ta int\n) {}", "a int"),
            "func f(\n\ta int,\n\tb string,\n) {}"
        );
    }

    #[test]
    fn test_append_parameter_after_line_comment() {
        assert_eq!(
            add_param("func f(\n\ta int, // the a\n) {}", "a int"),
            "func f(\n\ta int, // the a\n\tb string,\n) {}"
        );
        assert_eq!(
            add_param("func f(a int, // the a\n) {}", "a int"),
            "func f(a int, // the a\n\tb string,\n) {}"
        );
    }

    #[test]
    fn test_append_parameter_to_multiline_empty_list() {
        let src = "func f(\n\t// none yet\n) {}";
        let params = inner_of(src, '(', ')');
        assert_eq!(
            append_parameter(src, params, None, "b string", "\t").apply(src),
            "func f(\n\tb string,\n\t// none yet\n) {}"
        );
    }

    #[test]
    fn test_comment_above_keeps_indentation() {
        let src = "type T struct {\n\tX int\n}\n";
        let begin = src.find('X').unwrap();
        assert_eq!(
            comment_above(src, begin, "gen:id").apply(src),
            "type T struct {\n\t// gen:id\n\tX int\n}\n"
        );
    }

    #[test]
    fn test_comment_above_mid_line_entity() {
        let src = "type T struct { X int; Y int }\n";
        let begin = src.find('Y').unwrap();
        assert_eq!(
            comment_above(src, begin, "gen:y").apply(src),
            "type T struct { X int; \n// gen:y\nY int }\n"
        );
    }

    #[test]
    fn test_append_declaration() {
        let src = "package p\n\n\n";
        assert_eq!(
            append_declaration(src, "type T struct{}").apply(src),
            "package p\n\ntype T struct{}\n"
        );
    }
}
