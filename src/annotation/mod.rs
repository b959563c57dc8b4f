//! @acp:module "Annotations"
//! @acp:summary "Marker-prefixed annotation lines embedded in doc comments"
//! @acp:domain codegen
//! @acp:layer parser
//!
//! An annotation is one doc line of the form `marker:name arg1 arg2 ...`.
//! Arguments are whitespace separated; a double-quoted argument may contain
//! whitespace and Go escapes. Doc lines that do not start with `marker:` are
//! plain documentation. Lines that start with the marker but are malformed
//! are dropped, or fail the declaration in strict mode.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ast::{quote, unquote};
use crate::error::{Result, SourceError};

/// Regex for valid annotation names
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap());

/// @acp:summary "Parsed annotation: name plus ordered arguments"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Annotation {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// Canonical text form, `marker:name arg1 arg2`.
    pub fn render(&self, marker: &str) -> String {
        let mut out = format!("{}:{}", marker, self.name);
        for arg in &self.args {
            out.push(' ');
            if needs_quoting(arg) {
                out.push_str(&quote(arg));
            } else {
                out.push_str(arg);
            }
        }
        out
    }
}

fn needs_quoting(arg: &str) -> bool {
    arg.is_empty() || arg.starts_with('"') || arg.chars().any(char::is_whitespace)
}

/// Anything carrying annotations: declarations, fields and interface methods.
pub trait Annotated {
    fn annotations(&self) -> &[Annotation];
}

/// @acp:summary "All annotations of `node` named `name`, in doc order"
pub fn find_annotations<'a, T>(name: &str, node: &'a T) -> Vec<&'a Annotation>
where
    T: Annotated + ?Sized,
{
    node.annotations()
        .iter()
        .filter(|ann| ann.name == name)
        .collect()
}

/// @acp:summary "Parser for annotation lines using one configured marker"
#[derive(Debug, Clone)]
pub struct AnnotationParser {
    marker: String,
    strict: bool,
}

impl AnnotationParser {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            strict: false,
        }
    }

    /// In strict mode a malformed marker line fails the whole declaration.
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Parse one cleaned doc line.
    ///
    /// `Ok(None)` means the line is plain documentation.
    pub fn parse_line(&self, line: &str) -> Result<Option<Annotation>> {
        let line = line.trim();
        let Some(body) = line
            .strip_prefix(self.marker.as_str())
            .and_then(|rest| rest.strip_prefix(':'))
        else {
            return Ok(None);
        };

        let invalid = |reason: &str| SourceError::Annotation {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let name_end = body.find(char::is_whitespace).unwrap_or(body.len());
        let name = &body[..name_end];
        if name.is_empty() {
            return Err(invalid("missing annotation name"));
        }
        if !NAME_PATTERN.is_match(name) {
            return Err(invalid("annotation name must be an identifier"));
        }

        let args = split_args(&body[name_end..]).map_err(invalid)?;
        Ok(Some(Annotation {
            name: name.to_string(),
            args,
        }))
    }

    /// @acp:summary "Split doc lines into plain documentation and annotations"
    pub fn partition(&self, docs: Vec<String>) -> Result<(Vec<String>, Vec<Annotation>)> {
        let mut plain = Vec::new();
        let mut annotations = Vec::new();
        for line in docs {
            match self.parse_line(&line) {
                Ok(Some(ann)) => annotations.push(ann),
                Ok(None) => plain.push(line),
                Err(err) if self.strict => return Err(err),
                Err(err) => {
                    tracing::debug!(%err, "treating malformed annotation as documentation");
                    plain.push(line);
                }
            }
        }
        Ok((plain, annotations))
    }
}

fn split_args(input: &str) -> std::result::Result<Vec<String>, &'static str> {
    let mut args = Vec::new();
    let mut rest = input.trim_start();

    while !rest.is_empty() {
        if rest.starts_with('"') {
            let bytes = rest.as_bytes();
            let mut i = 1;
            let mut closing = None;
            while i < bytes.len() {
                match bytes[i] {
                    b'\\' => i += 2,
                    b'"' => {
                        closing = Some(i);
                        break;
                    }
                    _ => i += 1,
                }
            }
            let end = closing.ok_or("unterminated quoted argument")?;
            let value = unquote(&rest[..=end]).ok_or("invalid escape in quoted argument")?;
            args.push(value);
            rest = &rest[end + 1..];
            if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
                return Err("quoted argument must be followed by whitespace");
            }
        } else {
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            args.push(rest[..end].to_string());
            rest = &rest[end..];
        }
        rest = rest.trim_start();
    }

    Ok(args)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Doc(Vec<Annotation>);

    impl Annotated for Doc {
        fn annotations(&self) -> &[Annotation] {
            &self.0
        }
    }

    #[test]
    fn test_parse_name_and_args() {
        let parser = AnnotationParser::new("marker");
        let ann = parser.parse_line("marker:test 123").unwrap().unwrap();
        assert_eq!(ann.name, "test");
        assert_eq!(ann.args, vec!["123"]);
    }

    #[test]
    fn test_plain_documentation_is_not_annotation() {
        let parser = AnnotationParser::new("marker");
        assert!(parser.parse_line("Server handles requests.").unwrap().is_none());
        assert!(parser.parse_line("markers:test").unwrap().is_none());
        assert!(parser.parse_line("other:test").unwrap().is_none());
    }

    #[test]
    fn test_quoted_arguments() {
        let parser = AnnotationParser::new("gen");
        let ann = parser
            .parse_line(r#"gen:route GET "/users/{id}" "with space""#)
            .unwrap()
            .unwrap();
        assert_eq!(ann.args, vec!["GET", "/users/{id}", "with space"]);
    }

    #[test]
    fn test_malformed_marker_lines() {
        let parser = AnnotationParser::new("gen");
        assert!(parser.parse_line("gen:").is_err());
        assert!(parser.parse_line("gen: spaced").is_err());
        assert!(parser.parse_line("gen:9lives").is_err());
        assert!(parser.parse_line(r#"gen:x "open"#).is_err());
    }

    #[test]
    fn test_partition_skips_malformed_unless_strict() {
        let docs = vec![
            "Widget is a thing.".to_string(),
            "gen:keep a".to_string(),
            "gen:".to_string(),
        ];
        let lenient = AnnotationParser::new("gen");
        let (_, found) = lenient.partition(docs.clone()).unwrap();
        assert_eq!(found, vec![Annotation::new("keep").with_arg("a")]);

        let strict = AnnotationParser::new("gen").strict(true);
        assert!(matches!(
            strict.partition(docs),
            Err(SourceError::Annotation { .. })
        ));
    }

    #[test]
    fn test_partition_keeps_plain_lines() {
        let docs = vec![
            "Widget is a thing.".to_string(),
            "gen:keep".to_string(),
            "gen:".to_string(),
        ];
        let (plain, found) = AnnotationParser::new("gen").partition(docs).unwrap();
        assert_eq!(plain, vec!["Widget is a thing.", "gen:"]);
        assert_eq!(found, vec![Annotation::new("keep")]);
    }

    #[test]
    fn test_render_round_trips() {
        let ann = Annotation::new("route").with_args(["GET", "/a b"]);
        let text = ann.render("gen");
        assert_eq!(text, r#"gen:route GET "/a b""#);
        let parsed = AnnotationParser::new("gen").parse_line(&text).unwrap();
        assert_eq!(parsed, Some(ann));
    }

    #[test]
    fn test_find_annotations_by_name() {
        let doc = Doc(vec![
            Annotation::new("abc"),
            Annotation::new("test").with_arg("1"),
            Annotation::new("test").with_arg("2"),
        ]);
        let found = find_annotations("test", &doc);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].arg(0), Some("2"));
        assert!(find_annotations("missing", &doc).is_empty());
    }
}
