//! @acp:module "Struct Tags"
//! @acp:summary "Scanner and renderer for Go struct tag strings"
//! @acp:domain codegen
//! @acp:layer model

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::ast::{quote, unquote};

/// Ordered `key:"value"` pairs of a struct tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tags(IndexMap<String, String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the unquoted content of a tag literal.
    ///
    /// Pairs are space separated. Scanning stops at the first malformed
    /// pair and keeps what was read so far. A repeated key keeps its first
    /// value.
    pub fn parse(tag: &str) -> Self {
        let mut tags = IndexMap::new();
        let mut rest = tag;

        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                break;
            }

            let bytes = rest.as_bytes();
            let mut i = 0;
            while i < bytes.len()
                && bytes[i] > b' '
                && bytes[i] != b':'
                && bytes[i] != b'"'
                && bytes[i] != 0x7f
            {
                i += 1;
            }
            if i == 0 || i + 1 >= bytes.len() || bytes[i] != b':' || bytes[i + 1] != b'"' {
                break;
            }
            let key = &rest[..i];
            rest = &rest[i + 1..];

            let bytes = rest.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                break;
            }
            let Some(value) = unquote(&rest[..=i]) else {
                break;
            };
            rest = &rest[i + 1..];

            tags.entry(key.to_string()).or_insert(value);
        }

        Self(tags)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The tag as a Go string literal, raw when possible.
    pub fn literal(&self) -> String {
        let content = self.to_string();
        if content.contains('`') {
            quote(&content)
        } else {
            format!("`{content}`")
        }
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}:{}", key, quote(value))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pairs() {
        let tags = Tags::parse(r#"json:"id,omitempty" db:"user_id""#);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags.get("json"), Some("id,omitempty"));
        assert_eq!(tags.get("db"), Some("user_id"));
    }

    #[test]
    fn test_escaped_quote_inside_value() {
        let tags = Tags::parse(r#"doc:"say \"hi\"" x:"1""#);
        assert_eq!(tags.get("doc"), Some(r#"say "hi""#));
        assert_eq!(tags.get("x"), Some("1"));
    }

    #[test]
    fn test_malformed_tail_truncates() {
        let tags = Tags::parse(r#"json:"a" broken db:"b""#);
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.get("json"), Some("a"));

        let tags = Tags::parse(r#"json:"unterminated"#);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_first_value_wins() {
        let tags = Tags::parse(r#"json:"a" json:"b""#);
        assert_eq!(tags.get("json"), Some("a"));
    }

    #[test]
    fn test_literal_rendering() {
        let tags = Tags::new().with("json", "name").with("yaml", "n");
        assert_eq!(tags.literal(), r#"`json:"name" yaml:"n"`"#);
        assert_eq!(Tags::parse(&tags.to_string()), tags);
    }
}
