use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ast::quote;

/// @acp:summary "Import spec with optional build-context resolution"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    /// Local name, including `_` and `.`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub path: String,
    /// Package name declared by the imported package, when resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Directory holding the imported package, when resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
            package: None,
            dir: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Resolved package name, or a guess from the import path.
    pub fn package_name(&self) -> String {
        self.package
            .clone()
            .unwrap_or_else(|| guess_package_name(&self.path))
    }

    /// Identifier that qualifies names from this import in source code.
    ///
    /// Blank and dot imports have none.
    pub fn qualifier(&self) -> Option<String> {
        match self.alias.as_deref() {
            Some("_") | Some(".") => None,
            Some(alias) => Some(alias.to_string()),
            None => Some(self.package_name()),
        }
    }

    /// Same alias and path, ignoring resolution.
    pub fn same_spec(&self, other: &Import) -> bool {
        self.path == other.path && self.alias == other.alias
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(alias) = &self.alias {
            write!(f, "{alias} ")?;
        }
        f.write_str(&quote(&self.path))
    }
}

/// Last path element, skipping `/vN` major-version elements and
/// `.vN` suffixes.
pub fn guess_package_name(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let mut last = segments.pop().unwrap_or(path);
    if is_major_version(last) {
        if let Some(previous) = segments.pop() {
            last = previous;
        }
    }
    if let Some((base, version)) = last.rsplit_once('.') {
        if is_major_version(version) {
            last = base;
        }
    }
    last.to_string()
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_package_name() {
        assert_eq!(guess_package_name("fmt"), "fmt");
        assert_eq!(guess_package_name("net/http"), "http");
        assert_eq!(guess_package_name("github.com/org/lib/v2"), "lib");
        assert_eq!(guess_package_name("gopkg.in/yaml.v3"), "yaml");
    }

    #[test]
    fn test_qualifier_prefers_alias() {
        let imp = Import::new("github.com/stretchr/testify/assert");
        assert_eq!(imp.qualifier().as_deref(), Some("assert"));
        assert_eq!(imp.clone().with_alias("a").qualifier().as_deref(), Some("a"));
        assert_eq!(imp.clone().with_alias("_").qualifier(), None);
        assert_eq!(imp.with_alias(".").qualifier(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Import::new("fmt").to_string(), r#""fmt""#);
        assert_eq!(
            Import::new("net/http").with_alias("h").to_string(),
            r#"h "net/http""#
        );
    }
}
