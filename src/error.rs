//! @acp:module "Errors"
//! @acp:summary "Error taxonomy for parsing, lookup and mutation of Go sources"
//! @acp:domain codegen
//! @acp:layer model

use thiserror::Error;

/// @acp:summary "Errors surfaced to callers of the library"
#[derive(Debug, Error)]
pub enum SourceError {
    /// The front-end rejected the text. No partial model is produced.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("no package clause found")]
    MissingPackage,

    #[error("no {kind} with name `{name}` found")]
    NotFound { kind: &'static str, name: String },

    #[error("{kind} with name `{name}` not found in {parent_kind} `{parent}`")]
    MemberNotFound {
        kind: &'static str,
        name: String,
        parent_kind: &'static str,
        parent: String,
    },

    #[error("function `{name}` has no body")]
    NoBody { name: String },

    /// Only raised when annotations are parsed in strict mode.
    #[error("invalid annotation `{line}`: {reason}")]
    Annotation { line: String, reason: String },

    #[error("cannot resolve import `{path}`: {reason}")]
    ImportResolution { path: String, reason: String },

    #[error("formatter failed: {0}")]
    Format(String),

    #[error("cannot load Go grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SourceError {
    pub(crate) fn not_found(kind: &'static str, name: &str) -> Self {
        SourceError::NotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn member_not_found(
        kind: &'static str,
        name: &str,
        parent_kind: &'static str,
        parent: &str,
    ) -> Self {
        SourceError::MemberNotFound {
            kind,
            name: name.to_string(),
            parent_kind,
            parent: parent.to_string(),
        }
    }

    /// True for the lookup failures of the mutation API.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SourceError::NotFound { .. } | SourceError::MemberNotFound { .. }
        )
    }
}

/// A type expression the resolver cannot turn into a [`crate::Type`].
///
/// Extractors recover from it by skipping the member; it never reaches callers.
#[derive(Debug, Clone, Error)]
#[error("unsupported type expression `{text}`")]
pub struct UnsupportedType {
    pub text: String,
}

pub type Result<T> = std::result::Result<T, SourceError>;
