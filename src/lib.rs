#![forbid(unsafe_code)]

//! @acp:module "gosource Library"
//! @acp:summary "Structured, mutable model of a Go source file"
//! @acp:domain codegen
//! @acp:layer api
//! @acp:stability stable
//!
//! # gosource
//!
//! Reads a Go file into a position-indexed model of its structs,
//! interfaces, functions and imports, exposes doc-comment annotations, and
//! appends new code by splicing text and re-parsing.
//!
//! ## Features
//!
//! - **tree-sitter front-end**: whole-file parses with exact byte spans
//! - **Annotations**: `gen:name args` lines in doc comments
//! - **Safe edits**: every mutation re-parses; failures keep the last good snapshot
//!
//! ## Example
//!
//! ```rust,no_run
//! use gosource::{find_annotations, Import, Source};
//!
//! fn main() -> gosource::Result<()> {
//!     let mut source = Source::open("models/user.go")?;
//!
//!     for structure in source.structures() {
//!         for ann in find_annotations("table", structure) {
//!             println!("{} -> {:?}", structure.name, ann.args);
//!         }
//!     }
//!
//!     source.append_import(&Import::new("fmt"))?;
//!     print!("{}", source.render()?);
//!     Ok(())
//! }
//! ```

pub mod annotation;
pub mod ast;
pub mod build;
pub mod code;
pub mod commands;
pub mod config;
pub mod error;
pub mod file;
pub mod format;
pub mod parse;
pub mod source;
pub mod types;

// Re-exports
pub use annotation::{find_annotations, Annotated, Annotation, AnnotationParser};
pub use ast::AstParser;
pub use build::{BuildContext, Cached, GoBuildContext, ImportInfo, StaticBuildContext};
pub use code::{Field, Import, Method, Parameter, RawCode, Struct, Tags};
pub use config::Config;
pub use error::{Result, SourceError, UnsupportedType};
pub use file::{
    File, Function, Interface, InterfaceMethod, Named, Span, Spanned, Structure, StructureField,
};
pub use format::{Formatter, FormatterKind, Gofmt, Verbatim};
pub use parse::Parser;
pub use source::{Source, SourceBuilder};
pub use types::{Type, TypeResolver};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
