//! @acp:module "Commands"
//! @acp:summary "CLI command implementations"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Provides implementations for all CLI commands.
//! Read-only commands live in `inspect`, mutations in `edit`.

pub mod edit;
pub mod inspect;

pub use edit::{execute_edit, AnnotateKind, EditOperation, EditOptions};
pub use inspect::{execute_find, execute_inspect, FindOptions, InspectOptions};
