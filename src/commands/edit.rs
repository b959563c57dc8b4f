//! @acp:module "Edit Commands"
//! @acp:summary "Apply one mutation to a Go file and preview or write the result"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use console::style;
use similar::TextDiff;

use super::inspect::open;
use crate::annotation::Annotation;
use crate::code::{Field, Import, Parameter, Tags};
use crate::config::Config;
use crate::source::Source;
use crate::types::Type;

/// Options shared by all edit commands
#[derive(Debug, Clone)]
pub struct EditOptions {
    /// Go file to edit
    pub file: PathBuf,
    /// Replace the file instead of printing a diff
    pub write: bool,
}

/// Kind of entity an annotation is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotateKind {
    Struct,
    Field,
    Interface,
    Method,
    Function,
}

impl FromStr for AnnotateKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "struct" | "structure" => Ok(AnnotateKind::Struct),
            "field" => Ok(AnnotateKind::Field),
            "interface" => Ok(AnnotateKind::Interface),
            "method" => Ok(AnnotateKind::Method),
            "function" | "func" => Ok(AnnotateKind::Function),
            _ => Err(format!("Unknown annotation target kind: {}", s)),
        }
    }
}

/// One mutation
#[derive(Debug, Clone)]
pub enum EditOperation {
    AddImport {
        path: String,
        alias: Option<String>,
    },
    AddField {
        structure: String,
        name: String,
        ty: String,
        tag: Option<String>,
    },
    AddParam {
        function: String,
        name: String,
        ty: String,
    },
    Annotate {
        target: String,
        kind: AnnotateKind,
        name: String,
        args: Vec<String>,
    },
}

/// Execute an edit command
pub fn execute_edit(options: EditOptions, operation: EditOperation, config: &Config) -> Result<()> {
    let mut source = open(&options.file, config)?;
    let before = source.text().to_string();

    apply(&mut source, operation)?;
    let after = source.render()?;

    if options.write {
        std::fs::write(&options.file, &after)?;
        println!("{} Updated {}", style("✓").green(), options.file.display());
        return Ok(());
    }

    if before == after {
        println!("{} No changes", style("•").dim());
        return Ok(());
    }
    let name = options.file.display().to_string();
    let diff = TextDiff::from_lines(&before, &after)
        .unified_diff()
        .header(&format!("{} (original)", name), &format!("{} (updated)", name))
        .to_string();
    print!("{}", diff);
    Ok(())
}

fn apply(source: &mut Source, operation: EditOperation) -> Result<()> {
    match operation {
        EditOperation::AddImport { path, alias } => {
            let mut import = Import::new(path);
            if let Some(alias) = alias {
                import = import.with_alias(alias);
            }
            source.append_import(&import)?;
        }
        EditOperation::AddField {
            structure,
            name,
            ty,
            tag,
        } => {
            let tags = tag.as_deref().map(Tags::parse).unwrap_or_default();
            let field = Field::new(name, Type::raw(ty)).with_tags(tags);
            source.append_field(&structure, &field)?;
        }
        EditOperation::AddParam { function, name, ty } => {
            source.append_parameter(&function, &Parameter::new(name, Type::raw(ty)))?;
        }
        EditOperation::Annotate {
            target,
            kind,
            name,
            args,
        } => {
            let annotation = Annotation::new(name).with_args(args);
            match kind {
                AnnotateKind::Struct => source.annotate_structure(&target, &annotation)?,
                AnnotateKind::Interface => source.annotate_interface(&target, &annotation)?,
                AnnotateKind::Function => source.annotate_function(&target, &annotation)?,
                AnnotateKind::Field => {
                    let (parent, member) = split_member(&target)?;
                    source.annotate_field(parent, member, &annotation)?;
                }
                AnnotateKind::Method => {
                    let (parent, member) = split_member(&target)?;
                    source.annotate_method(parent, member, &annotation)?;
                }
            }
        }
    }
    Ok(())
}

/// `Parent.member` into its two halves.
fn split_member(target: &str) -> Result<(&str, &str)> {
    target
        .split_once('.')
        .filter(|(parent, member)| !parent.is_empty() && !member.is_empty())
        .ok_or_else(|| anyhow!("expected `Parent.member`, got `{}`", target))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotate_kind_from_str() {
        assert_eq!("Struct".parse::<AnnotateKind>(), Ok(AnnotateKind::Struct));
        assert_eq!("func".parse::<AnnotateKind>(), Ok(AnnotateKind::Function));
        assert!("enum".parse::<AnnotateKind>().is_err());
    }

    #[test]
    fn test_split_member() {
        assert_eq!(split_member("User.Name").unwrap(), ("User", "Name"));
        assert!(split_member("User").is_err());
        assert!(split_member(".Name").is_err());
    }

    #[test]
    fn test_write_mode_updates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("user.go");
        std::fs::write(&path, "package models\n\ntype User struct {\n\tID int\n}\n").unwrap();

        let options = EditOptions {
            file: path.clone(),
            write: true,
        };
        let operation = EditOperation::AddField {
            structure: "User".to_string(),
            name: "Email".to_string(),
            ty: "string".to_string(),
            tag: Some(r#"json:"email""#.to_string()),
        };
        execute_edit(options, operation, &Config::default()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "package models\n\ntype User struct {\n\tID int\n\tEmail string `json:\"email\"`\n}\n"
        );
    }
}
