//! @acp:module "Inspect Command"
//! @acp:summary "Print the model of a Go file and search it by annotation"
//! @acp:domain cli
//! @acp:layer handler

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;

use crate::annotation::{find_annotations, Annotation};
use crate::code::Parameter;
use crate::config::Config;
use crate::source::Source;

/// Options for the inspect command
#[derive(Debug, Clone)]
pub struct InspectOptions {
    /// Go file to inspect
    pub file: PathBuf,
    /// Output as JSON
    pub json: bool,
}

/// Execute the inspect command
pub fn execute_inspect(options: InspectOptions, config: &Config) -> Result<()> {
    let source = open(&options.file, config)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(source.file())?);
        return Ok(());
    }

    println!("{} {}", style("package").dim(), style(source.package()).bold());

    if !source.imports().is_empty() {
        println!();
        println!("{}", style("Imports").cyan());
        for import in source.imports() {
            let resolved = match &import.dir {
                Some(dir) => format!(" ({})", dir.display()),
                None => String::new(),
            };
            println!("  {}{}", import, style(resolved).dim());
        }
    }

    for st in source.structures() {
        println!();
        println!("{} {}", style("struct").cyan(), style(&st.name).bold());
        print_annotations(&st.annotations, "  ", &config.marker);
        for field in &st.fields {
            let tag = if field.tags.is_empty() {
                String::new()
            } else {
                format!(" {}", field.tags.literal())
            };
            println!("  {} {}{}", field.name, field.ty, style(tag).dim());
            print_annotations(&field.annotations, "    ", &config.marker);
        }
    }

    for it in source.interfaces() {
        println!();
        println!("{} {}", style("interface").cyan(), style(&it.name).bold());
        print_annotations(&it.annotations, "  ", &config.marker);
        for embed in &it.embeds {
            println!("  {}", style(embed).dim());
        }
        for method in &it.methods {
            println!("  {}{}", method.name, signature(&method.params, &method.results));
            print_annotations(&method.annotations, "    ", &config.marker);
        }
    }

    if source.functions().next().is_some() {
        println!();
        println!("{}", style("Functions").cyan());
        for func in source.functions() {
            println!("  {}{}", func.key(), signature(&func.params, &func.results));
            print_annotations(&func.annotations, "    ", &config.marker);
        }
    }

    Ok(())
}

/// Options for the find command
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Go file to search
    pub file: PathBuf,
    /// Annotation name
    pub annotation: String,
    /// Output as JSON
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct Hit<'a> {
    kind: &'static str,
    name: String,
    annotation: &'a Annotation,
}

/// Execute the find command
pub fn execute_find(options: FindOptions, config: &Config) -> Result<()> {
    let source = open(&options.file, config)?;
    let name = options.annotation.as_str();
    let mut hits = Vec::new();

    for st in source.structures() {
        for ann in find_annotations(name, st) {
            hits.push(Hit { kind: "struct", name: st.name.clone(), annotation: ann });
        }
        for field in &st.fields {
            for ann in find_annotations(name, field) {
                let name = format!("{}.{}", st.name, field.name);
                hits.push(Hit { kind: "field", name, annotation: ann });
            }
        }
    }
    for it in source.interfaces() {
        for ann in find_annotations(name, it) {
            hits.push(Hit { kind: "interface", name: it.name.clone(), annotation: ann });
        }
        for method in &it.methods {
            for ann in find_annotations(name, method) {
                let name = format!("{}.{}", it.name, method.name);
                hits.push(Hit { kind: "method", name, annotation: ann });
            }
        }
    }
    for func in source.functions() {
        for ann in find_annotations(name, func) {
            hits.push(Hit { kind: "function", name: func.key(), annotation: ann });
        }
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("{} No `{}` annotations found", style("•").dim(), name);
        return Ok(());
    }
    for hit in &hits {
        println!(
            "{} {} {}",
            style(hit.kind).dim(),
            style(&hit.name).bold(),
            hit.annotation.render(&config.marker)
        );
    }
    Ok(())
}

pub(crate) fn open(file: &Path, config: &Config) -> Result<Source> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    Source::with_config(text, config)
        .with_context(|| format!("cannot load {}", file.display()))
}

fn print_annotations(annotations: &[Annotation], indent: &str, marker: &str) {
    for ann in annotations {
        println!("{}{}", indent, style(ann.render(marker)).yellow());
    }
}

fn signature(params: &[Parameter], results: &[Parameter]) -> String {
    let join = |list: &[Parameter]| {
        list.iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    match results {
        [] => format!("({})", join(params)),
        [single] if single.name.is_none() => format!("({}) {}", join(params), single),
        _ => format!("({}) ({})", join(params), join(results)),
    }
}
