#![forbid(unsafe_code)]
//! gosource Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

use gosource::commands::{
    execute_edit, execute_find, execute_inspect, AnnotateKind, EditOperation, EditOptions,
    FindOptions, InspectOptions,
};
use gosource::Config;

#[derive(Parser)]
#[command(name = "gosource")]
#[command(about = "Inspect and extend Go source files through a structured model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".gosource.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show package, imports, declarations and annotations
    Inspect {
        /// Go file to inspect
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entities carrying an annotation
    Find {
        /// Go file to search
        file: PathBuf,

        /// Annotation name (without marker)
        annotation: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add an import
    AddImport {
        file: PathBuf,

        /// Import path
        path: String,

        /// Local package name
        #[arg(long)]
        alias: Option<String>,

        /// Write the result instead of printing a diff
        #[arg(short, long)]
        write: bool,
    },

    /// Append a field to a struct
    AddField {
        file: PathBuf,

        /// Struct name
        structure: String,

        /// Field name
        name: String,

        /// Field type as Go source
        #[arg(value_name = "TYPE")]
        ty: String,

        /// Struct tag content, e.g. json:"id"
        #[arg(long)]
        tag: Option<String>,

        /// Write the result instead of printing a diff
        #[arg(short, long)]
        write: bool,
    },

    /// Append a parameter to a function or method
    AddParam {
        file: PathBuf,

        /// Function name, or Recv.Name for methods
        function: String,

        /// Parameter name
        name: String,

        /// Parameter type as Go source
        #[arg(value_name = "TYPE")]
        ty: String,

        /// Write the result instead of printing a diff
        #[arg(short, long)]
        write: bool,
    },

    /// Attach an annotation to a declaration or member
    Annotate {
        file: PathBuf,

        /// Struct, Struct.field, Interface, Interface.Method or function
        target: String,

        /// Annotation name
        name: String,

        /// Annotation arguments
        args: Vec<String>,

        /// Target kind (struct, field, interface, method, function)
        #[arg(short, long, default_value = "struct")]
        kind: String,

        /// Write the result instead of printing a diff
        #[arg(short, long)]
        write: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        if cli.verbose {
            eprintln!(
                "{} No {} found, using defaults",
                style("•").dim(),
                cli.config.display()
            );
        }
        Config::default()
    };

    match cli.command {
        Commands::Inspect { file, json } => {
            execute_inspect(InspectOptions { file, json }, &config)?;
        }

        Commands::Find {
            file,
            annotation,
            json,
        } => {
            let options = FindOptions {
                file,
                annotation,
                json,
            };
            execute_find(options, &config)?;
        }

        Commands::AddImport {
            file,
            path,
            alias,
            write,
        } => {
            let operation = EditOperation::AddImport { path, alias };
            execute_edit(EditOptions { file, write }, operation, &config)?;
        }

        Commands::AddField {
            file,
            structure,
            name,
            ty,
            tag,
            write,
        } => {
            let operation = EditOperation::AddField {
                structure,
                name,
                ty,
                tag,
            };
            execute_edit(EditOptions { file, write }, operation, &config)?;
        }

        Commands::AddParam {
            file,
            function,
            name,
            ty,
            write,
        } => {
            let operation = EditOperation::AddParam { function, name, ty };
            execute_edit(EditOptions { file, write }, operation, &config)?;
        }

        Commands::Annotate {
            file,
            target,
            name,
            args,
            kind,
            write,
        } => {
            let kind = kind
                .parse::<AnnotateKind>()
                .map_err(|e: String| anyhow::anyhow!(e))?;
            let operation = EditOperation::Annotate {
                target,
                kind,
                name,
                args,
            };
            execute_edit(EditOptions { file, write }, operation, &config)?;
        }
    }

    Ok(())
}
