//! @acp:module "Formatters"
//! @acp:summary "Pretty-printers applied to rendered output only"
//! @acp:domain codegen
//! @acp:layer service

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SourceError};

/// Canonicalises final output text. Never used on internal re-parses.
pub trait Formatter: Send + Sync {
    fn format(&self, text: &str) -> Result<String>;
}

/// Trims trailing whitespace and ends the text with exactly one newline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Formatter for Verbatim {
    fn format(&self, text: &str) -> Result<String> {
        let mut out = String::with_capacity(text.len() + 1);
        for line in text.trim_end().lines() {
            out.push_str(line.trim_end());
            out.push('\n');
        }
        Ok(out)
    }
}

/// @acp:summary "Pipes text through an external gofmt binary"
#[derive(Debug, Clone)]
pub struct Gofmt {
    program: PathBuf,
}

impl Gofmt {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Gofmt {
    fn default() -> Self {
        Self::new("gofmt")
    }
}

impl Formatter for Gofmt {
    fn format(&self, text: &str) -> Result<String> {
        let mut child = Command::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SourceError::Format(format!("cannot run {}: {e}", self.program.display())))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Format(stderr.trim().to_string()));
        }
        String::from_utf8(output.stdout)
            .map_err(|e| SourceError::Format(format!("non UTF-8 output: {e}")))
    }
}

/// Formatter selection in configuration files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatterKind {
    #[default]
    Verbatim,
    Gofmt,
}

impl FormatterKind {
    pub fn formatter(self) -> Box<dyn Formatter> {
        match self {
            FormatterKind::Verbatim => Box::new(Verbatim),
            FormatterKind::Gofmt => Box::new(Gofmt::default()),
        }
    }
}
