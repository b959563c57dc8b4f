//! @acp:module "Configuration"
//! @acp:summary "Tool configuration loading and defaults"
//! @acp:domain codegen
//! @acp:layer config

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub use crate::format::FormatterKind;

/// Default configuration file name
pub const CONFIG_FILE: &str = ".gosource.json";

fn default_marker() -> String {
    "gen".to_string()
}

fn default_indent() -> String {
    "\t".to_string()
}

/// @acp:summary "Main gosource configuration structure"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Annotation marker, the `gen` in `gen:name args`
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Fail parsing on malformed marker lines instead of ignoring them
    #[serde(default)]
    pub strict_annotations: bool,

    /// Indentation used for inserted members and statements
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Pretty-printer applied on render
    #[serde(default)]
    pub formatter: FormatterKind,

    /// Import resolution overrides
    #[serde(default)]
    pub build: BuildConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            strict_annotations: false,
            indent: default_indent(),
            formatter: FormatterKind::default(),
            build: BuildConfig::default(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Load from default location or fall back to defaults"
    pub fn load_or_default() -> Self {
        Self::load(CONFIG_FILE).unwrap_or_default()
    }
}

/// Build context settings. Empty values fall back to the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goroot: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub gopath: Vec<PathBuf>,
}
