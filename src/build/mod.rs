//! @acp:module "Build Context"
//! @acp:summary "Resolves import paths to package directories and names"
//! @acp:domain codegen
//! @acp:layer service
//!
//! Resolution only feeds qualifier matching in the type resolver. A failure
//! is never fatal to parsing: the caller falls back to a package name
//! guessed from the import path.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::ast::AstParser;
use crate::config::BuildConfig;
use crate::error::{Result, SourceError};

/// A resolved import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportInfo {
    pub dir: PathBuf,
    /// Name from the package clause
    pub name: String,
}

impl ImportInfo {
    pub fn new(dir: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            name: name.into(),
        }
    }
}

/// @acp:summary "Pluggable import resolver"
pub trait BuildContext: Send + Sync {
    fn import(&self, path: &str) -> Result<ImportInfo>;

    fn cwd(&self) -> Result<PathBuf>;
}

fn unresolved(path: &str, reason: impl Into<String>) -> SourceError {
    SourceError::ImportResolution {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// @acp:summary "Filesystem lookup under GOROOT, vendor directories and GOPATH"
#[derive(Clone)]
pub struct GoBuildContext {
    goroot: Option<PathBuf>,
    gopath: Vec<PathBuf>,
    cwd: PathBuf,
    ast: AstParser,
}

impl GoBuildContext {
    pub fn new(goroot: Option<PathBuf>, gopath: Vec<PathBuf>, cwd: PathBuf) -> Self {
        Self {
            goroot,
            gopath,
            cwd,
            ast: AstParser::new(),
        }
    }

    /// `GOROOT`, `GOPATH` (default `~/go`) and the process directory,
    /// overridden by configured values.
    pub fn with_config(config: &BuildConfig) -> Self {
        let goroot = config
            .goroot
            .clone()
            .or_else(|| std::env::var_os("GOROOT").map(PathBuf::from));

        let gopath = if !config.gopath.is_empty() {
            config.gopath.clone()
        } else {
            match std::env::var_os("GOPATH") {
                Some(value) if !value.is_empty() => std::env::split_paths(&value).collect(),
                _ => dirs::home_dir()
                    .map(|home| vec![home.join("go")])
                    .unwrap_or_default(),
            }
        };

        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(goroot, gopath, cwd)
    }

    /// Candidate directories for `path`, in lookup order.
    fn candidates(&self, path: &str) -> Vec<PathBuf> {
        if path.starts_with("./") || path.starts_with("../") {
            return vec![self.cwd.join(path)];
        }

        let mut dirs = Vec::new();
        if let Some(goroot) = &self.goroot {
            dirs.push(goroot.join("src").join(path));
        }
        for ancestor in self.cwd.ancestors() {
            dirs.push(ancestor.join("vendor").join(path));
        }
        for root in &self.gopath {
            dirs.push(root.join("src").join(path));
        }
        dirs
    }

    /// Package clause of the first non-test Go file in `dir`.
    fn package_in(&self, dir: &Path) -> Result<Option<String>> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension().is_some_and(|ext| ext == "go")
                    && !path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.ends_with("_test.go"))
            })
            .collect();
        files.sort();

        for file in files {
            let text = std::fs::read_to_string(&file)?;
            if let Some(name) = self.ast.package_name(&text) {
                return Ok(Some(name));
            }
        }
        Ok(None)
    }
}

impl BuildContext for GoBuildContext {
    fn import(&self, path: &str) -> Result<ImportInfo> {
        for dir in self.candidates(path) {
            if !dir.is_dir() {
                continue;
            }
            match self.package_in(&dir)? {
                Some(name) => return Ok(ImportInfo::new(dir, name)),
                None => tracing::debug!(dir = %dir.display(), "no Go package in candidate directory"),
            }
        }
        Err(unresolved(path, "package not found in GOROOT, vendor or GOPATH"))
    }

    fn cwd(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}

/// @acp:summary "Fixed import table for tests and offline use"
#[derive(Debug, Clone, Default)]
pub struct StaticBuildContext {
    packages: HashMap<String, ImportInfo>,
    cwd: PathBuf,
}

impl StaticBuildContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_package(
        mut self,
        path: impl Into<String>,
        name: impl Into<String>,
        dir: impl Into<PathBuf>,
    ) -> Self {
        self.packages.insert(path.into(), ImportInfo::new(dir, name));
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }
}

impl BuildContext for StaticBuildContext {
    fn import(&self, path: &str) -> Result<ImportInfo> {
        self.packages
            .get(path)
            .cloned()
            .ok_or_else(|| unresolved(path, "not in import table"))
    }

    fn cwd(&self) -> Result<PathBuf> {
        Ok(self.cwd.clone())
    }
}

/// @acp:summary "Memoises another context per import path"
pub struct Cached<C> {
    inner: C,
    memo: Mutex<HashMap<String, std::result::Result<ImportInfo, String>>>,
}

impl<C: BuildContext> Cached<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            memo: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: BuildContext> BuildContext for Cached<C> {
    fn import(&self, path: &str) -> Result<ImportInfo> {
        let mut memo = self.memo.lock().unwrap_or_else(|e| e.into_inner());
        let entry = memo.entry(path.to_string()).or_insert_with(|| {
            self.inner.import(path).map_err(|err| match err {
                SourceError::ImportResolution { reason, .. } => reason,
                other => other.to_string(),
            })
        });
        entry.clone().map_err(|reason| unresolved(path, reason))
    }

    fn cwd(&self) -> Result<PathBuf> {
        self.inner.cwd()
    }
}
