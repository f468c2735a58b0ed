//! Where component symbols come from.
//!
//! The resolver only sees the [`SymbolLibrary`] trait. [`DirectoryLibrary`]
//! searches library roots on disk; [`MemoryLibrary`] serves symbols from a
//! map and is handy for tests and for callers that bundle their symbols.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::errors::ResolveError;

/// Text of a located symbol and where it was found
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFile {
    /// Path or other human-readable origin, used in diagnostics
    pub origin: String,
    pub text: String,
}

pub trait SymbolLibrary {
    /// Look a symbol up by its file name. `Ok(None)` means not found.
    fn find(&self, name: &str) -> Result<Option<SymbolFile>, ResolveError>;
}

/// Ordered library roots searched depth-first; the first match wins
#[derive(Debug, Clone, Default)]
pub struct DirectoryLibrary {
    roots: Vec<PathBuf>,
    excluded: Vec<String>,
}

impl DirectoryLibrary {
    pub fn new(roots: Vec<PathBuf>, excluded: Vec<String>) -> Self {
        DirectoryLibrary { roots, excluded }
    }

    pub fn from_config(config: &Config) -> Self {
        DirectoryLibrary::new(config.symbol_roots.clone(), config.excluded_dirs.clone())
    }

    /// Path of the first file called `name` under any root
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        self.roots.iter().find_map(|root| self.locate_in(root, name))
    }

    fn locate_in(&self, dir: &Path, name: &str) -> Option<PathBuf> {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(_e) => {
                crate::log::debug!(dir = %dir.display(), error = %_e, "skipping unreadable library directory");
                return None;
            }
        };
        // Sorted so that "first match" does not depend on directory order.
        // Symlinked directories are not followed.
        let mut subdirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_dir()))
            .filter(|entry| {
                let file_name = entry.file_name();
                !self.excluded.iter().any(|ex| file_name.to_str() == Some(ex.as_str()))
            })
            .map(|entry| entry.path())
            .collect();
        subdirs.sort();

        subdirs.iter().find_map(|sub| self.locate_in(sub, name))
    }
}

impl SymbolLibrary for DirectoryLibrary {
    fn find(&self, name: &str) -> Result<Option<SymbolFile>, ResolveError> {
        let Some(path) = self.locate(name) else {
            return Ok(None);
        };
        let origin = path.display().to_string();
        crate::log::debug!(symbol = name, path = %origin, "located symbol");
        let text = fs::read_to_string(&path).map_err(|source| ResolveError::SymbolRead {
            path: origin.clone(),
            source,
        })?;
        Ok(Some(SymbolFile { origin, text }))
    }
}

/// Symbols keyed by file name
#[derive(Debug, Clone, Default)]
pub struct MemoryLibrary {
    symbols: HashMap<String, String>,
}

impl MemoryLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.symbols.insert(name.into(), text.into());
        self
    }

    pub fn with(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }
}

impl SymbolLibrary for MemoryLibrary {
    fn find(&self, name: &str) -> Result<Option<SymbolFile>, ResolveError> {
        Ok(self.symbols.get(name).map(|text| SymbolFile {
            origin: format!("memory:{name}"),
            text: text.clone(),
        }))
    }
}
