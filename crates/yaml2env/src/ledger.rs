//! Records of what has already been loaded and projected.
//!
//! Responsibilities:
//! - Track the last value written for every projected target.
//! - Track every config file loaded, keyed by absolute path, together with
//!   the subtree loaded from it.
//!
//! Invariants:
//! - Both maps only grow; nothing is removed apart from an explicit `clear()`.
//! - Iteration follows insertion order.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::document::EnvSubtree;

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    loaded_env: IndexMap<String, Option<String>>,
    loaded_files: IndexMap<PathBuf, EnvSubtree>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `subtree` under `path`, replacing any earlier entry.
    pub fn record_load(&mut self, path: impl Into<PathBuf>, subtree: EnvSubtree) {
        self.loaded_files.insert(path.into(), subtree);
    }

    pub fn is_loaded(&self, path: &Path) -> bool {
        self.loaded_files.contains_key(path)
    }

    pub fn loaded_paths(&self) -> Vec<&Path> {
        self.loaded_files.keys().map(PathBuf::as_path).collect()
    }

    pub fn loaded_subtree(&self, path: &Path) -> Option<&EnvSubtree> {
        self.loaded_files.get(path)
    }

    /// Record the value written for `target` (`None` = missing).
    pub fn record_value(&mut self, target: impl Into<String>, value: Option<String>) {
        self.loaded_env.insert(target.into(), value);
    }

    /// Last non-empty value recorded for `target`.
    pub fn loaded_value(&self, target: &str) -> Option<&str> {
        self.loaded_env
            .get(target)
            .and_then(|v| v.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn loaded_env(&self) -> &IndexMap<String, Option<String>> {
        &self.loaded_env
    }

    pub fn clear(&mut self) {
        self.loaded_env.clear();
        self.loaded_files.clear();
    }
}
