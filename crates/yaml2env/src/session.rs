//! The `Yaml2Env` state object and its load operations.
//!
//! Responsibilities:
//! - Own the settings, ledger and environment store used by every operation.
//! - Provide strict `load` / `require` and assertion operations returning
//!   `Result`, and lenient wrappers that log domain errors as warnings.
//! - Render plain-text summaries of the current state.
//!
//! Does NOT handle:
//! - YAML parsing (see `document.rs`) or the projection itself (see `projector.rs`).
//!
//! Invariants / Assumptions:
//! - Root is detected before the environment, and both before any file is read.
//! - Every successful read of a config file is recorded in the loaded-files
//!   ledger before projection, so a failed projection still counts as loaded.
//! - Lenient wrappers never swallow `InvalidArgument`.

use std::path::{Component, Path, PathBuf};

use crate::assertions;
use crate::constants::{NIL, UNSET};
use crate::detect;
use crate::document::load_config_for_env;
use crate::error::{Result, Yaml2EnvError};
use crate::keys::KeySpec;
use crate::ledger::Ledger;
use crate::projector::project;
use crate::settings::Settings;
use crate::store::{EnvStore, ProcessEnv};

/// Loads YAML config into an environment store.
///
/// Mutating operations take `&mut self`; share an instance across threads
/// by wrapping it in a `Mutex`.
#[derive(Debug)]
pub struct Yaml2Env<S: EnvStore = ProcessEnv> {
    settings: Settings,
    ledger: Ledger,
    store: S,
}

impl Default for Yaml2Env<ProcessEnv> {
    fn default() -> Self {
        Self::new()
    }
}

impl Yaml2Env<ProcessEnv> {
    /// Create an instance that writes to the real process environment.
    pub fn new() -> Self {
        Self::with_store(ProcessEnv::new())
    }
}

impl<S: EnvStore> Yaml2Env<S> {
    pub fn with_store(store: S) -> Self {
        Self {
            settings: Settings::new(),
            ledger: Ledger::new(),
            store,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Mutate settings in a block.
    pub fn configure<F: FnOnce(&mut Settings)>(&mut self, f: F) -> &mut Self {
        self.settings.configure(f);
        self
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Reset settings to their defaults and clear both ledgers.
    ///
    /// Variables already written to the store are left in place.
    pub fn restore_defaults(&mut self) {
        self.settings.restore_defaults();
        self.ledger.clear();
    }

    pub fn detect_root(&mut self) -> Result<PathBuf> {
        detect::detect_root(&mut self.settings, &self.store)
    }

    pub fn detect_env(&mut self) -> Result<String> {
        detect::detect_env(&mut self.settings, &self.store)
    }

    /// Resolve `path` against the detected root into a normalized absolute path.
    pub fn resolve_config_path(&mut self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let joined = self.detect_root()?.join(path.as_ref());
        let absolute = std::path::absolute(&joined).map_err(|e| {
            Yaml2EnvError::config_loading(&joined, format!("failed to resolve path: {e}"))
        })?;
        Ok(normalize(&absolute))
    }

    /// Load `path` for the detected environment and project `keys`.
    ///
    /// # Errors
    ///
    /// Propagates detection, loading and projection failures.
    pub fn load(&mut self, path: impl AsRef<Path>, keys: &KeySpec) -> Result<()> {
        self.detect_root()?;
        let env = self.detect_env()?;
        let path = self.resolve_config_path(path)?;

        let subtree = load_config_for_env(&path, &env).map_err(|e| e.with_env(&env))?;
        self.ledger.record_load(path, subtree.clone());

        project(
            &mut self.store,
            &mut self.ledger,
            &self.settings,
            &subtree,
            keys,
        )
    }

    /// Like [`Yaml2Env::load`], logging domain errors as warnings instead.
    pub fn load_lenient(&mut self, path: impl AsRef<Path>, keys: &KeySpec) -> Result<()> {
        let result = self.load(path, keys);
        self.lenient(result).map(|_| ())
    }

    /// Load `path` at most once per resolved absolute path.
    ///
    /// # Errors
    ///
    /// `AlreadyLoaded` if the path is already in the ledger, otherwise as
    /// [`Yaml2Env::load`].
    pub fn require(&mut self, path: impl AsRef<Path>, keys: &KeySpec) -> Result<()> {
        let path = self.resolve_config_path(path)?;
        if self.ledger.is_loaded(&path) {
            return Err(Yaml2EnvError::AlreadyLoaded { path });
        }
        self.load(path, keys)
    }

    /// Like [`Yaml2Env::require`]; returns `false` after logging a domain error.
    pub fn require_lenient(&mut self, path: impl AsRef<Path>, keys: &KeySpec) -> Result<bool> {
        let result = self.require(path, keys);
        self.lenient(result)
    }

    pub fn assert_keys(&self, names: &[&str]) -> Result<()> {
        assertions::assert_keys_present(&self.store, names)
    }

    /// Like [`Yaml2Env::assert_keys`]; returns `false` after logging a domain error.
    pub fn check_keys(&self, names: &[&str]) -> Result<bool> {
        self.lenient(self.assert_keys(names))
    }

    pub fn assert_values(&self, patterns: &[(&str, &str)]) -> Result<()> {
        assertions::assert_values_match(&self.store, patterns)
    }

    /// Like [`Yaml2Env::assert_values`]; returns `false` after logging a domain error.
    pub fn check_values(&self, patterns: &[(&str, &str)]) -> Result<bool> {
        self.lenient(self.assert_values(patterns))
    }

    fn lenient(&self, result: Result<()>) -> Result<bool> {
        match result {
            Ok(()) => Ok(true),
            Err(e) if e.is_domain() => {
                self.settings.log_warn(&format!("[yaml2env]: {e}"));
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Plain-text dump of environment, root, loaded files and loaded values.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![
            format!("env: {}", self.settings.env().unwrap_or(UNSET)),
            format!(
                "root: {}",
                self.settings
                    .root()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| UNSET.to_string())
            ),
        ];
        lines.extend(
            self.ledger
                .loaded_paths()
                .into_iter()
                .map(|path| format!("loaded: {}", path.display())),
        );
        lines.extend(self.ledger.loaded_env().iter().map(|(target, value)| {
            format!("{target} = {}", value.as_deref().unwrap_or(NIL))
        }));
        lines
    }

    /// Send [`Yaml2Env::summary_lines`] to the logger.
    pub fn log_summary(&self) {
        for line in self.summary_lines() {
            self.settings.log_info(&line);
        }
    }
}

/// Lexically resolve `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    normalized
}
