//! Root/environment settings and detection sources.
//!
//! Responsibilities:
//! - Hold the explicit root and environment, their configured fallbacks,
//!   the log sink, and the ordered detector lists.
//! - Provide explicit accessors, `with_*` builder methods, and
//!   `restore_defaults()`.
//!
//! Does NOT handle:
//! - Running detection (see `detect.rs`).
//!
//! Invariants:
//! - A fresh `Settings` has no root or environment, logs through
//!   `TracingSink`, and detects from `RACK_ROOT` / `RACK_ENV`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::constants::{DEFAULT_ENV_VAR, DEFAULT_ROOT_VAR};
use crate::detect::Detector;
use crate::logger::{LogSink, TracingSink};

/// Settings consulted by every load operation.
#[derive(Debug, Clone)]
pub struct Settings {
    root: Option<PathBuf>,
    env: Option<String>,
    default_root: Option<PathBuf>,
    default_env: Option<String>,
    logger: Option<Arc<dyn LogSink>>,
    root_detectors: Vec<Detector>,
    env_detectors: Vec<Detector>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    pub fn new() -> Self {
        Self {
            root: None,
            env: None,
            default_root: None,
            default_env: None,
            logger: Some(Arc::new(TracingSink)),
            root_detectors: vec![Detector::env_var(DEFAULT_ROOT_VAR)],
            env_detectors: vec![Detector::env_var(DEFAULT_ENV_VAR)],
        }
    }

    /// Reset every setting, including detectors and logger, to its default.
    pub fn restore_defaults(&mut self) {
        *self = Self::new();
    }

    /// Mutate settings in a block.
    pub fn configure<F: FnOnce(&mut Self)>(&mut self, f: F) -> &mut Self {
        f(self);
        self
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn set_root(&mut self, root: Option<PathBuf>) {
        self.root = root;
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn env(&self) -> Option<&str> {
        self.env.as_deref()
    }

    /// Alias for [`Settings::env`].
    pub fn environment(&self) -> Option<&str> {
        self.env()
    }

    pub fn set_env(&mut self, env: Option<String>) {
        self.env = env;
    }

    pub fn with_env(mut self, env: impl Into<String>) -> Self {
        self.env = Some(env.into());
        self
    }

    pub fn default_root(&self) -> Option<&Path> {
        self.default_root.as_deref()
    }

    pub fn set_default_root(&mut self, root: Option<PathBuf>) {
        self.default_root = root;
    }

    pub fn with_default_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.default_root = Some(root.into());
        self
    }

    pub fn default_env(&self) -> Option<&str> {
        self.default_env.as_deref()
    }

    pub fn set_default_env(&mut self, env: Option<String>) {
        self.default_env = env;
    }

    pub fn with_default_env(mut self, env: impl Into<String>) -> Self {
        self.default_env = Some(env.into());
        self
    }

    pub fn logger(&self) -> Option<&Arc<dyn LogSink>> {
        self.logger.as_ref()
    }

    pub fn set_logger(&mut self, logger: Option<Arc<dyn LogSink>>) {
        self.logger = logger;
    }

    pub fn with_logger(mut self, logger: Option<Arc<dyn LogSink>>) -> Self {
        self.logger = logger;
        self
    }

    /// Whether a log sink is installed.
    pub fn has_logger(&self) -> bool {
        self.logger.is_some()
    }

    pub(crate) fn log_info(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.info(message);
        }
    }

    pub(crate) fn log_warn(&self, message: &str) {
        if let Some(logger) = &self.logger {
            logger.warn(message);
        }
    }

    pub fn root_detectors(&self) -> &[Detector] {
        &self.root_detectors
    }

    /// Append a root detector after the existing ones.
    pub fn push_root_detector(&mut self, detector: Detector) {
        self.root_detectors.push(detector);
    }

    /// Replace the root detector list.
    pub fn with_root_detectors(mut self, detectors: Vec<Detector>) -> Self {
        self.root_detectors = detectors;
        self
    }

    pub fn env_detectors(&self) -> &[Detector] {
        &self.env_detectors
    }

    /// Append an environment detector after the existing ones.
    pub fn push_env_detector(&mut self, detector: Detector) {
        self.env_detectors.push(detector);
    }

    /// Replace the environment detector list.
    pub fn with_env_detectors(mut self, detectors: Vec<Detector>) -> Self {
        self.env_detectors = detectors;
        self
    }
}
