//! Root and environment auto-detection.
//!
//! Responsibilities:
//! - Define `Detector`, a named probe that may yield a root path or an
//!   environment name.
//! - Resolve the root and environment through the ordered chain:
//!   explicit setting > detectors in order > configured default.
//!
//! Does NOT handle:
//! - Knowledge of any host web framework. Embedding applications register
//!   their own probes (e.g. a Rails-like or Sinatra-like app object).
//!
//! Invariants:
//! - An explicit setting is never overwritten.
//! - Probes returning empty or whitespace-only strings are treated as no value.
//! - The resolved value is stored back into `Settings`, so detection runs at
//!   most once until the setting is cleared.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::constants::{ENV_SETTING, ROOT_SETTING};
use crate::error::{Result, Yaml2EnvError};
use crate::settings::Settings;
use crate::store::EnvStore;

type Probe = dyn Fn(&dyn EnvStore) -> Option<String> + Send + Sync;

/// A named source of a root path or environment name.
#[derive(Clone)]
pub struct Detector {
    name: String,
    probe: Arc<Probe>,
}

impl fmt::Debug for Detector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Detector").field("name", &self.name).finish()
    }
}

impl Detector {
    pub fn new<F>(name: impl Into<String>, probe: F) -> Self
    where
        F: Fn(&dyn EnvStore) -> Option<String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            probe: Arc::new(probe),
        }
    }

    /// Detector that reads the variable `var` from the environment store.
    pub fn env_var(var: &str) -> Self {
        let key = var.to_string();
        Self::new(var, move |store| store.get(&key))
    }

    /// Detector that always yields `value`.
    pub fn fixed(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        Self::new(name, move |_| Some(value.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the probe, filtering out blank results.
    pub fn probe(&self, store: &dyn EnvStore) -> Option<String> {
        (self.probe)(store).filter(|value| !value.trim().is_empty())
    }
}

fn first_detected(detectors: &[Detector], store: &dyn EnvStore) -> Option<String> {
    detectors.iter().find_map(|detector| {
        let value = detector.probe(store)?;
        tracing::debug!(detector = detector.name(), value = %value, "Detected value");
        Some(value)
    })
}

/// Resolve the config root, storing it into `settings`.
pub fn detect_root(settings: &mut Settings, store: &dyn EnvStore) -> Result<PathBuf> {
    if let Some(root) = settings.root() {
        return Ok(root.to_path_buf());
    }

    let root = first_detected(settings.root_detectors(), store)
        .map(PathBuf::from)
        .or_else(|| settings.default_root().map(|p| p.to_path_buf()))
        .ok_or(Yaml2EnvError::DetectionFailed {
            setting: ROOT_SETTING,
            hint: "settings.set_root(Some(\"/path/to/app\".into()))",
        })?;

    settings.set_root(Some(root.clone()));
    Ok(root)
}

/// Resolve the environment name, storing it into `settings`.
pub fn detect_env(settings: &mut Settings, store: &dyn EnvStore) -> Result<String> {
    if let Some(env) = settings.env() {
        return Ok(env.to_string());
    }

    let env = first_detected(settings.env_detectors(), store)
        .or_else(|| settings.default_env().map(str::to_string))
        .ok_or(Yaml2EnvError::DetectionFailed {
            setting: ENV_SETTING,
            hint: "settings.set_env(Some(\"development\".into()))",
        })?;

    settings.set_env(Some(env.clone()));
    Ok(env)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryEnv;
    use std::path::Path;

    fn rack_store() -> MemoryEnv {
        MemoryEnv::with_vars([
            ("RACK_ROOT", "/home/dev/rack-app"),
            ("RACK_ENV", "rack-env"),
        ])
    }

    fn framework_settings() -> Settings {
        Settings::new()
            .with_root_detectors(vec![
                Detector::env_var("RACK_ROOT"),
                Detector::fixed("rails", "/home/dev/rails-app"),
                Detector::fixed("sinatra", "/home/dev/sinatra-app"),
            ])
            .with_env_detectors(vec![
                Detector::env_var("RACK_ENV"),
                Detector::fixed("rails", "rails-env"),
                Detector::fixed("sinatra", "sinatra-env"),
            ])
    }

    #[test]
    fn test_env_var_detector_wins_first() {
        let mut settings = framework_settings();
        let store = rack_store();

        assert_eq!(
            detect_root(&mut settings, &store).unwrap(),
            PathBuf::from("/home/dev/rack-app")
        );
        assert_eq!(detect_env(&mut settings, &store).unwrap(), "rack-env");
        assert_eq!(settings.root(), Some(Path::new("/home/dev/rack-app")));
        assert_eq!(settings.env(), Some("rack-env"));
    }

    #[test]
    fn test_detectors_tried_in_order() {
        let mut settings = framework_settings();
        let store = MemoryEnv::new();

        assert_eq!(
            detect_root(&mut settings, &store).unwrap(),
            PathBuf::from("/home/dev/rails-app")
        );
        assert_eq!(detect_env(&mut settings, &store).unwrap(), "rails-env");
    }

    #[test]
    fn test_later_detector_used_when_earlier_yield_nothing() {
        let mut settings = Settings::new().with_env_detectors(vec![
            Detector::env_var("RACK_ENV"),
            Detector::new("rails", |_| None),
            Detector::new("blank", |_| Some("  ".to_string())),
            Detector::fixed("sinatra", "sinatra-env"),
        ]);

        assert_eq!(
            detect_env(&mut settings, &MemoryEnv::new()).unwrap(),
            "sinatra-env"
        );
    }

    #[test]
    fn test_falls_back_to_defaults() {
        let mut settings = Settings::new()
            .with_default_root("/srv/default")
            .with_default_env("development");
        let store = MemoryEnv::new();

        assert_eq!(
            detect_root(&mut settings, &store).unwrap(),
            PathBuf::from("/srv/default")
        );
        assert_eq!(detect_env(&mut settings, &store).unwrap(), "development");
    }

    #[test]
    fn test_empty_env_var_counts_as_unset() {
        let mut settings = Settings::new()
            .with_default_root("/srv/default")
            .with_default_env("development");
        let store = MemoryEnv::with_vars([("RACK_ROOT", ""), ("RACK_ENV", "")]);

        assert_eq!(
            detect_root(&mut settings, &store).unwrap(),
            PathBuf::from("/srv/default")
        );
        assert_eq!(detect_env(&mut settings, &store).unwrap(), "development");
    }

    #[test]
    fn test_explicit_setting_never_overwritten() {
        let mut settings = framework_settings().with_root("/explicit").with_env("explicit-env");
        let store = rack_store();

        assert_eq!(
            detect_root(&mut settings, &store).unwrap(),
            PathBuf::from("/explicit")
        );
        assert_eq!(detect_env(&mut settings, &store).unwrap(), "explicit-env");
    }

    #[test]
    fn test_detection_failed_when_no_source_applies() {
        let mut settings = Settings::new();
        let store = MemoryEnv::new();

        let root_err = detect_root(&mut settings, &store).unwrap_err();
        assert!(matches!(
            root_err,
            Yaml2EnvError::DetectionFailed { setting: "root", .. }
        ));

        let env_err = detect_env(&mut settings, &store).unwrap_err();
        assert!(matches!(
            env_err,
            Yaml2EnvError::DetectionFailed { setting: "env", .. }
        ));
        assert!(settings.root().is_none());
        assert!(settings.env().is_none());
    }
}
