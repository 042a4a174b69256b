//! Error types for detection, loading, projection and assertions.
//!
//! Responsibilities:
//! - Define one error enum covering every failure yaml2env can report.
//! - Classify errors into domain failures (swallowed by lenient wrappers)
//!   and programmer errors (always propagated).
//!
//! Does NOT handle:
//! - Logging of errors (see `session.rs` for the lenient wrappers).
//!
//! Invariants:
//! - Every variant carries enough context to diagnose the failure without
//!   re-running: the offending key, path, query or loaded values.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T, E = Yaml2EnvError> = std::result::Result<T, E>;

/// Errors that can occur while loading YAML config into the environment.
#[derive(Error, Debug)]
pub enum Yaml2EnvError {
    /// Root or environment could not be resolved from any source.
    #[error(
        "Failed to auto-detect yaml2env {setting}. Specify it before loading any configs, e.g. {hint}"
    )]
    DetectionFailed {
        setting: &'static str,
        hint: &'static str,
    },

    /// Config file is missing, unreadable, or not a mapping of mappings.
    #[error("Failed to load config{} from {}: {reason}", env_suffix(.env), .path.display())]
    ConfigLoading {
        path: PathBuf,
        env: Option<String>,
        reason: String,
    },

    /// A required target had no value after projection.
    #[error("ENV variable '{key}' needs to be set. Query: {targets}. Found: {found}")]
    MissingRequiredKey {
        key: String,
        targets: String,
        found: String,
    },

    /// Asserted keys are absent from the environment.
    ///
    /// The assertion-side form of a missing required key; see
    /// [`Yaml2EnvError::is_missing_key`] to match both.
    #[error("Missing ENV keys: {}", .keys.join(", "))]
    MissingKeys { keys: Vec<String> },

    /// A value failed its pattern check or cannot be stored.
    #[error("Invalid ENV value: {message}")]
    InvalidConfigValue { message: String },

    /// A load-once path was already recorded in the ledger.
    #[error("Config already loaded: {}", .path.display())]
    AlreadyLoaded { path: PathBuf },

    /// Malformed call, e.g. an empty key list or an uncompilable pattern.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl Yaml2EnvError {
    /// Returns `true` for the error kinds lenient wrappers swallow.
    ///
    /// `InvalidArgument` signals a bad call shape and is never swallowed.
    pub fn is_domain(&self) -> bool {
        !matches!(self, Yaml2EnvError::InvalidArgument(_))
    }

    /// Returns `true` when a required or asserted key has no value.
    pub fn is_missing_key(&self) -> bool {
        matches!(
            self,
            Yaml2EnvError::MissingRequiredKey { .. } | Yaml2EnvError::MissingKeys { .. }
        )
    }

    pub(crate) fn config_loading(path: &Path, reason: impl Into<String>) -> Self {
        Yaml2EnvError::ConfigLoading {
            path: path.to_path_buf(),
            env: None,
            reason: reason.into(),
        }
    }

    /// Attach the environment name to a `ConfigLoading` error.
    pub(crate) fn with_env(self, env_name: &str) -> Self {
        match self {
            Yaml2EnvError::ConfigLoading { path, reason, .. } => Yaml2EnvError::ConfigLoading {
                path,
                env: Some(env_name.to_string()),
                reason,
            },
            other => other,
        }
    }
}

fn env_suffix(env: &Option<String>) -> String {
    env.as_ref()
        .map(|name| format!(" for environment '{name}'"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_is_not_domain() {
        assert!(!Yaml2EnvError::InvalidArgument("empty".into()).is_domain());
        assert!(Yaml2EnvError::MissingKeys { keys: vec![] }.is_domain());
        assert!(
            Yaml2EnvError::AlreadyLoaded {
                path: PathBuf::from("/tmp/a.yml")
            }
            .is_domain()
        );
    }

    #[test]
    fn test_missing_key_covers_projection_and_assertion_forms() {
        let projected = Yaml2EnvError::MissingRequiredKey {
            key: "API_KEY".into(),
            targets: "{}".into(),
            found: "{}".into(),
        };
        let asserted = Yaml2EnvError::MissingKeys {
            keys: vec!["API_KEY".into()],
        };
        assert!(projected.is_missing_key());
        assert!(asserted.is_missing_key());
        assert!(
            !Yaml2EnvError::InvalidConfigValue {
                message: "x".into()
            }
            .is_missing_key()
        );
    }

    #[test]
    fn test_config_loading_message_includes_env_and_path() {
        let err = Yaml2EnvError::config_loading(Path::new("/srv/app/config/s3.yml"), "not found")
            .with_env("production");
        let msg = err.to_string();
        assert!(msg.contains("for environment 'production'"), "{msg}");
        assert!(msg.contains("/srv/app/config/s3.yml"), "{msg}");
        assert!(msg.contains("not found"), "{msg}");
    }

    #[test]
    fn test_missing_keys_message_lists_keys() {
        let err = Yaml2EnvError::MissingKeys {
            keys: vec!["API_KEY".into(), "API_SECRET".into()],
        };
        assert_eq!(err.to_string(), "Missing ENV keys: API_KEY, API_SECRET");
    }
}
