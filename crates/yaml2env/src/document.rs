//! YAML config document loading.
//!
//! Responsibilities:
//! - Read a YAML file from disk and parse it into a `ConfigDocument`, an
//!   ordered map from environment name to key/value subtree.
//! - Select the subtree for one environment.
//! - Render scalar values as environment variable strings.
//!
//! Does NOT handle:
//! - Resolving config paths against the root (see `session.rs`).
//! - Caching: every call reads the file fresh.
//!
//! Invariants:
//! - The top level must be a mapping whose values are mappings (or null,
//!   which is read as an empty subtree). Anything else is a `ConfigLoading` error.
//! - An empty document is an empty `ConfigDocument`.
//! - Merge keys (`<<: *defaults`) are expanded before environments are read.
//! - An unknown environment selects an empty subtree, never an error.

use indexmap::IndexMap;
use serde_yaml::Value;
use std::path::Path;

use crate::error::{Result, Yaml2EnvError};

/// Key/value pairs configured for one environment.
pub type EnvSubtree = IndexMap<String, Value>;

/// Every environment's subtree, in file order.
pub type ConfigDocument = IndexMap<String, EnvSubtree>;

/// Read and parse the config file at `path`.
pub fn load_config(path: &Path) -> Result<ConfigDocument> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        let reason = match e.kind() {
            std::io::ErrorKind::NotFound => "file not found".to_string(),
            _ => format!("failed to read file: {e}"),
        };
        Yaml2EnvError::config_loading(path, reason)
    })?;
    parse_config(path, &content)
}

/// Load `path` and return the subtree for `env_name`, or an empty subtree.
pub fn load_config_for_env(path: &Path, env_name: &str) -> Result<EnvSubtree> {
    let mut document = load_config(path)?;
    Ok(document.shift_remove(env_name).unwrap_or_default())
}

/// Parse YAML `content`; `path` is only used for error context.
pub fn parse_config(path: &Path, content: &str) -> Result<ConfigDocument> {
    let mut value: Value = serde_yaml::from_str(content)
        .map_err(|e| Yaml2EnvError::config_loading(path, format!("invalid YAML: {e}")))?;
    value
        .apply_merge()
        .map_err(|e| Yaml2EnvError::config_loading(path, format!("invalid YAML: {e}")))?;

    let top = match value {
        Value::Null => return Ok(ConfigDocument::new()),
        Value::Mapping(mapping) => mapping,
        _ => {
            return Err(Yaml2EnvError::config_loading(
                path,
                "top level must be a mapping of environments",
            ));
        }
    };

    let mut document = ConfigDocument::with_capacity(top.len());
    for (env_key, env_value) in top {
        let env_name = key_to_string(&env_key).ok_or_else(|| {
            Yaml2EnvError::config_loading(path, "environment names must be scalars")
        })?;

        let subtree = match env_value {
            Value::Null => EnvSubtree::new(),
            Value::Mapping(entries) => {
                let mut subtree = EnvSubtree::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = key_to_string(&key).ok_or_else(|| {
                        Yaml2EnvError::config_loading(
                            path,
                            format!("keys under '{env_name}' must be scalars"),
                        )
                    })?;
                    subtree.insert(key, value);
                }
                subtree
            }
            _ => {
                return Err(Yaml2EnvError::config_loading(
                    path,
                    format!("environment '{env_name}' must be a mapping"),
                ));
            }
        };
        document.insert(env_name, subtree);
    }

    Ok(document)
}

fn key_to_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Render a scalar as an environment variable value.
///
/// Returns `None` for null, sequences, mappings and tagged values.
pub fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Compact one-line rendering of a subtree for diagnostics.
pub fn describe_subtree(subtree: &EnvSubtree) -> String {
    let entries: Vec<String> = subtree
        .iter()
        .map(|(key, value)| match render_scalar(value) {
            Some(rendered) => format!("{key:?} => {rendered:?}"),
            None if value.is_null() => format!("{key:?} => nil"),
            None => format!("{key:?} => {value:?}"),
        })
        .collect();
    format!("{{{}}}", entries.join(", "))
}
