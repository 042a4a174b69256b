//! Projection of config values into the environment store.
//!
//! Responsibilities:
//! - Copy each value named by a `KeySpec` from an environment subtree into
//!   the store under its target name, and record it in the ledger.
//! - Fail when a required target ended up without a value.
//!
//! Does NOT handle:
//! - Locating or parsing config files (see `document.rs`, `session.rs`).
//!
//! Invariants:
//! - Only targets named in the key spec are ever written.
//! - A missing source value removes the target variable and is recorded as
//!   `None` in the ledger.
//! - Target names are validated before anything is written.

use indexmap::IndexMap;

use crate::constants::NIL;
use crate::document::{EnvSubtree, describe_subtree, render_scalar};
use crate::error::{Result, Yaml2EnvError};
use crate::keys::KeySpec;
use crate::ledger::Ledger;
use crate::settings::Settings;
use crate::store::EnvStore;

/// Project `subtree` into `store` according to `keys`.
///
/// # Errors
///
/// - `InvalidArgument` if a target name cannot be an environment variable name.
/// - `InvalidConfigValue` if a value contains a NUL byte.
/// - `MissingRequiredKey` if a required target has no non-empty value afterwards.
pub fn project(
    store: &mut dyn EnvStore,
    ledger: &mut Ledger,
    settings: &Settings,
    subtree: &EnvSubtree,
    keys: &KeySpec,
) -> Result<()> {
    let targets = keys.targets();

    let mut assignments = Vec::with_capacity(targets.len());
    for (target, source) in &targets {
        validate_target_name(target)?;
        let value = lookup(settings, subtree, target, source)?;
        assignments.push((target.as_str(), value));
    }

    for (target, value) in assignments {
        match &value {
            Some(v) => store.set(target, v),
            None => store.remove(target),
        }
        settings.log_info(&assignment_line(target, value.as_deref()));
        ledger.record_value(target, value);
    }

    for target in keys.required_keys().keys() {
        if ledger.loaded_value(target).is_none() {
            return Err(Yaml2EnvError::MissingRequiredKey {
                key: target.clone(),
                targets: describe_targets(&targets),
                found: describe_subtree(subtree),
            });
        }
    }

    Ok(())
}

fn lookup(
    settings: &Settings,
    subtree: &EnvSubtree,
    target: &str,
    source: &str,
) -> Result<Option<String>> {
    let Some(raw) = subtree.get(source) else {
        return Ok(None);
    };

    let value = render_scalar(raw);
    if value.is_none() && !raw.is_null() {
        settings.log_warn(&format!(
            "Config key '{source}' for ENV[{target:?}] is not a scalar; treating it as missing"
        ));
    }
    if let Some(v) = &value
        && v.contains('\0')
    {
        return Err(Yaml2EnvError::InvalidConfigValue {
            message: format!("value for '{target}' (config key '{source}') contains a NUL byte"),
        });
    }
    Ok(value)
}

fn validate_target_name(target: &str) -> Result<()> {
    if target.is_empty() || target.contains('=') || target.contains('\0') {
        return Err(Yaml2EnvError::InvalidArgument(format!(
            "{target:?} is not a valid environment variable name"
        )));
    }
    Ok(())
}

/// Log line for one assignment, e.g. `:: ENV["API_KEY"] = "KEY"`.
pub fn assignment_line(target: &str, value: Option<&str>) -> String {
    match value {
        Some(v) => format!(":: ENV[{target:?}] = {v:?}"),
        None => format!(":: ENV[{target:?}] = {NIL}"),
    }
}

fn describe_targets(targets: &IndexMap<String, String>) -> String {
    let entries: Vec<String> = targets
        .iter()
        .map(|(target, source)| format!("{target:?} => {source:?}"))
        .collect();
    format!("{{{}}}", entries.join(", "))
}
