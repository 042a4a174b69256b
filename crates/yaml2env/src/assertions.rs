//! Post-hoc checks over environment state.
//!
//! Responsibilities:
//! - Assert that named variables are present.
//! - Assert that variables match regular expressions.
//!
//! Does NOT handle:
//! - Lenient (log-and-return-bool) wrappers (see `session.rs`).
//!
//! Invariants:
//! - Malformed calls (empty lists, blank names, bad patterns) fail with
//!   `InvalidArgument` before the store is consulted.
//! - Failures list every offending key, not only the first.

use regex::Regex;

use crate::error::{Result, Yaml2EnvError};
use crate::store::EnvStore;

/// Fail with `MissingKeys` unless every name in `names` is set in `store`.
pub fn assert_keys_present(store: &dyn EnvStore, names: &[&str]) -> Result<()> {
    match names.first() {
        None => {
            return Err(Yaml2EnvError::InvalidArgument(
                "expected at least one ENV key name".to_string(),
            ));
        }
        Some(first) if first.trim().is_empty() => {
            return Err(Yaml2EnvError::InvalidArgument(format!(
                "{first:?} is not an ENV key name"
            )));
        }
        Some(_) => {}
    }

    let present = store.keys();
    let missing: Vec<String> = names
        .iter()
        .filter(|name| !present.iter().any(|key| key.as_str() == **name))
        .map(|name| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(Yaml2EnvError::MissingKeys { keys: missing })
    }
}

/// Fail unless every variable in `patterns` matches its regular expression.
///
/// Patterns are compiled first; one that does not compile is an
/// `InvalidArgument`.
pub fn assert_values_match(store: &dyn EnvStore, patterns: &[(&str, &str)]) -> Result<()> {
    if patterns.is_empty() {
        return Err(Yaml2EnvError::InvalidArgument(
            "expected at least one ENV key / pattern pair".to_string(),
        ));
    }

    let compiled = patterns
        .iter()
        .map(|(key, pattern)| {
            Regex::new(pattern)
                .map(|regex| (*key, regex))
                .map_err(|e| {
                    Yaml2EnvError::InvalidArgument(format!(
                        "pattern for '{key}' is not a valid regular expression: {e}"
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    assert_values_match_regex(store, &compiled)
}

/// Same as [`assert_values_match`] with precompiled patterns.
pub fn assert_values_match_regex(store: &dyn EnvStore, patterns: &[(&str, Regex)]) -> Result<()> {
    if patterns.is_empty() {
        return Err(Yaml2EnvError::InvalidArgument(
            "expected at least one ENV key / pattern pair".to_string(),
        ));
    }

    let names: Vec<&str> = patterns.iter().map(|(key, _)| *key).collect();
    assert_keys_present(store, &names)?;

    let failed: Vec<String> = patterns
        .iter()
        .filter(|(key, regex)| {
            store
                .get(key)
                .is_none_or(|value| !regex.is_match(&value))
        })
        .map(|(key, regex)| format!("{key} => /{}/", regex.as_str()))
        .collect();

    if failed.is_empty() {
        Ok(())
    } else {
        Err(Yaml2EnvError::InvalidConfigValue {
            message: format!("values did not match: {}", failed.join(", ")),
        })
    }
}
