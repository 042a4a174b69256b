//! Environment variable stores.
//!
//! Responsibilities:
//! - Abstract reads and writes of environment variables behind `EnvStore`.
//! - Provide `ProcessEnv`, backed by the real process environment.
//! - Provide `MemoryEnv`, an isolated in-memory store for tests and for
//!   embedding applications that do not want to touch the process.
//!
//! Does NOT handle:
//! - Validation of variable names or values (see `projector.rs`).
//!
//! Invariants:
//! - All `ProcessEnv` access made by this crate is serialized through one
//!   process-wide lock.
//! - `keys()` only reports variables whose names are valid UTF-8.

use indexmap::IndexMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Read/write access to a set of environment variables.
pub trait EnvStore: Send {
    /// Get a variable value, or `None` if it is not set.
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str);

    fn remove(&mut self, key: &str);

    /// Names of all currently set variables.
    fn keys(&self) -> Vec<String>;

    fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

static PROCESS_ENV_LOCK: Mutex<()> = Mutex::new(());

fn process_env_lock() -> MutexGuard<'static, ()> {
    PROCESS_ENV_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// The real process environment (`std::env`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl ProcessEnv {
    pub fn new() -> Self {
        Self
    }
}

impl EnvStore for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = process_env_lock();
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let _guard = process_env_lock();
        // SAFETY: writes made through yaml2env are serialized by PROCESS_ENV_LOCK.
        // Callers must not mutate the environment from other threads concurrently.
        unsafe {
            std::env::set_var(key, value);
        }
    }

    fn remove(&mut self, key: &str) {
        let _guard = process_env_lock();
        // SAFETY: see `set`.
        unsafe {
            std::env::remove_var(key);
        }
    }

    fn keys(&self) -> Vec<String> {
        let _guard = process_env_lock();
        std::env::vars_os()
            .filter_map(|(key, _)| key.into_string().ok())
            .collect()
    }
}

/// In-memory environment, isolated from the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnv {
    vars: IndexMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `vars`.
    pub fn with_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn vars(&self) -> &IndexMap<String, String> {
        &self.vars
    }
}

impl EnvStore for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.vars.shift_remove(key);
    }

    fn keys(&self) -> Vec<String> {
        self.vars.keys().cloned().collect()
    }
}
