//! Key specifications: which config keys become which variables.

use indexmap::IndexMap;

/// Target-variable-name to source-key-name mappings, split into required
/// and optional sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySpec {
    required: IndexMap<String, String>,
    optional: IndexMap<String, String>,
}

impl KeySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a spec from `(target, source)` pairs.
    pub fn from_pairs<R, O, T, S, U, V>(required: R, optional: O) -> Self
    where
        R: IntoIterator<Item = (T, S)>,
        O: IntoIterator<Item = (U, V)>,
        T: Into<String>,
        S: Into<String>,
        U: Into<String>,
        V: Into<String>,
    {
        Self {
            required: required
                .into_iter()
                .map(|(t, s)| (t.into(), s.into()))
                .collect(),
            optional: optional
                .into_iter()
                .map(|(t, s)| (t.into(), s.into()))
                .collect(),
        }
    }

    /// Add a required mapping `target <- source`.
    pub fn require(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.required.insert(target.into(), source.into());
        self
    }

    /// Add an optional mapping `target <- source`.
    pub fn optional(mut self, target: impl Into<String>, source: impl Into<String>) -> Self {
        self.optional.insert(target.into(), source.into());
        self
    }

    pub fn required_keys(&self) -> &IndexMap<String, String> {
        &self.required
    }

    pub fn optional_keys(&self) -> &IndexMap<String, String> {
        &self.optional
    }

    pub fn is_empty(&self) -> bool {
        self.required.is_empty() && self.optional.is_empty()
    }

    /// Optional mappings overlaid with required ones.
    ///
    /// On a duplicate target the required source wins; the target keeps the
    /// position it had among the optional keys.
    pub fn targets(&self) -> IndexMap<String, String> {
        let mut targets = self.optional.clone();
        for (target, source) in &self.required {
            targets.insert(target.clone(), source.clone());
        }
        targets
    }
}
