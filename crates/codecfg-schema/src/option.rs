use crate::types::{DependencyName, OptionKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value of a single build option.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Str(String),
}

impl OptionValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Bool(b) => Some(*b),
            OptionValue::Str(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(s) => Some(s),
            OptionValue::Bool(_) => None,
        }
    }

    /// Type-tagged rendering used for identity hashing, so `true` and `"true"`
    /// never collide.
    pub fn canonical(&self) -> String {
        match self {
            OptionValue::Bool(b) => format!("b:{b}"),
            OptionValue::Str(s) => format!("s:{s}"),
        }
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Str(s.to_owned())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Str(s)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{b}"),
            OptionValue::Str(s) => write!(f, "\"{s}\""),
        }
    }
}

/// Mapping from `(dependency, option)` to value.
///
/// Stored as a nested sorted map so that iteration, serialization, and hashing
/// are canonical regardless of assignment order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet {
    entries: BTreeMap<DependencyName, BTreeMap<OptionKey, OptionValue>>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a value, returning the previous one for the same key.
    pub fn set(
        &mut self,
        dependency: impl Into<DependencyName>,
        key: impl Into<OptionKey>,
        value: impl Into<OptionValue>,
    ) -> Option<OptionValue> {
        self.entries
            .entry(dependency.into())
            .or_default()
            .insert(key.into(), value.into())
    }

    pub fn get(&self, dependency: &str, key: &str) -> Option<&OptionValue> {
        self.entries.get(dependency).and_then(|opts| opts.get(key))
    }

    pub fn contains(&self, dependency: &str, key: &str) -> bool {
        self.get(dependency, key).is_some()
    }

    /// All options assigned for one dependency.
    pub fn dependency(&self, dependency: &str) -> Option<&BTreeMap<OptionKey, OptionValue>> {
        self.entries.get(dependency)
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &DependencyName> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DependencyName, &OptionKey, &OptionValue)> {
        self.entries
            .iter()
            .flat_map(|(dep, opts)| opts.iter().map(move |(k, v)| (dep, k, v)))
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.values().all(BTreeMap::is_empty)
    }

    /// Sorted `dependency.key` names of every assigned option.
    pub fn qualified_keys(&self) -> Vec<String> {
        self.iter().map(|(d, k, _)| format!("{d}.{k}")).collect()
    }
}
