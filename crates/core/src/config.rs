// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration sections for an acquisition.
//!
//! The Python implementation passes each section around as a plain
//! `dict` of mixed string/int/bool values (see `validation.py`). We keep
//! that same dynamic shape at the Rust boundary — `IndexMap<String,
//! ConfigValue>` — rather than hard-coding struct fields, because the
//! validator's job is precisely to check which keys are present, and
//! "unexpected key" rejection requires seeing the raw key set rather
//! than a struct that would silently drop unknown fields.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single configuration value. Mirrors the dynamically-typed values
/// (`str`, `int`, `bool`) the Python config dicts carry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Bool(bool),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(_))
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// One configuration section: an ordered map of key → value.
///
/// Iteration order is preserved (`IndexMap`) so audit logging of a
/// section is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfigSection(pub IndexMap<String, ConfigValue>);

impl ConfigSection {
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    /// A copy of this section with one key's value replaced (inserting
    /// it if absent). Used by the per-detector filename derivations,
    /// which must never mutate the caller's original section.
    pub fn with(&self, key: &str, value: impl Into<ConfigValue>) -> Self {
        let mut out = self.clone();
        out.insert(key, value);
        out
    }
}

/// The four top-level config sections bundled together, as accepted by
/// `set_acquisition_config` / returned by `get_acquisition_config`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    pub writer: ConfigSection,
    pub backend: ConfigSection,
    pub detector: ConfigSection,
    pub aux_bus: ConfigSection,
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
