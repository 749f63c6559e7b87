// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Static per-detector configuration, loaded once at server start.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// A detector identifier, e.g. `"JF02T09V01"`.
///
/// Cheap to clone (`SmolStr` inlines short strings), used as a map key
/// throughout the manager.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectorName(pub SmolStr);

impl DetectorName {
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(SmolStr::new(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DetectorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for DetectorName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl std::borrow::Borrow<str> for DetectorName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

/// Static configuration for one detector, as declared in the detector
/// configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorRecord {
    pub detector_id: u32,
    pub backend_api_url: String,
    pub backend_stream_url: String,
    pub writer_port: u16,
    pub n_modules: u32,
    #[serde(default)]
    pub n_bad_modules: u32,
}

/// The full map of detectors available to this server instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailableDetectors(pub IndexMap<DetectorName, DetectorRecord>);

impl AvailableDetectors {
    pub fn iter(&self) -> impl Iterator<Item = (&DetectorName, &DetectorRecord)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// On-disk shape of the detector configuration file: a single
/// `[detectors.<name>]` table per entry.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfigFile {
    pub detectors: IndexMap<String, DetectorRecord>,
}

impl DetectorConfigFile {
    /// Parse a detector configuration file from its TOML text.
    pub fn parse(toml_text: &str) -> Result<AvailableDetectors, toml::de::Error> {
        let file: DetectorConfigFile = toml::from_str(toml_text)?;
        let map = file
            .detectors
            .into_iter()
            .map(|(name, record)| (DetectorName::new(name), record))
            .collect();
        Ok(AvailableDetectors(map))
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
