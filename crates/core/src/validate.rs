// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration validator.
//!
//! Ported rule-for-rule from `validation.py`: mandatory-key checks, the
//! file-format metadata keys, the user-id range, `.h5` filename
//! normalisation, and the three cross-component dependency checks.

use crate::config::ConfigSection;
use crate::error::ManagerError;

const USER_ID_RANGE: std::ops::RangeInclusive<i64> = 10_000..=29_999;

const FILE_FORMAT_KEYS: &[&str] = &[
    "general/created",
    "general/user",
    "general/process",
    "general/instrument",
];

const WRITER_MANDATORY: &[&str] = &["n_frames", "user_id", "output_file"];
const BACKEND_MANDATORY: &[&str] = &["bit_depth", "n_frames"];
const DETECTOR_MANDATORY: &[&str] = &["dr", "exptime", "cycles"];
const AUX_BUS_MANDATORY: &[&str] = &["output_file", "user_id"];

fn missing_keys(section: &ConfigSection, mandatory: &[&str]) -> Vec<String> {
    mandatory
        .iter()
        .filter(|key| !section.contains_key(key))
        .map(|key| key.to_string())
        .collect()
}

fn unexpected_keys(section: &ConfigSection, allowed: &[&str]) -> Vec<String> {
    section
        .keys()
        .filter(|key| !allowed.contains(&key.as_str()))
        .cloned()
        .collect()
}

fn check_file_format_types(section: &ConfigSection) -> Result<(), ManagerError> {
    let mut bad = Vec::new();
    for key in FILE_FORMAT_KEYS {
        if let Some(value) = section.get(key) {
            if !value.is_string() {
                bad.push(format!("'{key}' must be a string, got '{value}'"));
            }
        }
    }
    if bad.is_empty() {
        Ok(())
    } else {
        Err(ManagerError::InvalidConfig(format!(
            "received parameters of invalid type:\n{}",
            bad.join("\n")
        )))
    }
}

fn check_user_id(section: &ConfigSection) -> Result<(), ManagerError> {
    let user_id = section
        .get("user_id")
        .and_then(|v| v.as_integer())
        .ok_or_else(|| {
            ManagerError::InvalidConfig("'user_id' must be an integer".to_string())
        })?;

    if USER_ID_RANGE.contains(&user_id) {
        Ok(())
    } else {
        Err(ManagerError::InvalidConfig(format!(
            "provided user_id {user_id} outside of specified range [{}-{}]",
            USER_ID_RANGE.start(),
            USER_ID_RANGE.end()
        )))
    }
}

/// Appends `.h5` to `output_file` if it is not already suffixed with it.
/// Idempotent: calling this twice on the same section is a no-op the
/// second time (Testable Property 4).
fn normalise_output_file(section: &mut ConfigSection) {
    if let Some(value) = section.get("output_file").and_then(|v| v.as_str()) {
        if !value.ends_with(".h5") {
            let normalised = format!("{value}.h5");
            section.insert("output_file", normalised);
        }
    }
}

fn validate_with_file_format(
    section: &mut ConfigSection,
    mandatory: &[&str],
    label: &str,
) -> Result<(), ManagerError> {
    if section.is_empty() {
        return Err(ManagerError::InvalidConfig(format!(
            "{label} configuration cannot be empty"
        )));
    }

    let allowed: Vec<&str> = mandatory.iter().chain(FILE_FORMAT_KEYS).copied().collect();

    let missing = missing_keys(section, &allowed);
    if !missing.is_empty() {
        return Err(ManagerError::InvalidConfig(format!(
            "{label} configuration missing mandatory parameters: {missing:?}"
        )));
    }

    let unexpected = unexpected_keys(section, &allowed);
    if !unexpected.is_empty() {
        return Err(ManagerError::InvalidConfig(format!(
            "received unexpected parameters for {label}: {unexpected:?}"
        )));
    }

    check_file_format_types(section)?;
    check_user_id(section)?;
    normalise_output_file(section);

    Ok(())
}

/// Validates (and in-place normalises `output_file` on) the writer
/// config section.
pub fn validate_writer(section: &mut ConfigSection) -> Result<(), ManagerError> {
    validate_with_file_format(section, WRITER_MANDATORY, "writer")
}

/// Validates the backend config section.
pub fn validate_backend(section: &ConfigSection) -> Result<(), ManagerError> {
    if section.is_empty() {
        return Err(ManagerError::InvalidConfig(
            "backend configuration cannot be empty".to_string(),
        ));
    }
    let missing = missing_keys(section, BACKEND_MANDATORY);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ManagerError::InvalidConfig(format!(
            "backend configuration missing mandatory parameters: {missing:?}"
        )))
    }
}

/// Validates the detector config section.
pub fn validate_detector(section: &ConfigSection) -> Result<(), ManagerError> {
    if section.is_empty() {
        return Err(ManagerError::InvalidConfig(
            "detector configuration cannot be empty".to_string(),
        ));
    }
    let missing = missing_keys(section, DETECTOR_MANDATORY);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ManagerError::InvalidConfig(format!(
            "detector configuration missing mandatory parameters: {missing:?}"
        )))
    }
}

/// Validates (and in-place normalises `output_file` on) the aux-bus
/// writer config section. Same rules as the writer section.
pub fn validate_aux_bus(section: &mut ConfigSection) -> Result<(), ManagerError> {
    validate_with_file_format(section, AUX_BUS_MANDATORY, "aux-bus")
}

/// Cross-component dependency checks:
/// `backend.bit_depth == detector.dr`, `backend.n_frames ==
/// detector.cycles`, `writer.n_frames == backend.n_frames`.
pub fn validate_dependencies(
    writer: &ConfigSection,
    backend: &ConfigSection,
    detector: &ConfigSection,
) -> Result<(), ManagerError> {
    let bit_depth = backend.get("bit_depth").and_then(|v| v.as_integer());
    let dr = detector.get("dr").and_then(|v| v.as_integer());
    if bit_depth != dr {
        return Err(ManagerError::InvalidConfig(format!(
            "invalid config: backend 'bit_depth' set to '{bit_depth:?}', but detector 'dr' \
             set to '{dr:?}'. They must be equal."
        )));
    }

    let backend_frames = backend.get("n_frames").and_then(|v| v.as_integer());
    let cycles = detector.get("cycles").and_then(|v| v.as_integer());
    if backend_frames != cycles {
        return Err(ManagerError::InvalidConfig(format!(
            "invalid config: backend 'n_frames' set to '{backend_frames:?}', but detector \
             'cycles' set to '{cycles:?}'. They must be equal."
        )));
    }

    let writer_frames = writer.get("n_frames").and_then(|v| v.as_integer());
    if writer_frames != backend_frames {
        return Err(ManagerError::InvalidConfig(format!(
            "invalid config: backend 'n_frames' set to '{backend_frames:?}', but writer \
             'n_frames' set to '{writer_frames:?}'. They must be equal."
        )));
    }

    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
