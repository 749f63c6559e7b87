// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-detector filename derivation.
//!
//! Ported from `manager.py`'s `start_acquisition`: the manager never
//! writes `output_file`/`pede_corrections_filename`/
//! `gain_corrections_filename` verbatim to a per-detector backend or
//! writer — it suffixes each with the detector name first, so that N
//! detectors sharing one acquisition config each get their own file.
//! `/dev/null` is the one sentinel left untouched, since it names no
//! real file to disambiguate.

const NULL_SINK: &str = "/dev/null";

/// `<path>.<detector>.res.h5`, or `/dev/null` unchanged.
pub fn pedestal_filename(path: &str, detector: &str) -> String {
    if path == NULL_SINK {
        return path.to_string();
    }
    format!("{path}.{detector}.res.h5")
}

/// `<path>/<detector>/gains.h5`, or `/dev/null` unchanged.
pub fn gain_filename(path: &str, detector: &str) -> String {
    if path == NULL_SINK {
        return path.to_string();
    }
    format!("{path}/{detector}/gains.h5")
}

/// `<path>.<detector>.h5`, or `/dev/null` unchanged. Applied once per
/// detector to the acquisition's shared `output_file`, producing a
/// distinct writer target for each detector in the pipeline.
pub fn detector_output_file(path: &str, detector: &str) -> String {
    if path == NULL_SINK {
        return path.to_string();
    }
    format!("{path}.{detector}.h5")
}

/// `<path>.BSREAD.h5`, or `/dev/null` unchanged.
pub fn aux_bus_output_file(path: &str) -> String {
    if path == NULL_SINK {
        return path.to_string();
    }
    format!("{path}.BSREAD.h5")
}

#[cfg(test)]
#[path = "naming_tests.rs"]
mod tests;
