// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test fixtures, exported behind the `test-support` feature so
//! downstream crates (`dia-adapters`, `dia-engine`, `dia-daemon`) can
//! build on the same sample data instead of re-deriving it.

use crate::config::{AcquisitionConfig, ConfigSection};
use crate::interpret::RawStatusTuple;
use crate::status::{AuxBusStatus, BackendStatus, DetectorStatus, WriterStatus};

/// A raw status tuple matching the INITIALIZED row of the interpreter
/// table, as a starting point for tests that mutate one field at a
/// time.
pub fn initialized_raw_status() -> RawStatusTuple {
    RawStatusTuple {
        writer: WriterStatus::Stopped,
        detector: DetectorStatus::Idle,
        backend: BackendStatus::Initialized,
        aux_bus: AuxBusStatus::Stopped,
    }
}

fn file_format_fields(section: &mut ConfigSection) {
    section.insert("general/created", "2026-01-01T00:00:00");
    section.insert("general/user", "e12345");
    section.insert("general/process", "dia-daemon");
    section.insert("general/instrument", "alvra");
}

/// A fully valid [`AcquisitionConfig`] that passes every validator
/// rule and cross-dependency check unmodified. Individual tests clone
/// and perturb one field.
pub fn sample_acquisition_config() -> AcquisitionConfig {
    let mut writer = ConfigSection::default();
    writer.insert("n_frames", 100i64);
    writer.insert("user_id", 12_345i64);
    writer.insert("output_file", "/data/run1");
    file_format_fields(&mut writer);

    let mut backend = ConfigSection::default();
    backend.insert("bit_depth", 16i64);
    backend.insert("n_frames", 100i64);

    let mut detector = ConfigSection::default();
    detector.insert("dr", 16i64);
    detector.insert("exptime", 1i64);
    detector.insert("cycles", 100i64);

    let mut aux_bus = ConfigSection::default();
    aux_bus.insert("output_file", "/data/run1");
    aux_bus.insert("user_id", 12_345i64);
    file_format_fields(&mut aux_bus);

    AcquisitionConfig {
        writer,
        backend,
        detector,
        aux_bus,
    }
}
