// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn with_does_not_mutate_original() {
    let mut section = ConfigSection::default();
    section.insert("output_file", "/tmp/run1");

    let modified = section.with("output_file", "/tmp/run1.A.h5");

    assert_eq!(
        section.get("output_file").unwrap().as_str(),
        Some("/tmp/run1")
    );
    assert_eq!(
        modified.get("output_file").unwrap().as_str(),
        Some("/tmp/run1.A.h5")
    );
}

#[test]
fn config_value_untagged_roundtrip() {
    let json = serde_json::json!({
        "n_frames": 100,
        "output_file": "/tmp/out",
        "dr": 32,
    });
    let section: ConfigSection = serde_json::from_value(json).unwrap();

    assert_eq!(section.get("n_frames").unwrap().as_integer(), Some(100));
    assert_eq!(
        section.get("output_file").unwrap().as_str(),
        Some("/tmp/out")
    );
}

#[test]
fn acquisition_config_round_trips_through_json() {
    let mut writer = ConfigSection::default();
    writer.insert("n_frames", 100i64);
    writer.insert("output_file", "/tmp/run1");

    let config = AcquisitionConfig {
        writer,
        ..Default::default()
    };

    let json = serde_json::to_string(&config).unwrap();
    let back: AcquisitionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}
