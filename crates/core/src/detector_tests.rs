// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_alvra_style_config() {
    let toml_text = r#"
        [detectors.JF02T09V01]
        detector_id = 1
        backend_api_url = "http://localhost:8082"
        backend_stream_url = "tcp://localhost:40002"
        writer_port = 10012
        n_modules = 9
        n_bad_modules = 1
    "#;

    let detectors = DetectorConfigFile::parse(toml_text).unwrap();
    assert_eq!(detectors.len(), 1);

    let record = &detectors.0[&DetectorName::new("JF02T09V01")];
    assert_eq!(record.detector_id, 1);
    assert_eq!(record.writer_port, 10012);
    assert_eq!(record.n_modules, 9);
    assert_eq!(record.n_bad_modules, 1);
}

#[test]
fn n_bad_modules_defaults_to_zero() {
    let toml_text = r#"
        [detectors.JF]
        detector_id = 0
        backend_api_url = "http://localhost:8080"
        backend_stream_url = "tcp://localhost:40000"
        writer_port = 10001
        n_modules = 1
    "#;

    let detectors = DetectorConfigFile::parse(toml_text).unwrap();
    assert_eq!(detectors.0[&DetectorName::new("JF")].n_bad_modules, 0);
}

#[test]
fn detector_names_are_unique_keys() {
    let toml_text = r#"
        [detectors.A]
        detector_id = 1
        backend_api_url = "http://localhost:1"
        backend_stream_url = "tcp://localhost:1"
        writer_port = 1
        n_modules = 1

        [detectors.B]
        detector_id = 2
        backend_api_url = "http://localhost:2"
        backend_stream_url = "tcp://localhost:2"
        writer_port = 2
        n_modules = 1
    "#;

    let detectors = DetectorConfigFile::parse(toml_text).unwrap();
    assert_eq!(detectors.len(), 2);
    assert!(detectors.0.contains_key(&DetectorName::new("A")));
    assert!(detectors.0.contains_key(&DetectorName::new("B")));
}
