// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

#[test]
#[serial]
fn defaults_match_single_detector_fallback() {
    for key in [
        "DIA_HOST",
        "DIA_PORT",
        "DIA_DETECTOR_CONFIG",
        "DIA_BACKEND_URL",
        "DIA_BACKEND_STREAM",
        "DIA_WRITER_PORT",
        "DIA_TIMING_PV",
    ] {
        std::env::remove_var(key);
    }

    let config = DaemonConfig::from_env();
    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.timing_pv, DEFAULT_TIMING_PV);
    assert_eq!(config.timing_start_code, DEFAULT_TIMING_START_CODE);

    let detectors = config.load_detectors().unwrap();
    assert_eq!(detectors.len(), 1);
    let (name, record) = detectors.iter().next().unwrap();
    assert_eq!(name.as_str(), "JF");
    assert_eq!(record.n_modules, 1);
}

#[test]
#[serial]
fn env_vars_override_defaults() {
    std::env::set_var("DIA_HOST", "127.0.0.1");
    std::env::set_var("DIA_PORT", "9090");

    let config = DaemonConfig::from_env();

    std::env::remove_var("DIA_HOST");
    std::env::remove_var("DIA_PORT");

    assert_eq!(config.host, "127.0.0.1");
    assert_eq!(config.port, 9090);
}

#[test]
fn load_detectors_parses_configuration_file() {
    let toml_text = r#"
        [detectors.JF02T09V01]
        detector_id = 1
        backend_api_url = "http://localhost:8082"
        backend_stream_url = "tcp://localhost:40002"
        writer_port = 10012
        n_modules = 9
        n_bad_modules = 1
    "#;
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), toml_text).unwrap();

    let config = DaemonConfig {
        detector_config_path: Some(file.path().to_path_buf()),
        ..DaemonConfig::from_env()
    };

    let detectors = config.load_detectors().unwrap();
    assert_eq!(detectors.len(), 1);
    let record = &detectors.0[&dia_core::DetectorName::new("JF02T09V01")];
    assert_eq!(record.n_bad_modules, 1);
}

#[test]
fn load_detectors_reports_missing_file() {
    let config = DaemonConfig {
        detector_config_path: Some(PathBuf::from("/nonexistent/detectors.toml")),
        ..DaemonConfig::from_env()
    };

    assert!(matches!(config.load_detectors(), Err(DetectorConfigError::Read(_, _))));
}
