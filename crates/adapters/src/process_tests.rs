// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn adapter() -> ProcessAdapter {
    ProcessAdapter::new(ProcessAdapterConfig {
        executable: PathBuf::from("/opt/writer/run.sh"),
        stream_url: "tcp://detector:9999".to_string(),
        port: 8080,
        broker_url: "http://broker:8081/".to_string(),
        n_modules: 4,
        detector_name: "M1".to_string(),
        log_dir: PathBuf::from("/tmp"),
        kind: ProcessKind::Writer,
    })
}

fn aux_bus_adapter() -> ProcessAdapter {
    ProcessAdapter::new(ProcessAdapterConfig {
        executable: PathBuf::from("/opt/bsread/run.sh"),
        stream_url: "tcp://beamline:7777".to_string(),
        port: 8090,
        broker_url: String::new(),
        n_modules: 0,
        detector_name: "BSREAD".to_string(),
        log_dir: PathBuf::from("/tmp"),
        kind: ProcessKind::AuxBus,
    })
}

fn params_with(n_frames: i64, user_id: i64, output_file: &str) -> ConfigSection {
    let mut section = ConfigSection::default();
    section.insert("n_frames", n_frames);
    section.insert("user_id", user_id);
    section.insert("output_file", output_file);
    section
}

/// Ported from `sf_cpp_writer_client.py`'s `get_execution_command`: a
/// fixed positional argv, in this exact order.
#[test]
fn build_argv_matches_positional_order() {
    let adapter = adapter();
    let argv = adapter.build_argv(&params_with(100, 12345, "/data/run1.M1.h5"));

    assert_eq!(
        argv,
        vec![
            "/opt/writer/run.sh",
            "tcp://detector:9999",
            "/data/run1.M1.h5",
            "100",
            "8080",
            "12345",
            "http://broker:8081/",
            "4",
            "M1",
        ]
    );
}

#[test]
fn build_argv_defaults_missing_frames_and_user_id() {
    let adapter = adapter();
    let mut params = ConfigSection::default();
    params.insert("output_file", "/data/run1.M1.h5");

    let argv = adapter.build_argv(&params);
    assert_eq!(argv[3], "0");
    assert_eq!(argv[5], "-1");
}

#[test]
fn log_path_is_per_detector() {
    let adapter = adapter();
    assert_eq!(adapter.log_path(), PathBuf::from("/tmp/writer.M1.log"));
}

/// Ported from `BsreadWriterClient.get_execution_command`: stream URL,
/// output file, user id, port — no frame count, broker URL, module
/// count, or detector name.
#[test]
fn aux_bus_argv_omits_writer_only_fields() {
    let adapter = aux_bus_adapter();
    let argv = adapter.build_argv(&params_with(100, 54321, "/data/run1.BSREAD.h5"));

    assert_eq!(
        argv,
        vec![
            "/opt/bsread/run.sh",
            "tcp://beamline:7777",
            "/data/run1.BSREAD.h5",
            "54321",
            "8090",
        ]
    );
}
