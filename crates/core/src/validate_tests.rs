// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn valid_writer_section() -> ConfigSection {
    let mut s = ConfigSection::default();
    s.insert("n_frames", 100i64);
    s.insert("user_id", 12345i64);
    s.insert("output_file", "/tmp/run1");
    s.insert("general/created", "2026-01-01");
    s.insert("general/user", "e12345");
    s.insert("general/process", "sf_dia");
    s.insert("general/instrument", "alvra");
    s
}

fn valid_backend_section() -> ConfigSection {
    let mut s = ConfigSection::default();
    s.insert("bit_depth", 16i64);
    s.insert("n_frames", 100i64);
    s
}

fn valid_detector_section() -> ConfigSection {
    let mut s = ConfigSection::default();
    s.insert("dr", 16i64);
    s.insert("exptime", 1i64);
    s.insert("cycles", 100i64);
    s
}

#[test]
fn valid_writer_config_passes() {
    let mut section = valid_writer_section();
    assert!(validate_writer(&mut section).is_ok());
    assert_eq!(
        section.get("output_file").unwrap().as_str(),
        Some("/tmp/run1.h5")
    );
}

#[test]
fn writer_missing_keys_rejected() {
    let mut section = ConfigSection::default();
    section.insert("n_frames", 1i64);
    let err = validate_writer(&mut section).unwrap_err();
    assert!(matches!(err, ManagerError::InvalidConfig(_)));
}

#[test]
fn writer_rejects_unexpected_keys() {
    let mut section = valid_writer_section();
    section.insert("unexpected", "jup");
    let err = validate_writer(&mut section).unwrap_err();
    assert!(err.to_string().contains("unexpected"));
}

#[test]
fn writer_rejects_non_string_file_format_field() {
    let mut section = valid_writer_section();
    section.insert("general/created", 123i64);
    let err = validate_writer(&mut section).unwrap_err();
    assert!(err.to_string().contains("invalid type"));
}

/// user_id boundary behaviour.
#[test]
fn user_id_range_boundaries() {
    let mut section = valid_writer_section();

    section.insert("user_id", 9_999i64);
    assert!(validate_writer(&mut section.clone()).is_err());

    section.insert("user_id", 10_000i64);
    assert!(validate_writer(&mut section.clone()).is_ok());

    section.insert("user_id", 29_999i64);
    assert!(validate_writer(&mut section.clone()).is_ok());

    section.insert("user_id", 30_000i64);
    assert!(validate_writer(&mut section.clone()).is_err());
}

/// Testable Property 4: applying the `.h5` suffix twice is a no-op the
/// second time.
#[test]
fn output_file_suffix_is_idempotent() {
    let mut section = valid_writer_section();
    validate_writer(&mut section).unwrap();
    let once = section.get("output_file").unwrap().clone();

    validate_writer(&mut section).unwrap();
    let twice = section.get("output_file").unwrap().clone();

    assert_eq!(once, twice);
    assert_eq!(once.as_str(), Some("/tmp/run1.h5"));
}

#[test]
fn backend_missing_keys_rejected() {
    let section = ConfigSection::default();
    assert!(validate_backend(&section).is_err());
}

#[test]
fn detector_missing_keys_rejected() {
    let section = ConfigSection::default();
    assert!(validate_detector(&section).is_err());
}

/// Cross-dependency rejection.
#[test]
fn cross_dependency_bit_depth_mismatch_rejected() {
    let writer = valid_writer_section();
    let backend = valid_backend_section();
    let mut detector = valid_detector_section();
    detector.insert("dr", 32i64);

    let err = validate_dependencies(&writer, &backend, &detector).unwrap_err();
    assert!(matches!(err, ManagerError::InvalidConfig(_)));
}

#[test]
fn cross_dependency_cycles_mismatch_rejected() {
    let writer = valid_writer_section();
    let backend = valid_backend_section();
    let mut detector = valid_detector_section();
    detector.insert("cycles", 50i64);

    assert!(validate_dependencies(&writer, &backend, &detector).is_err());
}

#[test]
fn cross_dependency_writer_frames_mismatch_rejected() {
    let mut writer = valid_writer_section();
    writer.insert("n_frames", 99i64);
    let backend = valid_backend_section();
    let detector = valid_detector_section();

    assert!(validate_dependencies(&writer, &backend, &detector).is_err());
}

#[test]
fn cross_dependency_all_consistent_accepted() {
    let writer = valid_writer_section();
    let backend = valid_backend_section();
    let detector = valid_detector_section();

    assert!(validate_dependencies(&writer, &backend, &detector).is_ok());
}

proptest::proptest! {
    /// Testable Property 4, generalized: normalising an arbitrary
    /// filename twice always equals normalising it once.
    #[test]
    fn prop_output_file_normalisation_is_idempotent(name in "[a-zA-Z0-9_/.]{1,40}") {
        let mut section = valid_writer_section();
        section.insert("output_file", name);

        validate_writer(&mut section).unwrap();
        let once = section.get("output_file").unwrap().clone();
        validate_writer(&mut section).unwrap();
        let twice = section.get("output_file").unwrap().clone();

        proptest::prop_assert_eq!(once, twice);
    }
}
