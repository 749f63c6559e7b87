// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::test_support::{FakeAdapter, FakeCall};
use dia_core::{ConfigSection, WriterStatus};

#[tokio::test]
async fn disabled_guard_no_ops_mutators_and_reports_disabled() {
    let fake = FakeAdapter::new(WriterStatus::Stopped);
    let guard = EnableGuard::new(fake);
    guard.set_enabled(false);

    guard.start(&ConfigSection::default()).await.unwrap();
    guard.stop().await.unwrap();
    guard.reset().await.unwrap();
    guard.kill().await.unwrap();

    assert!(guard.inner().calls().is_empty());
    assert_eq!(guard.get_status().await.unwrap(), WriterStatus::Disabled);
}

#[tokio::test]
async fn enabled_guard_delegates_to_inner() {
    let fake = FakeAdapter::new(WriterStatus::Receiving);
    let guard = EnableGuard::new(fake);

    guard.start(&ConfigSection::default()).await.unwrap();
    assert_eq!(guard.inner().calls(), vec![FakeCall::Start]);
    assert_eq!(guard.get_status().await.unwrap(), WriterStatus::Receiving);
}

#[tokio::test]
async fn re_enabling_resumes_delegation() {
    let fake = FakeAdapter::new(WriterStatus::Stopped);
    let guard = EnableGuard::new(fake);
    guard.set_enabled(false);
    guard.stop().await.unwrap();
    assert!(guard.inner().calls().is_empty());

    guard.set_enabled(true);
    guard.stop().await.unwrap();
    assert_eq!(guard.inner().calls(), vec![FakeCall::Stop]);
}
