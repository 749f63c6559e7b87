// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[tokio::test]
async fn returns_immediately_when_already_at_target() {
    let waiter = CheckForTargetStatus::new().with_poll_interval(Duration::from_millis(1));
    let result = waiter
        .wait_for(|| async { Ok(IntegrationState::Initialized) }, &[IntegrationState::Initialized])
        .await
        .unwrap();
    assert_eq!(result, IntegrationState::Initialized);
}

#[tokio::test(start_paused = true)]
async fn polls_until_target_is_reached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let waiter = CheckForTargetStatus::new()
        .with_timeout(Duration::from_secs(5))
        .with_poll_interval(Duration::from_millis(100));

    let calls_for_getter = calls.clone();
    let result = waiter
        .wait_for(
            move || {
                let calls = calls_for_getter.clone();
                async move {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 3 {
                        Ok(IntegrationState::Configured)
                    } else {
                        Ok(IntegrationState::Running)
                    }
                }
            },
            &[IntegrationState::Running],
        )
        .await
        .unwrap();

    assert_eq!(result, IntegrationState::Running);
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn times_out_when_target_never_reached() {
    let waiter = CheckForTargetStatus::new()
        .with_timeout(Duration::from_millis(50))
        .with_poll_interval(Duration::from_millis(10));

    let err = waiter
        .wait_for(|| async { Ok(IntegrationState::Error) }, &[IntegrationState::Initialized])
        .await
        .unwrap_err();

    assert!(matches!(err, ManagerError::StateTransitionTimeout(_)));
}

#[tokio::test]
async fn propagates_getter_error_immediately() {
    let waiter = CheckForTargetStatus::new().with_poll_interval(Duration::from_millis(1));
    let err = waiter
        .wait_for(
            || async { Err(ManagerError::SubserviceUnavailable("down".to_string())) },
            &[IntegrationState::Initialized],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ManagerError::SubserviceUnavailable(_)));
}
