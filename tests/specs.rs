// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! End-to-end acquisition lifecycle scenarios driven through
//! [`IntegrationManager`] with fake sub-service adapters, exercising
//! whole-system behavior that a single crate's unit tests can't see on
//! their own (cross-dependency rejection and filename suffixing are
//! covered at the unit level in `dia-core`; this file covers the
//! lifecycle paths that only show up once a manager owns several
//! pipelines plus an aux-bus and a timing channel together).

use std::time::Duration;

use dia_adapters::test_support::{FakeAdapter, FakeTimingChannel};
use dia_adapters::EnableGuard;
use dia_core::test_support::sample_acquisition_config;
use dia_core::{AuxBusStatus, BackendStatus, ConfigSection, DetectorName, DetectorStatus, IntegrationState, WriterStatus};
use dia_engine::{CheckForTargetStatus, DetectorPipeline, IntegrationManager};
use indexmap::IndexMap;

type FakeDetector = EnableGuard<FakeAdapter<DetectorStatus>>;
type FakeBackend = EnableGuard<FakeAdapter<BackendStatus>>;
type FakeWriter = EnableGuard<FakeAdapter<WriterStatus>>;
type FakeAuxBus = EnableGuard<FakeAdapter<AuxBusStatus>>;
type TestManager = IntegrationManager<FakeDetector, FakeBackend, FakeWriter, FakeAuxBus, FakeTimingChannel>;

struct Handles {
    detector: FakeAdapter<DetectorStatus>,
    backend: FakeAdapter<BackendStatus>,
    writer: FakeAdapter<WriterStatus>,
}

fn fast_wait() -> CheckForTargetStatus {
    CheckForTargetStatus::new()
        .with_timeout(Duration::from_millis(500))
        .with_poll_interval(Duration::from_millis(1))
}

fn flip_after(delay: Duration, f: impl FnOnce() + Send + 'static) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        f();
    });
}

fn manager_with(n: usize) -> (TestManager, Vec<Handles>, FakeAdapter<AuxBusStatus>) {
    let mut pipelines = IndexMap::new();
    let mut handles = Vec::new();

    for i in 0..n {
        let detector = FakeAdapter::new(DetectorStatus::Idle);
        let backend = FakeAdapter::new(BackendStatus::Initialized);
        let writer = FakeAdapter::new(WriterStatus::Stopped);

        pipelines.insert(
            DetectorName::new(format!("D{i}")),
            DetectorPipeline::new(
                EnableGuard::new(detector.clone()),
                EnableGuard::new(backend.clone()),
                EnableGuard::new(writer.clone()),
            ),
        );
        handles.push(Handles { detector, backend, writer });
    }

    let aux_bus = FakeAdapter::new(AuxBusStatus::Stopped);
    let manager = IntegrationManager::new(pipelines, EnableGuard::new(aux_bus.clone()), FakeTimingChannel::new())
        .with_target_wait(fast_wait());

    (manager, handles, aux_bus)
}

/// Happy path: configure a single detector, start it, let it finish,
/// then stop and confirm the manager lands back at INITIALIZED.
#[tokio::test]
async fn happy_path_single_detector_runs_to_completion() {
    let (manager, handles, aux_bus) = manager_with(1);
    let h = &handles[0];

    assert_eq!(manager.get_acquisition_status().await.unwrap(), IntegrationState::Initialized);

    flip_after(Duration::from_millis(5), {
        let backend = h.backend.clone();
        move || backend.set_status(BackendStatus::Configured)
    });
    let status = manager.set_acquisition_config(&sample_acquisition_config()).await.unwrap();
    assert_eq!(status, IntegrationState::Configured);

    flip_after(Duration::from_millis(5), {
        let backend = h.backend.clone();
        let writer = h.writer.clone();
        let detector = h.detector.clone();
        let aux_bus = aux_bus.clone();
        move || {
            backend.set_status(BackendStatus::Open);
            writer.set_status(WriterStatus::Receiving);
            detector.set_status(DetectorStatus::Running);
            aux_bus.set_status(AuxBusStatus::Writing);
        }
    });
    let status = manager.start_acquisition(&ConfigSection::default()).await.unwrap();
    assert_eq!(status, IntegrationState::Running);

    h.detector.set_status(DetectorStatus::Idle);
    h.writer.set_status(WriterStatus::Finished);
    aux_bus.set_status(AuxBusStatus::Stopped);
    assert_eq!(manager.get_acquisition_status().await.unwrap(), IntegrationState::Finished);

    flip_after(Duration::from_millis(5), {
        let backend = h.backend.clone();
        let writer = h.writer.clone();
        move || {
            backend.set_status(BackendStatus::Initialized);
            writer.set_status(WriterStatus::Stopped);
        }
    });
    let status = manager.stop_acquisition().await.unwrap();
    assert_eq!(status, IntegrationState::Initialized);
}

/// A disabled aux-bus is masked from interpretation, and enabling it
/// later via `set_clients_enabled` doesn't retroactively force any
/// state change on its own.
#[tokio::test]
async fn disabled_aux_bus_does_not_block_running_and_reenabling_is_inert() {
    let (manager, handles, aux_bus) = manager_with(1);
    let h = &handles[0];

    manager
        .set_clients_enabled(&dia_engine::ClientsEnabledUpdate {
            aux_bus: Some(false),
            ..Default::default()
        })
        .await;

    h.backend.set_status(BackendStatus::Open);
    h.writer.set_status(WriterStatus::Receiving);
    h.detector.set_status(DetectorStatus::Running);
    assert_eq!(manager.get_acquisition_status().await.unwrap(), IntegrationState::Running);

    aux_bus.set_status(AuxBusStatus::Writing);
    manager
        .set_clients_enabled(&dia_engine::ClientsEnabledUpdate {
            aux_bus: Some(true),
            ..Default::default()
        })
        .await;
    assert_eq!(manager.get_acquisition_status().await.unwrap(), IntegrationState::Running);
}

/// With N pipelines whose reset each sleeps the same delay, the whole
/// `reset()` call should complete in about one delay's worth of time,
/// not N of them — the fan-out in `reset_impl` runs every pipeline's
/// reset (and the aux-bus's) concurrently rather than sequentially.
#[tokio::test]
async fn reset_runs_every_pipeline_concurrently_not_sequentially() {
    const DELAY: Duration = Duration::from_millis(200);
    const N: usize = 4;

    let mut pipelines = IndexMap::new();
    for i in 0..N {
        let detector = FakeAdapter::new(DetectorStatus::Idle);
        let backend = FakeAdapter::new(BackendStatus::Initialized).with_reset_delay(DELAY);
        let writer = FakeAdapter::new(WriterStatus::Stopped);
        pipelines.insert(
            DetectorName::new(format!("D{i}")),
            DetectorPipeline::new(EnableGuard::new(detector), EnableGuard::new(backend), EnableGuard::new(writer)),
        );
    }
    let aux_bus = FakeAdapter::new(AuxBusStatus::Stopped).with_reset_delay(DELAY);
    let manager: TestManager = IntegrationManager::new(pipelines, EnableGuard::new(aux_bus), FakeTimingChannel::new())
        .with_target_wait(fast_wait());

    let started = std::time::Instant::now();
    manager.reset().await.unwrap();
    let elapsed = started.elapsed();

    assert!(elapsed < DELAY * 2, "reset took {elapsed:?}, expected close to {DELAY:?} from concurrent fan-out");
}

/// A sub-service failure mid-start surfaces as the manager's own error
/// rather than panicking or leaving the manager in an inconsistent
/// lifecycle-lock state (the next call must still go through).
#[tokio::test]
async fn failed_start_leaves_the_manager_usable_for_the_next_call() {
    let (manager, handles, _aux_bus) = manager_with(1);
    let h = &handles[0];

    flip_after(Duration::from_millis(5), {
        let backend = h.backend.clone();
        move || backend.set_status(BackendStatus::Configured)
    });
    manager.set_acquisition_config(&sample_acquisition_config()).await.unwrap();

    h.backend.fail_next_with(dia_core::ManagerError::SubserviceUnavailable("down".to_string()));
    let err = manager.start_acquisition(&ConfigSection::default()).await.unwrap_err();
    assert!(matches!(err, dia_core::ManagerError::SubserviceUnavailable(_)));

    assert_eq!(manager.get_acquisition_status().await.unwrap(), IntegrationState::Configured);
}
