// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The status interpreter: a pure function from the raw cross-product
//! of sub-service statuses to the derived [`IntegrationState`].
//!
//! Ported table-for-table from `validation.py`'s `interpret_status`.
//! First matching row wins; no match falls through to `Error`. A
//! `Disabled` raw status matches whatever a row expects in that slot,
//! since a disabled sub-service is administratively out of the picture
//! rather than actually observed.

use crate::status::{AuxBusStatus, BackendStatus, DetectorStatus, IntegrationState, WriterStatus};

/// The raw status of every sub-service at one instant, as read by the
/// manager immediately before deriving an [`IntegrationState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawStatusTuple {
    pub writer: WriterStatus,
    pub detector: DetectorStatus,
    pub backend: BackendStatus,
    pub aux_bus: AuxBusStatus,
}

fn writer_matches(status: WriterStatus, expected: &[WriterStatus]) -> bool {
    status == WriterStatus::Disabled || expected.contains(&status)
}

fn detector_matches(status: DetectorStatus, expected: &[DetectorStatus]) -> bool {
    status == DetectorStatus::Disabled || expected.contains(&status)
}

fn backend_matches(status: BackendStatus, expected: BackendStatus) -> bool {
    status == BackendStatus::Disabled || status == expected
}

fn aux_bus_matches(status: AuxBusStatus, expected: &[AuxBusStatus]) -> bool {
    status == AuxBusStatus::Disabled || expected.contains(&status)
}

/// Derives the integration state from one snapshot of raw statuses.
/// Pure: depends on nothing but its argument (Testable Property 1).
pub fn interpret(raw: &RawStatusTuple) -> IntegrationState {
    use AuxBusStatus::{Stopped as BsStopped, Waiting as BsWaiting, Writing as BsWriting};
    use BackendStatus::{Configured, Initialized, Open};
    use DetectorStatus::{Idle, Running, Waiting as DetWaiting};
    use WriterStatus::{Finished, Receiving, Stopped, Writing};

    if writer_matches(raw.writer, &[Stopped])
        && detector_matches(raw.detector, &[Idle])
        && backend_matches(raw.backend, Initialized)
        && aux_bus_matches(raw.aux_bus, &[BsStopped])
    {
        return IntegrationState::Initialized;
    }

    if writer_matches(raw.writer, &[Stopped])
        && detector_matches(raw.detector, &[Idle])
        && backend_matches(raw.backend, Configured)
        && aux_bus_matches(raw.aux_bus, &[BsStopped])
    {
        return IntegrationState::Configured;
    }

    if writer_matches(raw.writer, &[Receiving, Writing])
        && detector_matches(raw.detector, &[Running, DetWaiting])
        && backend_matches(raw.backend, Open)
        && aux_bus_matches(raw.aux_bus, &[BsWriting, BsWaiting])
    {
        return IntegrationState::Running;
    }

    if writer_matches(raw.writer, &[Receiving, Writing])
        && detector_matches(raw.detector, &[Idle])
        && backend_matches(raw.backend, Open)
        && aux_bus_matches(raw.aux_bus, &[BsWriting, BsWaiting, BsStopped])
    {
        return IntegrationState::DetectorStopped;
    }

    if writer_matches(raw.writer, &[Finished, Stopped])
        && detector_matches(raw.detector, &[Idle])
        && backend_matches(raw.backend, Open)
        && aux_bus_matches(raw.aux_bus, &[BsWriting, BsWaiting])
    {
        return IntegrationState::BsreadStillRunning;
    }

    if writer_matches(raw.writer, &[Finished, Stopped])
        && detector_matches(raw.detector, &[Idle])
        && backend_matches(raw.backend, Open)
        && aux_bus_matches(raw.aux_bus, &[BsStopped])
    {
        return IntegrationState::Finished;
    }

    IntegrationState::Error
}

#[cfg(test)]
#[path = "interpret_tests.rs"]
mod tests;
