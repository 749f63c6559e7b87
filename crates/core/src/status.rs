// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw sub-service status enums and the derived integration state.
//!
//! Each raw status type carries a `Disabled` sentinel variant (spec
//! §3/§4.2): when an adapter is administratively disabled, the
//! enable-wrapper reports this value instead of polling the real
//! sub-service, and the interpreter treats it as matching whatever the
//! status table expects in that slot.

use serde::{Deserialize, Serialize};

/// A raw status enum that carries a `Disabled` sentinel value, reported
/// by the enable-wrapper in place of a real poll when a sub-service has
/// been administratively disabled.
pub trait DisabledStatus {
    fn disabled() -> Self;
}

/// A raw status enum that carries a `Stopped` value reported when the
/// underlying process has not been spawned (or has already exited),
/// without needing to poll it.
pub trait StoppedStatus {
    fn stopped() -> Self;
}

/// Raw writer status, as reported by the writer's `/status` endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriterStatus {
    Stopped,
    Receiving,
    Writing,
    Finished,
    Disabled,
}

impl DisabledStatus for WriterStatus {
    fn disabled() -> Self {
        Self::Disabled
    }
}

impl StoppedStatus for WriterStatus {
    fn stopped() -> Self {
        Self::Stopped
    }
}

/// Raw detector status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorStatus {
    Idle,
    Running,
    Waiting,
    Disabled,
}

impl DisabledStatus for DetectorStatus {
    fn disabled() -> Self {
        Self::Disabled
    }
}

/// Raw backend status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackendStatus {
    #[serde(rename = "INITIALIZED")]
    Initialized,
    #[serde(rename = "CONFIGURED")]
    Configured,
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "DISABLED")]
    Disabled,
}

impl DisabledStatus for BackendStatus {
    fn disabled() -> Self {
        Self::Disabled
    }
}

/// Raw aux-bus (bsread) writer status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuxBusStatus {
    Stopped,
    Writing,
    Waiting,
    Disabled,
}

impl DisabledStatus for AuxBusStatus {
    fn disabled() -> Self {
        Self::Disabled
    }
}

impl StoppedStatus for AuxBusStatus {
    fn stopped() -> Self {
        Self::Stopped
    }
}

/// The derived integration lifecycle state exposed to the operator.
/// Never stored — always recomputed from the current cross-product of
/// raw sub-service statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntegrationState {
    Initialized,
    Configured,
    Running,
    DetectorStopped,
    BsreadStillRunning,
    Finished,
    Error,
}

crate::simple_display! {
    IntegrationState {
        Initialized => "INITIALIZED",
        Configured => "CONFIGURED",
        Running => "RUNNING",
        DetectorStopped => "DETECTOR_STOPPED",
        BsreadStillRunning => "BSREAD_STILL_RUNNING",
        Finished => "FINISHED",
        Error => "ERROR",
    }
}

impl IntegrationState {
    /// States in which `start_acquisition` is legal.
    pub const STARTABLE: &'static [Self] = &[Self::Configured];

    /// States in which `stop_acquisition` is legal.
    pub const STOPPABLE: &'static [Self] = &[Self::BsreadStillRunning, Self::Finished];

    /// States in which `reset` is illegal: any state except
    /// RUNNING/DETECTOR_STOPPED.
    pub const RESET_FORBIDDEN: &'static [Self] = &[Self::Running, Self::DetectorStopped];

    /// States in which `set_acquisition_config` is legal.
    pub const CONFIGURABLE: &'static [Self] = &[Self::Initialized, Self::Configured];
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
