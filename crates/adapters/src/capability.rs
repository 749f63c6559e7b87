// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Capability traits every sub-service adapter implements.
//!
//! Splits the fat `AgentAdapter` trait shape this crate's adapters
//! descend from into two narrow capability traits, since here the
//! same operations (start/stop/reset/kill vs. set-parameters/
//! statistics) are shared across adapter kinds that otherwise have
//! nothing in common (HTTP vs external process vs PV write).

use async_trait::async_trait;
use dia_core::{ConfigSection, ManagerError};
use serde_json::Value;

/// Lifecycle control for a sub-service: start it with parameters,
/// stop/reset/kill it, and read back its raw status.
#[async_trait]
pub trait Controllable: Send + Sync {
    /// The raw status enum this sub-service reports (one of
    /// `WriterStatus`/`DetectorStatus`/`BackendStatus`/`AuxBusStatus`).
    type Status: Send;

    async fn start(&self, params: &ConfigSection) -> Result<(), ManagerError>;
    async fn stop(&self) -> Result<(), ManagerError>;
    async fn reset(&self) -> Result<(), ManagerError>;
    async fn kill(&self) -> Result<(), ManagerError>;
    async fn get_status(&self) -> Result<Self::Status, ManagerError>;
}

/// Post-start parameter updates and statistics retrieval. Split from
/// [`Controllable`] because statistics shape differs per sub-service
/// and some callers (the manager's `/statistics` aggregator) only
/// need this half.
#[async_trait]
pub trait Parameterizable: Send + Sync {
    async fn set_parameters(&self, params: &ConfigSection) -> Result<(), ManagerError>;
    async fn get_statistics(&self) -> Result<Value, ManagerError>;
}

/// Single named-value get/set, used by the detector pass-through
/// (`get_value`/`set_value`). Kept separate from [`Parameterizable`]
/// since only the detector adapter has this capability.
#[async_trait]
pub trait Queryable: Send + Sync {
    async fn get_value(&self, name: &str) -> Result<Value, ManagerError>;
    async fn set_value(&self, name: &str, value: &Value) -> Result<(), ManagerError>;
}
