// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The timing PV channel: emits the detector's start/stop event codes
//! onto an EPICS PV.
//!
//! Ported from `detector_timing_cli_client.py`, which calls
//! `epics.caput(pv, code, wait=True, timeout=...)` around the
//! detector's own start/stop. Rather than pull in an EPICS client
//! library, we shell out to the `caput` CLI the same way the Python
//! client's underlying `pyepics` binding ultimately does at the wire
//! level — this keeps the dependency graph free of a channel-access
//! client for the sake of two scalar writes.

use async_trait::async_trait;
use dia_core::ManagerError;
use std::time::Duration;
use tokio::process::Command;

/// Default `caput` wait timeout, matching `DEFAULT_CAPUT_TIMEOUT`.
pub const DEFAULT_CAPUT_TIMEOUT: Duration = Duration::from_secs(3);

#[async_trait]
pub trait TimingChannel: Send + Sync {
    async fn emit_start_code(&self) -> Result<(), ManagerError>;
    async fn emit_stop_code(&self) -> Result<(), ManagerError>;
}

/// Shells out to the `caput` EPICS command-line client.
pub struct CaputTimingChannel {
    pv: String,
    start_code: i64,
    stop_code: i64,
    timeout: Duration,
}

impl CaputTimingChannel {
    pub fn new(pv: impl Into<String>, start_code: i64, stop_code: i64) -> Self {
        Self {
            pv: pv.into(),
            start_code,
            stop_code,
            timeout: DEFAULT_CAPUT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn caput(&self, value: i64) -> Result<(), ManagerError> {
        let output = tokio::time::timeout(
            self.timeout,
            Command::new("caput").arg(&self.pv).arg(value.to_string()).output(),
        )
        .await
        .map_err(|_| {
            ManagerError::SubserviceUnavailable(format!(
                "caput {} {} timed out after {:?}",
                self.pv, value, self.timeout
            ))
        })?
        .map_err(|e| ManagerError::SubserviceUnavailable(format!("failed to run caput: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ManagerError::SubserviceUnavailable(format!(
                "caput {} {} exited with {}: {}",
                self.pv,
                value,
                output.status,
                String::from_utf8_lossy(&output.stderr)
            )))
        }
    }
}

#[async_trait]
impl TimingChannel for CaputTimingChannel {
    async fn emit_start_code(&self) -> Result<(), ManagerError> {
        self.caput(self.start_code).await
    }

    async fn emit_stop_code(&self) -> Result<(), ManagerError> {
        self.caput(self.stop_code).await
    }
}

#[cfg(test)]
#[path = "timing_tests.rs"]
mod tests;
