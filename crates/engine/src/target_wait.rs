// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded poll-until-target-state wait.
//!
//! Ported from `detector_integration_api.utils.check_for_target_status`:
//! every lifecycle mutator calls this once its sub-service calls are
//! issued, to confirm the derived state actually reached what was
//! requested before returning success to the caller.

use std::future::Future;
use std::time::Duration;

use dia_core::{IntegrationState, ManagerError};

/// Default overall deadline and poll interval (see DESIGN.md: a flat
/// 250ms poll is simpler than backoff for a transition that, once
/// triggered, resolves in at most a handful of sub-service round
/// trips).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A bounded poll loop over a state getter.
#[derive(Debug, Clone, Copy)]
pub struct CheckForTargetStatus {
    timeout: Duration,
    poll_interval: Duration,
}

impl CheckForTargetStatus {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Polls `getter` until it returns a state in `targets`, or fails
    /// with `StateTransitionTimeout` once `self.timeout` has elapsed.
    pub async fn wait_for<F, Fut>(
        &self,
        mut getter: F,
        targets: &[IntegrationState],
    ) -> Result<IntegrationState, ManagerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<IntegrationState, ManagerError>>,
    {
        let deadline = tokio::time::Instant::now() + self.timeout;
        loop {
            let current = getter().await?;
            if targets.contains(&current) {
                return Ok(current);
            }

            if tokio::time::Instant::now() >= deadline {
                return Err(ManagerError::StateTransitionTimeout(format!(
                    "target state {targets:?} not observed within {:?} (last seen {current:?})",
                    self.timeout
                )));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

impl Default for CheckForTargetStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "target_wait_tests.rs"]
mod tests;
