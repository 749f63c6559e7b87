// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fakes for exercising [`crate::capability::Controllable`] /
//! [`crate::capability::Parameterizable`] consumers without a real
//! sub-service. Follows the call-logging fake adapter pattern used
//! elsewhere in this codebase (`FakeAgentAdapter`/`AgentCall`).

use async_trait::async_trait;
use dia_core::{ConfigSection, ManagerError};
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

use crate::capability::{Controllable, Parameterizable, Queryable};
use crate::timing::TimingChannel;

/// One recorded call against a [`FakeAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeCall {
    Start,
    Stop,
    Reset,
    Kill,
    SetParameters,
    GetValue(String),
    SetValue(String),
}

struct FakeAdapterState<S> {
    calls: Vec<FakeCall>,
    status: S,
    fail_next: Option<ManagerError>,
    reset_delay: std::time::Duration,
}

/// A fake [`Controllable`] + [`Parameterizable`] adapter whose status
/// is set directly by the test and whose calls are recorded for
/// assertion.
pub struct FakeAdapter<S> {
    state: Arc<Mutex<FakeAdapterState<S>>>,
}

impl<S: Clone> FakeAdapter<S> {
    pub fn new(initial_status: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeAdapterState {
                calls: Vec::new(),
                status: initial_status,
                fail_next: None,
                reset_delay: std::time::Duration::ZERO,
            })),
        }
    }

    pub fn calls(&self) -> Vec<FakeCall> {
        self.state.lock().calls.clone()
    }

    pub fn set_status(&self, status: S) {
        self.state.lock().status = status;
    }

    /// The next fallible call returns this error instead of succeeding.
    pub fn fail_next_with(&self, error: ManagerError) {
        self.state.lock().fail_next = Some(error);
    }

    /// Makes every subsequent `reset()` sleep for `delay` before
    /// resolving, for exercising the manager's fan-out concurrency.
    pub fn with_reset_delay(self, delay: std::time::Duration) -> Self {
        self.state.lock().reset_delay = delay;
        self
    }

    fn take_failure(&self) -> Option<ManagerError> {
        self.state.lock().fail_next.take()
    }
}

impl<S: Clone> Clone for FakeAdapter<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

#[async_trait]
impl<S: Clone + Send + Sync + 'static> Controllable for FakeAdapter<S> {
    type Status = S;

    async fn start(&self, _params: &ConfigSection) -> Result<(), ManagerError> {
        self.state.lock().calls.push(FakeCall::Start);
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn stop(&self) -> Result<(), ManagerError> {
        self.state.lock().calls.push(FakeCall::Stop);
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn reset(&self) -> Result<(), ManagerError> {
        self.state.lock().calls.push(FakeCall::Reset);
        let delay = self.state.lock().reset_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn kill(&self) -> Result<(), ManagerError> {
        self.state.lock().calls.push(FakeCall::Kill);
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn get_status(&self) -> Result<Self::Status, ManagerError> {
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(self.state.lock().status.clone()),
        }
    }
}

#[async_trait]
impl<S: Clone + Send + Sync + 'static> Parameterizable for FakeAdapter<S> {
    async fn set_parameters(&self, _params: &ConfigSection) -> Result<(), ManagerError> {
        self.state.lock().calls.push(FakeCall::SetParameters);
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn get_statistics(&self) -> Result<Value, ManagerError> {
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(Value::Null),
        }
    }
}

#[async_trait]
impl<S: Clone + Send + Sync + 'static> Queryable for FakeAdapter<S> {
    async fn get_value(&self, name: &str) -> Result<Value, ManagerError> {
        self.state.lock().calls.push(FakeCall::GetValue(name.to_string()));
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(Value::Null),
        }
    }

    async fn set_value(&self, name: &str, _value: &Value) -> Result<(), ManagerError> {
        self.state.lock().calls.push(FakeCall::SetValue(name.to_string()));
        match self.take_failure() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// One recorded call against a [`FakeTimingChannel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimingCall {
    Start,
    Stop,
}

/// A fake [`TimingChannel`] that records pulses instead of shelling
/// out to `caput`, for exercising the manager's trigger ordering.
pub struct FakeTimingChannel {
    calls: Arc<Mutex<Vec<TimingCall>>>,
    fail_next: Arc<Mutex<Option<ManagerError>>>,
}

impl FakeTimingChannel {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_next: Arc::new(Mutex::new(None)),
        }
    }

    pub fn calls(&self) -> Vec<TimingCall> {
        self.calls.lock().clone()
    }

    pub fn fail_next_with(&self, error: ManagerError) {
        *self.fail_next.lock() = Some(error);
    }
}

impl Default for FakeTimingChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TimingChannel for FakeTimingChannel {
    async fn emit_start_code(&self) -> Result<(), ManagerError> {
        self.calls.lock().push(TimingCall::Start);
        match self.fail_next.lock().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn emit_stop_code(&self) -> Result<(), ManagerError> {
        self.calls.lock().push(TimingCall::Stop);
        match self.fail_next.lock().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
