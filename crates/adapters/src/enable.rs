// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Administrative enable/disable wrapping for any adapter.
//!
//! Ported from the disable-flag idea in `ClientDisableWrapper`
//! (`validation.py`/`manager.py`): an operator can disable a
//! sub-service client without restarting the daemon, at which point
//! every mutator becomes a no-op and every accessor reports the
//! `Disabled` sentinel instead of polling the real thing. Composition,
//! not inheritance — `EnableGuard<T>` owns a `T`, it never needs `T`
//! to know about the wrapper.

use async_trait::async_trait;
use dia_core::{ConfigSection, DisabledStatus, ManagerError};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::capability::{Controllable, Parameterizable, Queryable};

/// Wraps an adapter with an enable flag. Defaults to enabled.
pub struct EnableGuard<T> {
    inner: T,
    enabled: AtomicBool,
}

impl<T> EnableGuard<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            enabled: AtomicBool::new(true),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T> Controllable for EnableGuard<T>
where
    T: Controllable + Send + Sync,
    T::Status: DisabledStatus + Send,
{
    type Status = T::Status;

    async fn start(&self, params: &ConfigSection) -> Result<(), ManagerError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.start(params).await
    }

    async fn stop(&self) -> Result<(), ManagerError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.stop().await
    }

    async fn reset(&self) -> Result<(), ManagerError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.reset().await
    }

    async fn kill(&self) -> Result<(), ManagerError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.kill().await
    }

    async fn get_status(&self) -> Result<Self::Status, ManagerError> {
        if !self.is_enabled() {
            return Ok(Self::Status::disabled());
        }
        self.inner.get_status().await
    }
}

#[async_trait]
impl<T> Parameterizable for EnableGuard<T>
where
    T: Parameterizable + Send + Sync,
{
    async fn set_parameters(&self, params: &ConfigSection) -> Result<(), ManagerError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.set_parameters(params).await
    }

    async fn get_statistics(&self) -> Result<Value, ManagerError> {
        if !self.is_enabled() {
            return Ok(Value::Null);
        }
        self.inner.get_statistics().await
    }
}

/// Administrative enable-flag access, generalized so a caller holding
/// only a capability-trait-bounded generic can still flip any wrapped
/// adapter's flag without knowing its concrete type.
pub trait Enableable {
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;
}

impl<T> Enableable for EnableGuard<T> {
    fn set_enabled(&self, enabled: bool) {
        EnableGuard::set_enabled(self, enabled);
    }

    fn is_enabled(&self) -> bool {
        EnableGuard::is_enabled(self)
    }
}

#[async_trait]
impl<T> Queryable for EnableGuard<T>
where
    T: Queryable + Send + Sync,
{
    async fn get_value(&self, name: &str) -> Result<Value, ManagerError> {
        if !self.is_enabled() {
            return Ok(Value::Null);
        }
        self.inner.get_value(name).await
    }

    async fn set_value(&self, name: &str, value: &Value) -> Result<(), ManagerError> {
        if !self.is_enabled() {
            return Ok(());
        }
        self.inner.set_value(name, value).await
    }
}

#[cfg(test)]
#[path = "enable_tests.rs"]
mod tests;
