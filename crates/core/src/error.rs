// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for the integration manager.
//!
//! Every public manager operation either succeeds or raises exactly one
//! of these kinds. The daemon maps each variant to an HTTP status and a
//! `{"state": "error", "reason": ..., "message": ...}` envelope.

use thiserror::Error;

/// Every error kind a manager operation can raise.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ManagerError {
    /// Malformed request (missing sections, bad JSON shape).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Config failed schema or cross-component validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Operation is not legal in the current integration state.
    #[error("wrong state: {0}")]
    WrongState(String),

    /// A sub-service call exhausted its retry budget.
    #[error("sub-service unavailable: {0}")]
    SubserviceUnavailable(String),

    /// An external-process adapter could not be brought up.
    #[error("startup failed: {0}")]
    StartupFailed(String),

    /// A stop required a kill; data may be corrupted.
    #[error("ungraceful stop: {0}")]
    UngracefulStop(String),

    /// A target-state wait never observed the requested state.
    #[error("state transition timeout: {0}")]
    StateTransitionTimeout(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ManagerError {
    /// Stable machine-readable tag for the `reason` field of the REST
    /// error envelope.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::InvalidConfig(_) => "invalid_config",
            Self::WrongState(_) => "wrong_state",
            Self::SubserviceUnavailable(_) => "subservice_unavailable",
            Self::StartupFailed(_) => "startup_failed",
            Self::UngracefulStop(_) => "ungraceful_stop",
            Self::StateTransitionTimeout(_) => "state_transition_timeout",
            Self::Internal(_) => "internal",
        }
    }

    /// Whether this kind should surface as a 4xx (client-caused) vs a
    /// 5xx (server/sub-service-caused) HTTP status.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest(_) | Self::InvalidConfig(_) | Self::WrongState(_)
        )
    }
}
