// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dia-core: domain types for the detector integration manager.
//!
//! Owns everything that can be understood without talking to a
//! sub-service: the config schema, the validator, the status
//! interpreter, per-detector naming derivations, and the error
//! taxonomy every other crate in the workspace raises.

pub mod macros;

pub mod clock;
pub mod config;
pub mod detector;
pub mod error;
pub mod interpret;
pub mod naming;
pub mod status;
pub mod validate;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{AcquisitionConfig, ConfigSection, ConfigValue};
pub use detector::{AvailableDetectors, DetectorName, DetectorRecord};
pub use error::ManagerError;
pub use interpret::{interpret, RawStatusTuple};
pub use status::{
    AuxBusStatus, BackendStatus, DetectorStatus, DisabledStatus, IntegrationState, StoppedStatus,
    WriterStatus,
};
