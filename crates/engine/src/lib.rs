// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dia-engine: the acquisition lifecycle built on top of dia-core's
//! types and dia-adapters' sub-service clients.
//!
//! [`pipeline::DetectorPipeline`] bundles one detector's three
//! adapters and sequences their calls; [`target_wait`] bounds how
//! long a lifecycle mutator waits for the derived state to catch up;
//! [`manager::IntegrationManager`] owns every pipeline plus the
//! shared aux-bus adapter and implements the full operator surface.

pub mod manager;
pub mod pipeline;
pub mod target_wait;

pub use manager::{
    AcquisitionConfig, AcquisitionConfigUpdate, BackendAction, ClientsEnabledStatus,
    ClientsEnabledUpdate, IntegrationManager, PipelineStatusDetails, ServerInfo, StatusDetails,
};
pub use pipeline::{DetectorPipeline, PipelineRawStatus};
pub use target_wait::CheckForTargetStatus;
