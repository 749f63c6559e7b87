// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! dia-adapters: talks to the sub-services (backend, detector, writer,
//! aux-bus writer) over HTTP, an external process, and an EPICS PV.
//!
//! Every adapter kind implements the [`Controllable`] /
//! [`Parameterizable`] capability traits; [`EnableGuard`] wraps any of
//! them to add administrative enable/disable without a cyclic
//! back-reference to the thing it wraps.

pub mod capability;
pub mod enable;
pub mod http;
pub mod process;
pub mod timing;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use capability::{Controllable, Parameterizable, Queryable};
pub use enable::{EnableGuard, Enableable};
pub use http::HttpAdapter;
pub use process::ProcessAdapter;
pub use timing::{CaputTimingChannel, TimingChannel};
