// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Route table wiring the REST surface onto its handlers.

use axum::routing::{get, post};
use axum::Router;
use dia_adapters::{Controllable, Enableable, Parameterizable, Queryable, TimingChannel};
use dia_core::{AuxBusStatus, BackendStatus, DetectorStatus, WriterStatus};

use crate::handlers::{self, AppState};

pub fn app<D, B, W, A, TC>(state: AppState<D, B, W, A, TC>) -> Router
where
    D: Controllable<Status = DetectorStatus> + Parameterizable + Queryable + Enableable + Send + Sync + 'static,
    B: Controllable<Status = BackendStatus> + Parameterizable + Enableable + Send + Sync + 'static,
    W: Controllable<Status = WriterStatus> + Parameterizable + Enableable + Send + Sync + 'static,
    A: Controllable<Status = AuxBusStatus> + Parameterizable + Enableable + Send + Sync + 'static,
    TC: TimingChannel + Send + Sync + 'static,
{
    Router::new()
        .route("/status", get(handlers::get_status))
        .route("/status_details", get(handlers::get_status_details))
        .route("/statistics", get(handlers::get_statistics))
        .route(
            "/config",
            get(handlers::get_config).post(handlers::set_config).put(handlers::update_config),
        )
        .route("/start", post(handlers::start))
        .route("/stop", post(handlers::stop))
        .route("/reset", post(handlers::reset))
        .route("/kill", post(handlers::kill))
        .route(
            "/clients_enabled",
            get(handlers::get_clients_enabled).post(handlers::set_clients_enabled),
        )
        .route("/server_info", get(handlers::get_server_info))
        .route("/backend/status", get(handlers::backend_get_status))
        .route(
            "/backend/config",
            get(handlers::backend_get_config).post(handlers::backend_set_config),
        )
        .route("/backend/action/:name", post(handlers::backend_action))
        .route(
            "/detector/value/:name",
            get(handlers::detector_get_value).post(handlers::detector_set_value),
        )
        .with_state(state)
}

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;
