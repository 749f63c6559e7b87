// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! REST handlers mapping the public surface straight onto
//! [`IntegrationManager`]'s methods, one handler per route.
//!
//! Generic over the same adapter/timing-channel type parameters as
//! [`IntegrationManager`] itself, so tests can drive the real routing
//! and envelope logic against `dia_adapters::test_support::FakeAdapter`
//! instead of a live backend/writer/detector; [`crate::main`] wires up
//! the concrete HTTP/process/EPICS types.
//!
//! Every handler that calls a fallible manager method wraps its result
//! in [`Envelope`], so the wire shape stays `{"state": "ok", ...}` /
//! `{"state": "error", "reason": ..., "message": ...}` no matter which
//! endpoint produced it.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dia_adapters::{Controllable, Enableable, Parameterizable, Queryable, TimingChannel};
use dia_core::{
    AcquisitionConfig, AuxBusStatus, BackendStatus, ConfigSection, DetectorStatus, ManagerError,
    WriterStatus,
};
use dia_engine::{
    AcquisitionConfigUpdate, BackendAction, ClientsEnabledUpdate, IntegrationManager,
};
use serde::{Deserialize, Serialize};

/// Shared manager handle plus whatever else a handler needs from the
/// process — currently just the manager, but kept as a named struct
/// (rather than a bare `Arc<IntegrationManager<...>>` in `State`) so
/// future additions (e.g. a request-id counter) don't change every
/// handler's signature.
pub struct AppState<D, B, W, A, TC> {
    pub manager: Arc<IntegrationManager<D, B, W, A, TC>>,
}

impl<D, B, W, A, TC> Clone for AppState<D, B, W, A, TC> {
    fn clone(&self) -> Self {
        Self { manager: self.manager.clone() }
    }
}

/// `{"value": <json>}`, the body shape for the detector value
/// pass-through — there is no wire-format source to port this from, so
/// it follows the same envelope-wrapping convention as every other
/// response (documented as an open decision in `DESIGN.md`).
#[derive(Debug, Deserialize)]
pub struct DetectorValueBody {
    pub value: serde_json::Value,
}

/// The uniform response envelope: success carries whatever payload the
/// handler produced flattened alongside `"state": "ok"`; failure
/// carries the error's stable `reason` tag and display message.
pub struct Envelope<T>(pub Result<T, ManagerError>);

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match self.0 {
            Ok(payload) => {
                let mut body = serde_json::to_value(payload).unwrap_or(serde_json::Value::Null);
                if let serde_json::Value::Object(ref mut map) = body {
                    map.insert("state".to_string(), serde_json::Value::String("ok".to_string()));
                    (StatusCode::OK, Json(body)).into_response()
                } else {
                    (
                        StatusCode::OK,
                        Json(serde_json::json!({"state": "ok", "result": body})),
                    )
                        .into_response()
                }
            }
            Err(err) => {
                let status = error_status(&err);
                (
                    status,
                    Json(serde_json::json!({
                        "state": "error",
                        "reason": err.reason(),
                        "message": err.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

fn error_status(err: &ManagerError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

macro_rules! manager_bounds {
    () => {
        D: Controllable<Status = DetectorStatus> + Parameterizable + Queryable + Enableable + Send + Sync + 'static,
        B: Controllable<Status = BackendStatus> + Parameterizable + Enableable + Send + Sync + 'static,
        W: Controllable<Status = WriterStatus> + Parameterizable + Enableable + Send + Sync + 'static,
        A: Controllable<Status = AuxBusStatus> + Parameterizable + Enableable + Send + Sync + 'static,
        TC: TimingChannel + Send + Sync + 'static
    };
}

pub async fn get_status<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(
        state
            .manager
            .get_acquisition_status()
            .await
            .map(|s| serde_json::json!({ "status": s })),
    )
}

pub async fn get_status_details<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.get_status_details().await)
}

pub async fn get_statistics<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.get_metrics().await)
}

pub async fn get_config<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(Ok::<AcquisitionConfig, ManagerError>(state.manager.get_acquisition_config().await))
}

pub async fn set_config<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    Json(config): Json<AcquisitionConfig>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(
        state
            .manager
            .set_acquisition_config(&config)
            .await
            .map(|s| serde_json::json!({ "status": s })),
    )
}

pub async fn update_config<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    Json(update): Json<AcquisitionConfigUpdate>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(
        state
            .manager
            .update_acquisition_config(&update)
            .await
            .map(|s| serde_json::json!({ "status": s })),
    )
}

/// `params` is the trigger-control section (currently just
/// `trigger_start: bool`; an empty body is accepted as "use the
/// defaults".
pub async fn start<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    body: axum::body::Bytes,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    let params: ConfigSection = if body.is_empty() {
        ConfigSection::default()
    } else {
        match serde_json::from_slice(&body) {
            Ok(p) => p,
            Err(e) => {
                return Envelope::<serde_json::Value>(Err(ManagerError::BadRequest(e.to_string())))
                    .into_response();
            }
        }
    };
    Envelope(state.manager.start_acquisition(&params).await.map(|s| serde_json::json!({ "status": s })))
        .into_response()
}

pub async fn stop<D, B, W, A, TC>(State(state): State<AppState<D, B, W, A, TC>>) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.stop_acquisition().await.map(|s| serde_json::json!({ "status": s })))
}

pub async fn reset<D, B, W, A, TC>(State(state): State<AppState<D, B, W, A, TC>>) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.reset().await.map(|s| serde_json::json!({ "status": s })))
}

pub async fn kill<D, B, W, A, TC>(State(state): State<AppState<D, B, W, A, TC>>) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.kill().await.map(|s| serde_json::json!({ "status": s })))
}

pub async fn get_clients_enabled<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    let (per_detector, aux_bus) = state.manager.get_clients_enabled().await;
    Envelope(Ok::<_, ManagerError>(serde_json::json!({
        "detectors": per_detector,
        "aux_bus": aux_bus,
    })))
}

pub async fn set_clients_enabled<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    Json(update): Json<ClientsEnabledUpdate>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    state.manager.set_clients_enabled(&update).await;
    Envelope(Ok::<_, ManagerError>(serde_json::json!({})))
}

pub async fn get_server_info<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(Ok::<_, ManagerError>(state.manager.get_server_info().await))
}

pub async fn backend_get_status<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.backend_get_status().await)
}

pub async fn backend_get_config<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.backend_action(BackendAction::GetConfig).await)
}

pub async fn backend_set_config<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    Json(config): Json<ConfigSection>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.backend_set_config(&config).await.map(|()| serde_json::json!({})))
}

pub async fn backend_action<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    Path(name): Path<String>,
) -> Response
where
    manager_bounds!(),
{
    let action = match name.as_str() {
        "reset" => BackendAction::Reset,
        "open" => BackendAction::Open,
        "close" => BackendAction::Close,
        "get_config" => BackendAction::GetConfig,
        other => {
            return Envelope::<serde_json::Value>(Err(ManagerError::BadRequest(format!(
                "unknown backend action {other:?}"
            ))))
            .into_response();
        }
    };
    Envelope(state.manager.backend_action(action).await).into_response()
}

pub async fn detector_get_value<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    Path(name): Path<String>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(state.manager.detector_get_value(&name).await)
}

pub async fn detector_set_value<D, B, W, A, TC>(
    State(state): State<AppState<D, B, W, A, TC>>,
    Path(name): Path<String>,
    Json(body): Json<DetectorValueBody>,
) -> impl IntoResponse
where
    manager_bounds!(),
{
    Envelope(
        state
            .manager
            .detector_set_value(&name, &body.value)
            .await
            .map(|()| serde_json::json!({})),
    )
}

#[cfg(test)]
#[path = "handlers_tests.rs"]
mod tests;
