// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The integration manager: owns every detector pipeline plus the
//! shared aux-bus adapter and timing channel, and implements the
//! acquisition lifecycle.
//!
//! Ported method-for-method from `manager.py`. Two deliberate
//! deviations from the Python original, both recorded in full in
//! `DESIGN.md`:
//!
//! - the writer and aux-bus adapters are external-process adapters
//!   whose configuration can only be pushed at `start()` (the process
//!   doesn't exist before then), so `set_acquisition_config` caches
//!   their per-detector derived configs instead of calling
//!   `set_parameters` immediately;
//! - with more than one detector pipeline, the derived
//!   [`IntegrationState`] is computed per pipeline against the shared
//!   aux-bus status and the manager requires all enabled pipelines to
//!   agree, falling back to `Error` on disagreement.

use std::future::Future;
use std::pin::Pin;

use dia_adapters::{Controllable, Enableable, Parameterizable, Queryable, TimingChannel};
use dia_core::{
    interpret, validate, AuxBusStatus, BackendStatus, ConfigSection, ConfigValue, DetectorName,
    DetectorStatus, IntegrationState, ManagerError, RawStatusTuple, WriterStatus,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex as AsyncMutex, RwLock};

use crate::pipeline::DetectorPipeline;
use crate::target_wait::CheckForTargetStatus;

/// The four top-level config sections, as accepted by
/// `set_acquisition_config` / returned by `get_acquisition_config`.
pub type AcquisitionConfig = dia_core::AcquisitionConfig;

/// A partial overlay onto the last-applied config, as accepted by
/// `update_acquisition_config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquisitionConfigUpdate {
    #[serde(default)]
    pub writer: Option<ConfigSection>,
    #[serde(default)]
    pub backend: Option<ConfigSection>,
    #[serde(default)]
    pub detector: Option<ConfigSection>,
    #[serde(default)]
    pub aux_bus: Option<ConfigSection>,
}

/// Per-adapter-kind enable flags, as accepted by `set_clients_enabled`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientsEnabledUpdate {
    #[serde(default)]
    pub backend: Option<bool>,
    #[serde(default)]
    pub writer: Option<bool>,
    #[serde(default)]
    pub detector: Option<bool>,
    #[serde(default)]
    pub aux_bus: Option<bool>,
}

/// Current enable flags for one detector's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientsEnabledStatus {
    pub backend: bool,
    pub writer: bool,
    pub detector: bool,
}

/// Raw statuses of one detector's three adapters, for `/status_details`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineStatusDetails {
    pub detector: DetectorStatus,
    pub backend: BackendStatus,
    pub writer: WriterStatus,
}

/// The full raw status snapshot across every pipeline plus the
/// aux-bus adapter.
#[derive(Debug, Clone, Serialize)]
pub struct StatusDetails {
    pub pipelines: IndexMap<DetectorName, PipelineStatusDetails>,
    pub aux_bus: AuxBusStatus,
}

/// Wiring summary for `/server_info`: which detectors are known, their
/// enable flags, and whether the last configure attempt succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub detectors: Vec<DetectorName>,
    pub clients_enabled: IndexMap<DetectorName, ClientsEnabledStatus>,
    pub aux_bus_enabled: bool,
    pub last_config_successful: bool,
}

/// The allow-listed backend admin actions, modeled as an explicit enum
/// rather than dynamic dispatch by method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendAction {
    Reset,
    Open,
    Close,
    GetConfig,
}

struct ManagerState {
    last_writer: ConfigSection,
    last_backend: ConfigSection,
    last_detector: ConfigSection,
    last_aux_bus: ConfigSection,
    last_config_successful: bool,
    derived_writer: IndexMap<DetectorName, ConfigSection>,
    derived_backend: IndexMap<DetectorName, ConfigSection>,
    derived_aux_bus: ConfigSection,
}

impl Default for ManagerState {
    fn default() -> Self {
        Self {
            last_writer: ConfigSection::default(),
            last_backend: ConfigSection::default(),
            last_detector: ConfigSection::default(),
            last_aux_bus: ConfigSection::default(),
            last_config_successful: false,
            derived_writer: IndexMap::new(),
            derived_backend: IndexMap::new(),
            derived_aux_bus: ConfigSection::default(),
        }
    }
}

/// Owns every detector pipeline, the shared aux-bus adapter, and the
/// timing channel; implements the acquisition lifecycle.
///
/// Two locks with distinct jobs: `state` (an `RwLock`) guards the
/// small cached-config struct and is taken only briefly by queries;
/// `lifecycle_lock` is held for the whole body of every mutating
/// method, so at most one lifecycle operation is ever in flight while
/// read-only queries continue to be served.
pub struct IntegrationManager<D, B, W, A, TC> {
    pipelines: IndexMap<DetectorName, DetectorPipeline<D, B, W>>,
    aux_bus: A,
    timing: TC,
    target_wait: CheckForTargetStatus,
    state: RwLock<ManagerState>,
    lifecycle_lock: AsyncMutex<()>,
}

impl<D, B, W, A, TC> IntegrationManager<D, B, W, A, TC>
where
    D: Controllable<Status = DetectorStatus> + Parameterizable + Queryable + Enableable,
    B: Controllable<Status = BackendStatus> + Parameterizable + Enableable,
    W: Controllable<Status = WriterStatus> + Parameterizable + Enableable,
    A: Controllable<Status = AuxBusStatus> + Parameterizable + Enableable,
    TC: TimingChannel,
{
    pub fn new(
        pipelines: IndexMap<DetectorName, DetectorPipeline<D, B, W>>,
        aux_bus: A,
        timing: TC,
    ) -> Self {
        Self {
            pipelines,
            aux_bus,
            timing,
            target_wait: CheckForTargetStatus::new(),
            state: RwLock::new(ManagerState::default()),
            lifecycle_lock: AsyncMutex::new(()),
        }
    }

    pub fn with_target_wait(mut self, target_wait: CheckForTargetStatus) -> Self {
        self.target_wait = target_wait;
        self
    }

    // ---- lifecycle mutators ----

    pub async fn set_acquisition_config(
        &self,
        cfg: &AcquisitionConfig,
    ) -> Result<IntegrationState, ManagerError> {
        tracing::info!(target: "audit_trail", "set_acquisition_config");
        let _guard = self.lifecycle_lock.lock().await;
        self.set_acquisition_config_impl(cfg).await
    }

    async fn set_acquisition_config_impl(
        &self,
        cfg: &AcquisitionConfig,
    ) -> Result<IntegrationState, ManagerError> {
        let status = self.get_acquisition_status().await?;

        {
            let mut state = self.state.write().await;
            state.last_config_successful = false;
        }

        if !IntegrationState::CONFIGURABLE.contains(&status) {
            return Err(ManagerError::WrongState(format!(
                "cannot set config in {status} state, please reset first"
            )));
        }

        if status == IntegrationState::Configured {
            tracing::debug!(%status, "resetting before applying new config");
            self.reset_impl().await?;
        }

        let mut writer = cfg.writer.clone();
        let mut aux_bus = cfg.aux_bus.clone();
        validate::validate_writer(&mut writer)?;
        validate::validate_backend(&cfg.backend)?;
        validate::validate_detector(&cfg.detector)?;
        validate::validate_aux_bus(&mut aux_bus)?;
        validate::validate_dependencies(&writer, &cfg.backend, &cfg.detector)?;

        let mut derived_writer = IndexMap::new();
        let mut derived_backend = IndexMap::new();

        let output_file = cfg
            .writer
            .get("output_file")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        for (name, pipeline) in &self.pipelines {
            let mut modified_backend = cfg.backend.clone();
            if let Some(pede) = cfg
                .backend
                .get("pede_corrections_filename")
                .and_then(|v| v.as_str())
            {
                modified_backend.insert(
                    "pede_corrections_filename",
                    dia_core::naming::pedestal_filename(pede, name.as_str()),
                );
            }
            if let Some(gain) = cfg
                .backend
                .get("gain_corrections_filename")
                .and_then(|v| v.as_str())
            {
                modified_backend.insert(
                    "gain_corrections_filename",
                    dia_core::naming::gain_filename(gain, name.as_str()),
                );
            }
            pipeline.backend.set_parameters(&modified_backend).await?;
            pipeline.detector.set_parameters(&cfg.detector).await?;

            let mut modified_writer = writer.clone();
            modified_writer.insert(
                "output_file",
                dia_core::naming::detector_output_file(&output_file, name.as_str()),
            );

            derived_backend.insert(name.clone(), modified_backend);
            derived_writer.insert(name.clone(), modified_writer);
        }

        let aux_bus_output_file = cfg
            .aux_bus
            .get("output_file")
            .and_then(|v| v.as_str())
            .unwrap_or_default();
        let modified_aux_bus =
            aux_bus.with("output_file", dia_core::naming::aux_bus_output_file(aux_bus_output_file));

        {
            let mut state = self.state.write().await;
            state.last_writer = cfg.writer.clone();
            state.last_backend = cfg.backend.clone();
            state.last_detector = cfg.detector.clone();
            state.last_aux_bus = cfg.aux_bus.clone();
            state.derived_writer = derived_writer;
            state.derived_backend = derived_backend;
            state.derived_aux_bus = modified_aux_bus;
            state.last_config_successful = true;
        }

        self.target_wait
            .wait_for(|| self.get_acquisition_status(), &[IntegrationState::Configured])
            .await
    }

    pub async fn update_acquisition_config(
        &self,
        updates: &AcquisitionConfigUpdate,
    ) -> Result<IntegrationState, ManagerError> {
        tracing::info!(target: "audit_trail", "update_acquisition_config");
        let _guard = self.lifecycle_lock.lock().await;

        let mut merged = self.get_acquisition_config_snapshot().await;
        if let Some(w) = &updates.writer {
            overlay(&mut merged.writer, w);
        }
        if let Some(b) = &updates.backend {
            overlay(&mut merged.backend, b);
        }
        if let Some(d) = &updates.detector {
            overlay(&mut merged.detector, d);
        }
        if let Some(a) = &updates.aux_bus {
            overlay(&mut merged.aux_bus, a);
        }

        self.set_acquisition_config_impl(&merged).await
    }

    pub async fn start_acquisition(
        &self,
        params: &ConfigSection,
    ) -> Result<IntegrationState, ManagerError> {
        tracing::info!(target: "audit_trail", "start_acquisition");
        let _guard = self.lifecycle_lock.lock().await;

        let status = self.get_acquisition_status().await?;
        if status != IntegrationState::Configured {
            return Err(ManagerError::WrongState(format!(
                "cannot start acquisition in {status} state, please configure first"
            )));
        }

        let derived_aux_bus = self.state.read().await.derived_aux_bus.clone();
        self.aux_bus.start(&derived_aux_bus).await?;

        for (name, pipeline) in &self.pipelines {
            let writer_params = self
                .state
                .read()
                .await
                .derived_writer
                .get(name)
                .cloned()
                .unwrap_or_default();
            pipeline.start(&writer_params).await?;
        }

        let trigger_start = match params.get("trigger_start") {
            Some(ConfigValue::Bool(b)) => *b,
            _ => true,
        };

        if trigger_start {
            self.timing.emit_start_code().await?;
        } else {
            tracing::debug!("prepared to collect data, trigger will come from outside");
        }

        self.target_wait
            .wait_for(
                || self.get_acquisition_status(),
                &[
                    IntegrationState::Running,
                    IntegrationState::DetectorStopped,
                    IntegrationState::BsreadStillRunning,
                    IntegrationState::Finished,
                ],
            )
            .await
    }

    pub async fn stop_acquisition(&self) -> Result<IntegrationState, ManagerError> {
        tracing::info!(target: "audit_trail", "stop_acquisition");
        let _guard = self.lifecycle_lock.lock().await;

        let status = self.get_acquisition_status().await?;
        if !IntegrationState::STOPPABLE.contains(&status) {
            return Err(ManagerError::WrongState(format!(
                "cannot stop acquisition in {status} state, please wait for backend to finish"
            )));
        }

        self.timing.emit_stop_code().await?;

        for pipeline in self.pipelines.values() {
            pipeline.stop().await?;
        }
        self.aux_bus.stop().await?;

        self.reset_impl().await
    }

    pub async fn reset(&self) -> Result<IntegrationState, ManagerError> {
        tracing::info!(target: "audit_trail", "reset");
        let _guard = self.lifecycle_lock.lock().await;
        self.reset_impl().await
    }

    async fn reset_impl(&self) -> Result<IntegrationState, ManagerError> {
        let status = self.get_acquisition_status().await?;
        if IntegrationState::RESET_FORBIDDEN.contains(&status) {
            return Err(ManagerError::WrongState(format!(
                "cannot reset acquisition in {status} state, please wait for backend to finish"
            )));
        }

        {
            let mut state = self.state.write().await;
            state.last_config_successful = false;
        }

        self.timing.emit_stop_code().await?;

        let mut workers: Vec<Pin<Box<dyn Future<Output = Result<(), ManagerError>> + Send + '_>>> =
            Vec::with_capacity(self.pipelines.len() + 1);
        for pipeline in self.pipelines.values() {
            workers.push(Box::pin(pipeline.reset()));
        }
        workers.push(Box::pin(self.aux_bus.reset()));

        let results = tokio::time::timeout(self.target_wait.timeout(), futures_util::future::join_all(workers))
            .await
            .map_err(|_| {
                ManagerError::StateTransitionTimeout(
                    "reset fan-out did not complete within the deadline".to_string(),
                )
            })?;
        for result in results {
            result?;
        }

        self.target_wait
            .wait_for(|| self.get_acquisition_status(), &[IntegrationState::Initialized])
            .await
    }

    pub async fn kill(&self) -> Result<IntegrationState, ManagerError> {
        tracing::info!(target: "audit_trail", "kill");
        let _guard = self.lifecycle_lock.lock().await;

        for pipeline in self.pipelines.values() {
            pipeline.kill().await?;
        }
        self.aux_bus.kill().await?;

        self.reset_impl().await
    }

    pub async fn set_clients_enabled(&self, update: &ClientsEnabledUpdate) {
        tracing::info!(target: "audit_trail", "set_clients_enabled");
        for pipeline in self.pipelines.values() {
            if let Some(v) = update.backend {
                pipeline.backend.set_enabled(v);
            }
            if let Some(v) = update.writer {
                pipeline.writer.set_enabled(v);
            }
            if let Some(v) = update.detector {
                pipeline.detector.set_enabled(v);
            }
        }
        if let Some(v) = update.aux_bus {
            self.aux_bus.set_enabled(v);
        }
    }

    // ---- read-only queries ----

    pub async fn get_status_details(&self) -> Result<StatusDetails, ManagerError> {
        let mut pipelines = IndexMap::new();
        for (name, pipeline) in &self.pipelines {
            let raw = pipeline.raw_status().await?;
            pipelines.insert(
                name.clone(),
                PipelineStatusDetails {
                    detector: raw.detector,
                    backend: raw.backend,
                    writer: raw.writer,
                },
            );
        }
        let aux_bus = self.aux_bus.get_status().await?;
        Ok(StatusDetails { pipelines, aux_bus })
    }

    /// Derives the integration state per pipeline (paired with the
    /// shared aux-bus status) and requires every pipeline to agree;
    /// with zero pipelines configured, the state is derived from the
    /// aux-bus status alone. Then applies the `CONFIGURED`-but-not-
    /// `last_config_successful` override.
    pub async fn get_acquisition_status(&self) -> Result<IntegrationState, ManagerError> {
        let details = self.get_status_details().await?;

        let derived: Vec<IntegrationState> = if details.pipelines.is_empty() {
            vec![interpret(&RawStatusTuple {
                writer: WriterStatus::Disabled,
                detector: DetectorStatus::Disabled,
                backend: BackendStatus::Disabled,
                aux_bus: details.aux_bus,
            })]
        } else {
            details
                .pipelines
                .values()
                .map(|p| {
                    interpret(&RawStatusTuple {
                        writer: p.writer,
                        detector: p.detector,
                        backend: p.backend,
                        aux_bus: details.aux_bus,
                    })
                })
                .collect()
        };

        let status = match derived.split_first() {
            Some((first, rest)) if rest.iter().all(|s| s == first) => *first,
            Some(_) => IntegrationState::Error,
            None => IntegrationState::Error,
        };

        if status == IntegrationState::Configured && !self.state.read().await.last_config_successful
        {
            return Ok(IntegrationState::Error);
        }

        Ok(status)
    }

    pub async fn get_acquisition_config(&self) -> AcquisitionConfig {
        self.get_acquisition_config_snapshot().await
    }

    async fn get_acquisition_config_snapshot(&self) -> AcquisitionConfig {
        let state = self.state.read().await;
        AcquisitionConfig {
            writer: state.last_writer.clone(),
            backend: state.last_backend.clone(),
            detector: state.last_detector.clone(),
            aux_bus: state.last_aux_bus.clone(),
        }
    }

    pub async fn get_clients_enabled(&self) -> (IndexMap<DetectorName, ClientsEnabledStatus>, bool) {
        let pipelines = self
            .pipelines
            .iter()
            .map(|(name, p)| {
                (
                    name.clone(),
                    ClientsEnabledStatus {
                        backend: p.backend.is_enabled(),
                        writer: p.writer.is_enabled(),
                        detector: p.detector.is_enabled(),
                    },
                )
            })
            .collect();
        (pipelines, self.aux_bus.is_enabled())
    }

    pub async fn get_server_info(&self) -> ServerInfo {
        let (clients_enabled, aux_bus_enabled) = self.get_clients_enabled().await;
        ServerInfo {
            detectors: self.pipelines.keys().cloned().collect(),
            clients_enabled,
            aux_bus_enabled,
            last_config_successful: self.state.read().await.last_config_successful,
        }
    }

    pub async fn get_metrics(&self) -> Result<serde_json::Value, ManagerError> {
        let mut root = serde_json::Map::new();
        for (name, pipeline) in &self.pipelines {
            let writer = pipeline.writer.get_statistics().await?;
            let backend = pipeline.backend.get_statistics().await?;
            root.insert(
                name.to_string(),
                serde_json::json!({ "writer": writer, "backend": backend, "detector": {} }),
            );
        }
        let bsread = self.aux_bus.get_statistics().await?;
        root.insert("bsread".to_string(), serde_json::json!({ "bsread": bsread }));
        Ok(serde_json::Value::Object(root))
    }

    // ---- backend / detector pass-throughs ----

    pub async fn backend_get_status(&self) -> Result<IndexMap<DetectorName, BackendStatus>, ManagerError> {
        let mut out = IndexMap::new();
        for (name, pipeline) in &self.pipelines {
            out.insert(name.clone(), pipeline.backend.get_status().await?);
        }
        Ok(out)
    }

    pub async fn backend_set_config(&self, config: &ConfigSection) -> Result<(), ManagerError> {
        tracing::info!(target: "audit_trail", "backend_set_config");
        for pipeline in self.pipelines.values() {
            pipeline.backend.set_parameters(config).await?;
        }
        Ok(())
    }

    /// An explicit allow-list of backend admin actions rather than
    /// dynamic dispatch by method name. `GetConfig` returns the
    /// manager's own cached per-detector derived config rather than
    /// polling the sub-service, mirroring
    /// `backend_client_get_config`'s use of `_last_set_backend_config`.
    pub async fn backend_action(
        &self,
        action: BackendAction,
    ) -> Result<IndexMap<DetectorName, serde_json::Value>, ManagerError> {
        if !matches!(action, BackendAction::GetConfig) {
            tracing::info!(target: "audit_trail", ?action, "backend_action");
        }
        let mut out = IndexMap::new();
        for (name, pipeline) in &self.pipelines {
            let value = match action {
                BackendAction::Reset => {
                    pipeline.backend.reset().await?;
                    serde_json::Value::Null
                }
                BackendAction::Open => {
                    pipeline.backend.start(&ConfigSection::default()).await?;
                    serde_json::Value::Null
                }
                BackendAction::Close => {
                    pipeline.backend.stop().await?;
                    serde_json::Value::Null
                }
                BackendAction::GetConfig => {
                    let state = self.state.read().await;
                    let cfg = state.derived_backend.get(name).cloned().unwrap_or_default();
                    serde_json::to_value(cfg).map_err(|e| ManagerError::Internal(e.to_string()))?
                }
            };
            out.insert(name.clone(), value);
        }
        Ok(out)
    }

    pub async fn detector_get_value(
        &self,
        name: &str,
    ) -> Result<IndexMap<DetectorName, serde_json::Value>, ManagerError> {
        let mut out = IndexMap::new();
        for (det_name, pipeline) in &self.pipelines {
            out.insert(det_name.clone(), pipeline.detector.get_value(name).await?);
        }
        Ok(out)
    }

    pub async fn detector_set_value(
        &self,
        name: &str,
        value: &serde_json::Value,
    ) -> Result<(), ManagerError> {
        tracing::info!(target: "audit_trail", value_name = name, "detector_set_value");
        for pipeline in self.pipelines.values() {
            pipeline.detector.set_value(name, value).await?;
        }
        Ok(())
    }
}

fn overlay(into: &mut ConfigSection, from: &ConfigSection) {
    for (key, value) in &from.0 {
        into.insert(key.clone(), value.clone());
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
