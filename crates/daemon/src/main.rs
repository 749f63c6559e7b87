// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Detector integration manager daemon entrypoint: loads the detector
//! table, wires up every sub-service adapter, and serves the REST
//! surface.
//!
//! Command-line argument parsing stays out of scope; everything comes
//! from [`config::DaemonConfig::from_env`].

mod config;
mod handlers;
mod routes;

use std::sync::Arc;

use dia_adapters::{CaputTimingChannel, EnableGuard, HttpAdapter, ProcessAdapter};
use dia_core::{AuxBusStatus, BackendStatus, DetectorName, DetectorStatus, WriterStatus};
use dia_engine::{DetectorPipeline, IntegrationManager};
use indexmap::IndexMap;

use config::DaemonConfig;
use handlers::AppState;

type Manager = IntegrationManager<
    EnableGuard<HttpAdapter<DetectorStatus>>,
    EnableGuard<HttpAdapter<BackendStatus>>,
    EnableGuard<ProcessAdapter<WriterStatus>>,
    EnableGuard<ProcessAdapter<AuxBusStatus>>,
    CaputTimingChannel,
>;

#[derive(Debug, thiserror::Error)]
enum StartupError {
    #[error(transparent)]
    DetectorConfig(#[from] config::DetectorConfigError),
    #[error("failed to bind {0}: {1}")]
    Bind(String, std::io::Error),
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = DaemonConfig::from_env();
    let detectors = config.load_detectors()?;
    tracing::info!(count = detectors.len(), "loaded detector table");

    let manager = build_manager(&config, &detectors);
    if config.disable_aux_bus {
        tracing::info!("aux-bus writer disabled at startup");
        manager.set_clients_enabled(&dia_engine::ClientsEnabledUpdate {
            aux_bus: Some(false),
            ..Default::default()
        }).await;
    }

    let app = routes::app(AppState { manager: Arc::new(manager) });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| StartupError::Bind(addr.clone(), e))?;
    tracing::info!(%addr, "integration manager listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    tracing::info!("received shutdown signal");
}

/// Builds one [`DetectorPipeline`] per detector in the table, each
/// pointed at its own backend; the detector's own HTTP adapter shares
/// the same `backend_api_url` (the detector configuration file carries
/// no separate detector endpoint), and the detector id is pushed as a
/// parameter rather than baked into the URL.
fn build_manager(config: &DaemonConfig, detectors: &dia_core::AvailableDetectors) -> Manager {
    let mut pipelines = IndexMap::new();

    for (name, record) in detectors.iter() {
        let detector = EnableGuard::new(HttpAdapter::<DetectorStatus>::new(record.backend_api_url.clone()));
        let backend = EnableGuard::new(HttpAdapter::<BackendStatus>::new(record.backend_api_url.clone()));
        let writer = EnableGuard::new(ProcessAdapter::<WriterStatus>::new(writer_config(config, name, record)));

        pipelines.insert(name.clone(), DetectorPipeline::new(detector, backend, writer));
    }

    let aux_bus = EnableGuard::new(ProcessAdapter::<AuxBusStatus>::new(aux_bus_config(config)));
    let timing = CaputTimingChannel::new(
        config.timing_pv.clone(),
        config.timing_start_code,
        config.timing_stop_code,
    )
    .with_timeout(config.caput_timeout);

    IntegrationManager::new(pipelines, aux_bus, timing)
}

fn writer_config(
    config: &DaemonConfig,
    name: &DetectorName,
    record: &dia_core::DetectorRecord,
) -> dia_adapters::ProcessAdapterConfig {
    dia_adapters::ProcessAdapterConfig {
        executable: config.writer_executable.clone(),
        stream_url: record.backend_stream_url.clone(),
        port: record.writer_port,
        broker_url: config.broker_url.clone(),
        n_modules: record.n_modules,
        detector_name: name.as_str().to_string(),
        log_dir: config.writer_log_dir.join(name.as_str()),
        kind: dia_adapters::ProcessKind::Writer,
    }
}

fn aux_bus_config(config: &DaemonConfig) -> dia_adapters::ProcessAdapterConfig {
    dia_adapters::ProcessAdapterConfig {
        executable: config.writer_executable.clone(),
        stream_url: config.aux_bus_stream_url.clone(),
        port: config.aux_bus_port,
        broker_url: config.broker_url.clone(),
        n_modules: 0,
        detector_name: String::new(),
        log_dir: config.writer_log_dir.join("aux_bus"),
        kind: dia_adapters::ProcessKind::AuxBus,
    }
}
