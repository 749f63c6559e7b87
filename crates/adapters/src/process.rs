// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External-process adapter: the per-detector writer and the shared
//! aux-bus writer both launch an external process plus an HTTP control
//! port, differing only in their argv shape (see [`ProcessKind`]).
//!
//! Ported from `sf_cpp_writer_client.py`'s `get_execution_command` (a
//! fixed positional argv: stream URL, output file, frame count, port,
//! user id, broker URL, module count, detector name),
//! `bsread_writer_client.py`'s simpler variant, and
//! `databuffer_writer_client.py`'s retry/timeout conventions for the
//! `/parameters` and `/status` HTTP calls the process also exposes
//! once it is up.

use async_trait::async_trait;
use dia_core::{ConfigSection, ManagerError, StoppedStatus};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::process::{Child, Command};

use crate::capability::{Controllable, Parameterizable};
use crate::http::{DEFAULT_RETRY_DELAY, DEFAULT_RETRY_N};

/// Delay after spawning the child before the writer's HTTP API is
/// assumed to be up.
pub const STARTUP_WAIT_TIME: Duration = Duration::from_secs(2);

/// How long `stop()` waits for the child to exit gracefully before
/// escalating to `kill()`.
pub const TERMINATE_TIMEOUT: Duration = Duration::from_secs(5);

/// Which positional argv shape [`ProcessAdapter::build_argv`] produces.
/// The detector writer and the shared aux-bus writer are both external
/// processes launched by the same control protocol, but
/// `bsread_writer_client.py`'s command line carries only the fields
/// that writer has in common with it (stream URL, output file, user
/// id, port) — no frame count, broker URL, module count, or detector
/// name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessKind {
    Writer,
    AuxBus,
}

/// Static launch configuration for one external-process sub-service
/// (a detector's writer, or the shared aux-bus writer).
#[derive(Debug, Clone)]
pub struct ProcessAdapterConfig {
    pub executable: PathBuf,
    pub stream_url: String,
    pub port: u16,
    pub broker_url: String,
    pub n_modules: u32,
    pub detector_name: String,
    pub log_dir: PathBuf,
    pub kind: ProcessKind,
}

struct Running {
    child: Child,
    log_file: File,
}

/// Adapter that owns a child process plus its HTTP control plane, once
/// up. Generic over the raw status type it deserializes `/status`
/// into (`WriterStatus` for the per-detector writer, `AuxBusStatus`
/// for the shared aux-bus writer), mirroring [`crate::http::HttpAdapter`].
pub struct ProcessAdapter<S = dia_core::WriterStatus> {
    config: ProcessAdapterConfig,
    http_base_url: String,
    client: reqwest::Client,
    running: Mutex<Option<Running>>,
    _status: PhantomData<fn() -> S>,
}

impl<S> ProcessAdapter<S> {
    pub fn new(config: ProcessAdapterConfig) -> Self {
        let http_base_url = format!("http://127.0.0.1:{}", config.port);
        Self {
            config,
            http_base_url,
            client: reqwest::Client::new(),
            running: Mutex::new(None),
            _status: PhantomData,
        }
    }

    /// The fixed positional argv for this process's [`ProcessKind`]:
    /// `sh <executable> <stream_url> <output_file> <n_frames> <port>
    /// <user_id> <broker_url> <n_modules> <detector_name>` for the
    /// writer (`get_execution_command`), or `sh <executable>
    /// <stream_url> <output_file> <user_id> <port>` for the aux-bus
    /// writer (`BsreadWriterClient.get_execution_command`).
    fn build_argv(&self, params: &ConfigSection) -> Vec<String> {
        let output_file = params
            .get("output_file")
            .and_then(|v| v.as_str())
            .unwrap_or("/dev/null")
            .to_string();
        let user_id = params
            .get("user_id")
            .and_then(|v| v.as_integer())
            .unwrap_or(-1);

        match self.config.kind {
            ProcessKind::Writer => {
                let n_frames = params
                    .get("n_frames")
                    .and_then(|v| v.as_integer())
                    .unwrap_or(0);
                vec![
                    self.config.executable.display().to_string(),
                    self.config.stream_url.clone(),
                    output_file,
                    n_frames.to_string(),
                    self.config.port.to_string(),
                    user_id.to_string(),
                    self.config.broker_url.clone(),
                    self.config.n_modules.to_string(),
                    self.config.detector_name.clone(),
                ]
            }
            ProcessKind::AuxBus => vec![
                self.config.executable.display().to_string(),
                self.config.stream_url.clone(),
                output_file,
                user_id.to_string(),
                self.config.port.to_string(),
            ],
        }
    }

    fn log_path(&self) -> PathBuf {
        let prefix = match self.config.kind {
            ProcessKind::Writer => "writer",
            ProcessKind::AuxBus => "bsread_writer",
        };
        self.config
            .log_dir
            .join(format!("{prefix}.{}.log", self.config.detector_name))
    }

    async fn open_log_file(&self) -> Result<File, ManagerError> {
        File::create(self.log_path())
            .await
            .map_err(|e| ManagerError::StartupFailed(format!("cannot open writer log: {e}")))
    }

    async fn post_ok(&self, path: &str, body: &serde_json::Value) -> Result<(), ManagerError> {
        self.get_or_post_ok(reqwest::Method::POST, path, Some(body))
            .await
            .map(|_| ())
    }

    async fn get_ok(&self, path: &str) -> Result<serde_json::Value, ManagerError> {
        self.get_or_post_ok(reqwest::Method::GET, path, None).await
    }

    /// Same retry/envelope convention as `HttpAdapter::send_with_retry`,
    /// applied to the writer's own localhost control port.
    async fn get_or_post_ok(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<serde_json::Value, ManagerError> {
        let url = format!("{}{}", self.http_base_url, path);
        for attempt in 0..DEFAULT_RETRY_N {
            let mut request = self.client.request(method.clone(), &url);
            if let Some(b) = body {
                request = request.json(b);
            }

            let outcome: Option<serde_json::Value> = async {
                let response = request.send().await.ok()?;
                response.json::<serde_json::Value>().await.ok()
            }
            .await;

            if let Some(json) = outcome {
                if json.get("state").and_then(|v| v.as_str()) == Some("ok") {
                    return Ok(json);
                }
            }
            tracing::debug!(path, attempt, "writer did not respond ok, retrying");
            if attempt + 1 < DEFAULT_RETRY_N {
                tokio::time::sleep(DEFAULT_RETRY_DELAY).await;
            }
        }
        Err(ManagerError::SubserviceUnavailable(format!(
            "writer did not respond ok to {path} within {DEFAULT_RETRY_N} attempts"
        )))
    }

    /// `true` iff a child process handle exists and has not exited.
    fn is_running(&self) -> bool {
        match self.running.lock().as_mut() {
            Some(running) => matches!(running.child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn reap_or_kill(&self, mut running: Running) -> Result<(), ManagerError> {
        let waited = tokio::time::timeout(TERMINATE_TIMEOUT, running.child.wait()).await;
        let _ = running.log_file.flush().await;
        match waited {
            Ok(Ok(_)) => Ok(()),
            _ => {
                let _ = running.child.kill().await;
                Err(ManagerError::UngracefulStop(
                    "writer process did not exit in time and was killed".to_string(),
                ))
            }
        }
    }
}

#[async_trait]
impl<S> Controllable for ProcessAdapter<S>
where
    S: DeserializeOwned + Send + StoppedStatus,
{
    type Status = S;

    async fn start(&self, params: &ConfigSection) -> Result<(), ManagerError> {
        let log_file = self.open_log_file().await?;
        let argv = self.build_argv(params);

        let mut command = Command::new("sh");
        command
            .args(&argv)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let child = command
            .spawn()
            .map_err(|e| ManagerError::StartupFailed(format!("failed to spawn writer: {e}")))?;

        *self.running.lock() = Some(Running { child, log_file });

        tokio::time::sleep(STARTUP_WAIT_TIME).await;

        let mut startup_params = params.clone();
        startup_params.0.shift_remove("output_file");
        startup_params.0.shift_remove("user_id");
        let body = serde_json::to_value(&startup_params)
            .map_err(|e| ManagerError::Internal(e.to_string()))?;

        if let Err(e) = self.post_ok("/parameters", &body).await {
            if let Some(running) = self.running.lock().take() {
                let _ = self.post_ok("/kill", &serde_json::json!({})).await;
                let _ = self.reap_or_kill(running).await;
            }
            return Err(ManagerError::StartupFailed(format!(
                "writer rejected startup parameters: {e}"
            )));
        }

        Ok(())
    }

    async fn stop(&self) -> Result<(), ManagerError> {
        let running = self.running.lock().take();
        let Some(running) = running else {
            return Ok(());
        };

        let _ = self.post_ok("/stop", &serde_json::json!({})).await;
        self.reap_or_kill(running).await
    }

    async fn reset(&self) -> Result<(), ManagerError> {
        self.stop().await
    }

    async fn kill(&self) -> Result<(), ManagerError> {
        let running = self.running.lock().take();
        let Some(mut running) = running else {
            return Ok(());
        };
        let _ = self.post_ok("/kill", &serde_json::json!({})).await;
        let _ = running.child.kill().await;
        let _ = running.log_file.flush().await;
        Ok(())
    }

    async fn get_status(&self) -> Result<Self::Status, ManagerError> {
        if !self.is_running() {
            return Ok(S::stopped());
        }
        let envelope = self.get_ok("/status").await?;
        let status = envelope
            .get("status")
            .cloned()
            .ok_or_else(|| ManagerError::Internal("status envelope missing 'status'".to_string()))?;
        serde_json::from_value(status).map_err(|e| ManagerError::Internal(e.to_string()))
    }
}

#[async_trait]
impl<S> Parameterizable for ProcessAdapter<S>
where
    S: DeserializeOwned + Send,
{
    async fn set_parameters(&self, params: &ConfigSection) -> Result<(), ManagerError> {
        let body = serde_json::to_value(params).map_err(|e| ManagerError::Internal(e.to_string()))?;
        self.post_ok("/parameters", &body).await
    }

    async fn get_statistics(&self) -> Result<serde_json::Value, ManagerError> {
        self.get_ok("/statistics").await
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
